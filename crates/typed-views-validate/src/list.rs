//! List fields.

use crate::field::{messages, type_name, FieldKind, Validator};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use typed_views_core::{ErrorDetail, ParamSettings, Raw, Value};

/// A list whose items are validated by a child validator.
///
/// Without a child, items are passed through as JSON. Child errors are
/// reported under the failing item's index.
#[derive(Debug)]
pub struct ListKind {
    child: Option<Box<dyn Validator>>,
    allow_empty: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
}

impl ListKind {
    /// Builds a list kind from settings and an optional child validator.
    #[must_use]
    pub fn new(settings: &ParamSettings, child: Option<Box<dyn Validator>>) -> Self {
        Self {
            child,
            allow_empty: settings.allow_empty(),
            min_length: settings.min_length(),
            max_length: settings.max_length(),
        }
    }
}

impl FieldKind for ListKind {
    fn to_internal_value(&self, data: &JsonValue) -> Result<Value, ErrorDetail> {
        let JsonValue::Array(items) = data else {
            return Err(ErrorDetail::message(messages::not_a_list(type_name(data))));
        };
        if !self.allow_empty && items.is_empty() {
            return Err(ErrorDetail::message(messages::EMPTY_LIST));
        }

        let mut values = Vec::with_capacity(items.len());
        let mut errors = IndexMap::new();
        for (idx, item) in items.iter().enumerate() {
            let result = match &self.child {
                Some(child) => child.run_validation(Raw::Json(item.clone())),
                None => Ok(Value::Json(item.clone())),
            };
            match result {
                Ok(value) => values.push(value),
                Err(detail) => {
                    errors.insert(idx.to_string(), detail);
                }
            }
        }
        if !errors.is_empty() {
            return Err(ErrorDetail::Nested(errors));
        }

        let mut messages = Vec::new();
        if let Some(max) = self.max_length {
            if values.len() > max {
                messages.push(messages::max_items(max));
            }
        }
        if let Some(min) = self.min_length {
            if values.len() < min {
                messages.push(messages::min_items(min));
            }
        }
        if messages.is_empty() {
            Ok(Value::List(values))
        } else {
            Err(ErrorDetail::Messages(messages))
        }
    }
}
