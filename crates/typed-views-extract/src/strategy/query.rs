//! Query-string parameters.

use super::{Binding, ParamStrategy};
use crate::error::ParamError;
use serde_json::Value as JsonValue;
use typed_views_core::{QueryParams, Raw, SourceKind, Value};

/// Reads a query-string parameter.
///
/// - source `"*"`: the whole query as an object, last value per key
/// - an empty string counts as absent
/// - list parameters split the value on the configured delimiter
#[derive(Debug)]
pub struct QueryStrategy<'a> {
    binding: Binding<'a>,
    query: &'a QueryParams,
    is_list: bool,
}

impl<'a> QueryStrategy<'a> {
    /// Creates the strategy. `is_list` selects delimiter splitting.
    #[must_use]
    pub const fn new(binding: Binding<'a>, query: &'a QueryParams, is_list: bool) -> Self {
        Self {
            binding,
            query,
            is_list,
        }
    }
}

impl ParamStrategy for QueryStrategy<'_> {
    fn raw_value(&self) -> Raw {
        let settings = self.binding.settings();
        if settings.is_wildcard() {
            return Raw::Json(self.query.to_json());
        }

        match self.query.get(self.binding.key()) {
            None | Some("") => Raw::Empty,
            Some(text) if self.is_list => Raw::Json(JsonValue::Array(
                text.split(settings.delimiter())
                    .map(|item| JsonValue::String(item.to_string()))
                    .collect(),
            )),
            Some(text) => Raw::Json(JsonValue::String(text.to_string())),
        }
    }

    fn validate_or_error(&self) -> Result<Value, ParamError> {
        self.binding.validate(self.raw_value(), SourceKind::Query)
    }
}
