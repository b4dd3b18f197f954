//! Values from the parsed request body.

use super::{lookup_path, Binding, ParamStrategy};
use crate::error::ParamError;
use serde_json::Value as JsonValue;
use typed_views_core::{Raw, SourceKind, Value};

/// Reads the whole body or a dotted path into it.
///
/// An unset source or `"*"` selects the whole body. Any missing segment of a
/// dotted path is the empty sentinel.
#[derive(Debug)]
pub struct BodyStrategy<'a> {
    binding: Binding<'a>,
    data: &'a JsonValue,
}

impl<'a> BodyStrategy<'a> {
    /// Creates the strategy over the parsed body.
    #[must_use]
    pub const fn new(binding: Binding<'a>, data: &'a JsonValue) -> Self {
        Self { binding, data }
    }
}

impl ParamStrategy for BodyStrategy<'_> {
    fn raw_value(&self) -> Raw {
        match self.binding.settings().source() {
            None | Some("*") => Raw::Json(self.data.clone()),
            Some(path) => lookup_path(self.data, path).cloned().into(),
        }
    }

    fn validate_or_error(&self) -> Result<Value, ParamError> {
        self.binding.validate(self.raw_value(), SourceKind::Body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use typed_views_core::ParamSettings;
    use typed_views_validate::DefaultValidator;

    fn raw(source: Option<&str>) -> Raw {
        let data = json!({"a": "b", "nested": {"items": [{"id": 4}]}});
        let mut builder = ParamSettings::body();
        if let Some(source) = source {
            builder = builder.source(source);
        }
        let settings = builder.build().unwrap();
        let validator = DefaultValidator::default();
        BodyStrategy::new(Binding::new("payload", &settings, &validator), &data).raw_value()
    }

    #[test]
    fn test_dotted_paths() {
        assert_eq!(raw(Some("a")), Raw::from("b"));
        assert_eq!(raw(Some("nested.items.0.id")), Raw::Json(json!(4)));
        assert_eq!(raw(Some("c")), Raw::Empty);
        assert_eq!(raw(Some("a.deeper")), Raw::Empty);
    }

    #[test]
    fn test_whole_body() {
        let whole = Raw::Json(json!({"a": "b", "nested": {"items": [{"id": 4}]}}));
        assert_eq!(raw(None), whole);
        assert_eq!(raw(Some("*")), whole);
    }
}
