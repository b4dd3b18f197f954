//! The fallback validator for types with no dedicated validator.

use crate::field::{messages, Validator};
use serde_json::Value as JsonValue;
use typed_views_core::{ErrorDetail, Raw, Value};

/// Checks presence only: returns the supplied value, else the default, else
/// fails with `"A value for this parameter is required"`.
#[derive(Debug, Clone, Default)]
pub struct DefaultValidator {
    default: Option<Value>,
}

impl DefaultValidator {
    /// Creates the validator with an optional default.
    #[must_use]
    pub const fn new(default: Option<Value>) -> Self {
        Self { default }
    }
}

impl Validator for DefaultValidator {
    fn run_validation(&self, data: Raw) -> Result<Value, ErrorDetail> {
        match data {
            Raw::Empty => self
                .default
                .clone()
                .ok_or_else(|| ErrorDetail::message(messages::VALUE_REQUIRED)),
            Raw::Json(JsonValue::Null) => Ok(Value::Null),
            Raw::Json(value) => Ok(Value::Json(value)),
            Raw::Principal(principal) => Ok(Value::Principal(principal)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use typed_views_core::Principal;

    #[test]
    fn test_passes_values_through() {
        let validator = DefaultValidator::default();
        assert_eq!(
            validator.run_validation(Raw::Json(json!({"a": 1}))),
            Ok(Value::Json(json!({"a": 1})))
        );
        let user = Principal::user("1", "ann");
        assert_eq!(
            validator.run_validation(Raw::Principal(user.clone())),
            Ok(Value::Principal(user))
        );
    }

    #[test]
    fn test_requires_value_or_default() {
        assert_eq!(
            DefaultValidator::default().run_validation(Raw::Empty),
            Err(ErrorDetail::message("A value for this parameter is required"))
        );
        assert_eq!(
            DefaultValidator::new(Some(Value::from("x"))).run_validation(Raw::Empty),
            Ok(Value::from("x"))
        );
    }
}
