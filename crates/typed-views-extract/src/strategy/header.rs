//! Request headers.

use super::{Binding, ParamStrategy};
use crate::error::ParamError;
use serde_json::Value as JsonValue;
use typed_views_core::{Raw, Request, SourceKind, Value};

/// Reads a header, case-insensitively.
///
/// Without a source override the parameter name is used with `_` turned into
/// `-`, so `x_api_key` reads `X-Api-Key`. Source `"*"` yields every header as
/// an object with lower-cased names. A missing header reads as JSON `null`.
#[derive(Debug)]
pub struct HeaderStrategy<'a> {
    binding: Binding<'a>,
    request: &'a Request,
}

impl<'a> HeaderStrategy<'a> {
    /// Creates the strategy.
    #[must_use]
    pub const fn new(binding: Binding<'a>, request: &'a Request) -> Self {
        Self { binding, request }
    }

    fn header_name(&self) -> String {
        match self.binding.settings().source() {
            Some(source) => source.to_ascii_lowercase(),
            None => self.binding.name().replace('_', "-").to_ascii_lowercase(),
        }
    }
}

impl ParamStrategy for HeaderStrategy<'_> {
    fn raw_value(&self) -> Raw {
        if self.binding.settings().is_wildcard() {
            return Raw::Json(self.request.headers_json());
        }
        self.request
            .headers()
            .get(self.header_name().as_str())
            .and_then(|value| value.to_str().ok())
            .map_or(Raw::Json(JsonValue::Null), Raw::from)
    }

    fn validate_or_error(&self) -> Result<Value, ParamError> {
        self.binding.validate(self.raw_value(), SourceKind::Header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use typed_views_core::{ErrorDetail, ParamSettings};
    use typed_views_validate::{CharKind, DefaultValidator, Field};

    fn request() -> Request {
        Request::builder()
            .header("X-Api-Key", "secret")
            .header("Accept", "application/json")
            .build()
    }

    fn raw(name: &str, settings: &ParamSettings) -> Raw {
        let request = request();
        let validator = DefaultValidator::default();
        HeaderStrategy::new(Binding::new(name, settings, &validator), &request).raw_value()
    }

    #[test]
    fn test_name_derived_from_parameter() {
        assert_eq!(raw("x_api_key", &ParamSettings::header().build().unwrap()), Raw::from("secret"));
    }

    #[test]
    fn test_source_is_case_insensitive() {
        let settings = ParamSettings::header().source("ACCEPT").build().unwrap();
        assert_eq!(raw("fmt", &settings), Raw::from("application/json"));
    }

    #[test]
    fn test_missing_header_is_null() {
        assert_eq!(
            raw("x_trace", &ParamSettings::header().build().unwrap()),
            Raw::Json(JsonValue::Null)
        );
    }

    #[test]
    fn test_missing_header_fails_as_null() {
        let request = request();
        let settings = ParamSettings::header().build().unwrap();
        let validator = Field::new(CharKind::new(&settings, None), None);
        let err = HeaderStrategy::new(Binding::new("cache", &settings, &validator), &request)
            .validate_or_error()
            .unwrap_err();
        assert_eq!(err.key(), "cache");
        assert_eq!(err.detail(), &ErrorDetail::message("This field may not be null."));
    }

    #[test]
    fn test_wildcard() {
        let settings = ParamSettings::header().source("*").build().unwrap();
        assert_eq!(
            raw("headers", &settings),
            Raw::Json(json!({"x-api-key": "secret", "accept": "application/json"}))
        );
    }
}
