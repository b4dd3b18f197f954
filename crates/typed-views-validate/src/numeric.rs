//! Integer and floating-point fields.

use crate::field::{collect, messages, FieldKind};
use crate::patterns;
use serde_json::Value as JsonValue;
use typed_views_core::{ErrorDetail, ParamSettings, Value};

/// Longest numeric string accepted before parsing.
pub(crate) const MAX_STRING_LENGTH: usize = 1000;

/// Numeric bounds shared by the numeric kinds.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bounds {
    min: Option<f64>,
    max: Option<f64>,
}

impl Bounds {
    /// Reads the bounds from settings.
    #[must_use]
    pub const fn from_settings(settings: &ParamSettings) -> Self {
        Self {
            min: settings.min_value(),
            max: settings.max_value(),
        }
    }

    pub(crate) fn check<T: PartialOrd + Copy>(
        &self,
        value: T,
        convert: impl Fn(f64) -> Option<T>,
    ) -> Vec<String> {
        let mut errors = Vec::new();
        if let Some(max) = self.max {
            if convert(max).is_some_and(|limit| value > limit) {
                errors.push(messages::max_value(max));
            }
        }
        if let Some(min) = self.min {
            if convert(min).is_some_and(|limit| value < limit) {
                errors.push(messages::min_value(min));
            }
        }
        errors
    }
}

/// An integer field. Whole-number floats and strings such as `"5.0"` are
/// accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerKind {
    bounds: Bounds,
}

impl IntegerKind {
    /// Builds an integer kind from settings.
    #[must_use]
    pub const fn new(settings: &ParamSettings) -> Self {
        Self {
            bounds: Bounds::from_settings(settings),
        }
    }
}

impl FieldKind for IntegerKind {
    fn to_internal_value(&self, data: &JsonValue) -> Result<Value, ErrorDetail> {
        let text = match data {
            JsonValue::String(s) if s.len() > MAX_STRING_LENGTH => {
                return Err(ErrorDetail::message(messages::MAX_STRING_LENGTH));
            }
            JsonValue::String(s) => s.clone(),
            JsonValue::Number(n) => n.to_string(),
            _ => return Err(ErrorDetail::message(messages::INVALID_INTEGER)),
        };
        let stripped = patterns::decimal_tail().replace(&text, "");
        let value: i64 = stripped
            .trim()
            .parse()
            .map_err(|_| ErrorDetail::message(messages::INVALID_INTEGER))?;

        let errors = self.bounds.check(value as f64, Some);
        collect(Value::Int(value), errors)
    }
}

/// A floating-point field.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatKind {
    bounds: Bounds,
}

impl FloatKind {
    /// Builds a float kind from settings.
    #[must_use]
    pub const fn new(settings: &ParamSettings) -> Self {
        Self {
            bounds: Bounds::from_settings(settings),
        }
    }
}

impl FieldKind for FloatKind {
    fn to_internal_value(&self, data: &JsonValue) -> Result<Value, ErrorDetail> {
        let invalid = || ErrorDetail::message(messages::INVALID_NUMBER);
        let value = match data {
            JsonValue::String(s) if s.len() > MAX_STRING_LENGTH => {
                return Err(ErrorDetail::message(messages::MAX_STRING_LENGTH));
            }
            JsonValue::String(s) => s.trim().parse::<f64>().map_err(|_| invalid())?,
            JsonValue::Number(n) => n.as_f64().ok_or_else(invalid)?,
            JsonValue::Bool(b) => f64::from(u8::from(*b)),
            _ => return Err(invalid()),
        };
        let errors = self.bounds.check(value, Some);
        collect(Value::Float(value), errors)
    }
}
