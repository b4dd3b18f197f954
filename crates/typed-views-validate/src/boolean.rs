//! Boolean fields.

use crate::field::{messages, FieldKind};
use serde_json::Value as JsonValue;
use typed_views_core::{ErrorDetail, Value};

const TRUE_VALUES: &[&str] = &[
    "t", "T", "y", "Y", "yes", "Yes", "YES", "true", "True", "TRUE", "on", "On", "ON", "1",
];

const FALSE_VALUES: &[&str] = &[
    "f", "F", "n", "N", "no", "No", "NO", "false", "False", "FALSE", "off", "Off", "OFF", "0",
];

/// Accepts JSON booleans, `0`/`1`, and the usual textual spellings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanKind;

impl FieldKind for BooleanKind {
    fn to_internal_value(&self, data: &JsonValue) -> Result<Value, ErrorDetail> {
        let parsed = match data {
            JsonValue::Bool(b) => Some(*b),
            JsonValue::String(s) => {
                if TRUE_VALUES.contains(&s.as_str()) {
                    Some(true)
                } else if FALSE_VALUES.contains(&s.as_str()) {
                    Some(false)
                } else {
                    None
                }
            }
            JsonValue::Number(n) => match n.as_f64() {
                Some(v) if (v - 1.0).abs() < f64::EPSILON => Some(true),
                Some(v) if v.abs() < f64::EPSILON => Some(false),
                _ => None,
            },
            _ => None,
        };
        parsed
            .map(Value::Bool)
            .ok_or_else(|| ErrorDetail::message(messages::INVALID_BOOLEAN))
    }
}
