//! Fixed-point decimal fields.

use crate::field::{collect, messages, FieldKind};
use crate::numeric::{Bounds, MAX_STRING_LENGTH};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use typed_views_core::{ErrorDetail, ParamSettings, Rounding, Value};

/// A decimal field with digit limits, quantization and optional string output.
#[derive(Debug, Clone)]
pub struct DecimalKind {
    bounds: Bounds,
    max_digits: Option<u32>,
    decimal_places: Option<u32>,
    rounding: Rounding,
    coerce_to_string: bool,
    localize: bool,
}

impl DecimalKind {
    /// Builds a decimal kind from settings.
    #[must_use]
    pub fn new(settings: &ParamSettings) -> Self {
        Self {
            bounds: Bounds::from_settings(settings),
            max_digits: settings.max_digits(),
            decimal_places: settings.decimal_places(),
            rounding: settings.rounding().unwrap_or(Rounding::HalfEven),
            coerce_to_string: settings.coerce_to_string(),
            localize: settings.localize(),
        }
    }

    fn parse(&self, data: &JsonValue) -> Result<Decimal, ErrorDetail> {
        let invalid = || ErrorDetail::message(messages::INVALID_NUMBER);
        let text = match data {
            JsonValue::String(s) => s.trim().to_string(),
            JsonValue::Number(n) => n.to_string(),
            _ => return Err(invalid()),
        };
        let text = if self.localize {
            text.replace(',', "")
        } else {
            text
        };
        if text.len() > MAX_STRING_LENGTH {
            return Err(ErrorDetail::message(messages::MAX_STRING_LENGTH));
        }
        text.parse::<Decimal>()
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(|_| invalid())
    }

    fn precision_error(&self, value: Decimal) -> Option<String> {
        let digits = u32::try_from(value.mantissa().unsigned_abs().to_string().len()).unwrap_or(u32::MAX);
        let scale = value.scale();
        let (total_digits, whole_digits, decimal_places) = if scale == 0 {
            (digits, digits, 0)
        } else if digits > scale {
            (digits, digits - scale, scale)
        } else {
            (scale, 0, scale)
        };

        if let Some(max_digits) = self.max_digits {
            if total_digits > max_digits {
                return Some(format!(
                    "Ensure that there are no more than {max_digits} digits in total."
                ));
            }
        }
        if let Some(places) = self.decimal_places {
            if decimal_places > places {
                return Some(format!(
                    "Ensure that there are no more than {places} decimal places."
                ));
            }
        }
        if let (Some(max_digits), Some(places)) = (self.max_digits, self.decimal_places) {
            let max_whole = max_digits.saturating_sub(places);
            if whole_digits > max_whole {
                return Some(format!(
                    "Ensure that there are no more than {max_whole} digits before the decimal point."
                ));
            }
        }
        None
    }

    fn quantize(&self, value: Decimal) -> Decimal {
        match self.decimal_places {
            Some(places) => {
                let mut rounded = value.round_dp_with_strategy(places, self.rounding.strategy());
                rounded.rescale(places);
                rounded
            }
            None => value,
        }
    }
}

impl FieldKind for DecimalKind {
    fn to_internal_value(&self, data: &JsonValue) -> Result<Value, ErrorDetail> {
        let value = self.parse(data)?;

        if let Some(message) = self.precision_error(value) {
            return Err(ErrorDetail::message(message));
        }
        let value = self.quantize(value);

        let errors = self.bounds.check(value, |limit| Decimal::try_from(limit).ok());
        let value = if self.coerce_to_string {
            Value::Str(value.to_string())
        } else {
            Value::Decimal(value)
        };
        collect(value, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use typed_views_core::ParamSettingsBuilder;

    fn decimal_kind(build: impl FnOnce(ParamSettingsBuilder) -> ParamSettingsBuilder) -> DecimalKind {
        DecimalKind::new(&build(ParamSettings::param()).build().unwrap())
    }

    #[test]
    fn test_parses_strings_and_numbers() {
        let kind = decimal_kind(|b| b);
        assert_eq!(
            kind.to_internal_value(&json!("1.50")),
            Ok(Value::Decimal(Decimal::new(150, 2)))
        );
        assert_eq!(
            kind.to_internal_value(&json!(2)),
            Ok(Value::Decimal(Decimal::new(2, 0)))
        );
        assert_eq!(
            kind.to_internal_value(&json!("1e2")),
            Ok(Value::Decimal(Decimal::new(100, 0)))
        );
        assert_eq!(
            kind.to_internal_value(&json!("abc")),
            Err(ErrorDetail::message("A valid number is required."))
        );
    }

    #[test]
    fn test_max_digits() {
        let kind = decimal_kind(|b| b.max_digits(4).decimal_places(2));
        assert_eq!(
            kind.to_internal_value(&json!("123.45")),
            Err(ErrorDetail::message(
                "Ensure that there are no more than 4 digits in total."
            ))
        );
    }

    #[test]
    fn test_whole_digits() {
        let kind = decimal_kind(|b| b.max_digits(5).decimal_places(3));
        assert_eq!(
            kind.to_internal_value(&json!("123.4")),
            Err(ErrorDetail::message(
                "Ensure that there are no more than 2 digits before the decimal point."
            ))
        );
    }

    #[test]
    fn test_decimal_places() {
        let kind = decimal_kind(|b| b.decimal_places(1));
        assert_eq!(
            kind.to_internal_value(&json!("1.25")),
            Err(ErrorDetail::message(
                "Ensure that there are no more than 1 decimal places."
            ))
        );
    }

    #[test]
    fn test_quantize_pads_places() {
        let kind = decimal_kind(|b| b.decimal_places(3).rounding("ROUND_HALF_UP"));
        assert_eq!(
            kind.to_internal_value(&json!("1.5")),
            Ok(Value::Decimal(Decimal::new(1500, 3)))
        );
    }

    #[test]
    fn test_coerce_to_string_and_localize() {
        let kind = decimal_kind(|b| b.coerce_to_string(true).localize(true));
        assert_eq!(
            kind.to_internal_value(&json!("1,234.5")),
            Ok(Value::from("1234.5"))
        );
    }

    #[test]
    fn test_bounds() {
        let kind = decimal_kind(|b| b.max_value(10.0));
        assert_eq!(
            kind.to_internal_value(&json!("10.01")),
            Err(ErrorDetail::message(
                "Ensure this value is less than or equal to 10."
            ))
        );
    }
}
