//! Path captures.

use super::{Binding, ParamStrategy};
use crate::error::ParamError;
use typed_views_core::{PathCaptures, Raw, SourceKind, Value};

/// Reads a value captured by the router.
#[derive(Debug)]
pub struct PathStrategy<'a> {
    binding: Binding<'a>,
    raw: Raw,
}

impl<'a> PathStrategy<'a> {
    /// Looks the capture up by the binding's key; a missing capture is the
    /// empty sentinel.
    #[must_use]
    pub fn new(binding: Binding<'a>, captures: &PathCaptures) -> Self {
        let raw = captures.get(binding.key()).cloned().into();
        Self { binding, raw }
    }

    /// Looks the capture up by the parameter name. Used when the parameter
    /// was matched to the path implicitly, whatever its source knob says.
    #[must_use]
    pub fn by_name(binding: Binding<'a>, captures: &PathCaptures) -> Self {
        let raw = captures.get(binding.name()).cloned().into();
        Self { binding, raw }
    }
}

impl ParamStrategy for PathStrategy<'_> {
    fn raw_value(&self) -> Raw {
        self.raw.clone()
    }

    fn validate_or_error(&self) -> Result<Value, ParamError> {
        self.binding.validate(self.raw_value(), SourceKind::Path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typed_views_core::{ErrorDetail, ParamSettings};
    use typed_views_validate::{Field, IntegerKind};

    #[test]
    fn test_reads_capture() {
        let validator = Field::new(IntegerKind::default(), None);
        let settings = ParamSettings::default();
        let captures = PathCaptures::new().with("id", "7");
        let strategy = PathStrategy::new(Binding::new("id", &settings, &validator), &captures);
        assert_eq!(strategy.validate_or_error(), Ok(Value::Int(7)));
    }

    #[test]
    fn test_source_override() {
        let validator = Field::new(IntegerKind::default(), None);
        let settings = ParamSettings::path().source("pk").build().unwrap();
        let captures = PathCaptures::new().with("pk", "3");
        let strategy = PathStrategy::new(Binding::new("id", &settings, &validator), &captures);
        assert_eq!(strategy.validate_or_error(), Ok(Value::Int(3)));
    }

    #[test]
    fn test_by_name_ignores_source() {
        let validator = Field::new(IntegerKind::default(), None);
        let settings = ParamSettings::param().source("pk").build().unwrap();
        let captures = PathCaptures::new().with("id", "9");
        let strategy = PathStrategy::by_name(Binding::new("id", &settings, &validator), &captures);
        assert_eq!(strategy.validate_or_error(), Ok(Value::Int(9)));
    }

    #[test]
    fn test_missing_capture_is_empty() {
        let validator = Field::new(IntegerKind::default(), None);
        let settings = ParamSettings::default();
        let strategy = PathStrategy::new(
            Binding::new("id", &settings, &validator),
            &PathCaptures::new(),
        );
        assert!(strategy.raw_value().is_empty());
        let err = strategy.validate_or_error().unwrap_err();
        assert_eq!(err.detail(), &ErrorDetail::message("This field is required."));
    }
}
