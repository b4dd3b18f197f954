//! Passthrough: hands a value to the handler without validation.

use super::ParamStrategy;
use crate::error::ParamError;
use typed_views_core::{Raw, Value};

/// Yields a fixed value, typically the request itself.
#[derive(Debug, Clone)]
pub struct PassthroughStrategy {
    value: Value,
}

impl PassthroughStrategy {
    /// Wraps the value to pass through.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self { value }
    }
}

impl ParamStrategy for PassthroughStrategy {
    fn raw_value(&self) -> Raw {
        Raw::Json(self.value.to_json())
    }

    fn validate_or_error(&self) -> Result<Value, ParamError> {
        Ok(self.value.clone())
    }
}
