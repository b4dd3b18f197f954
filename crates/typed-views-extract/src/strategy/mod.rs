//! Extraction strategies.
//!
//! A strategy knows where one parameter's raw value lives in the request and
//! runs the parameter's validator over it. Strategies are created per
//! request and borrow everything they need.

mod body;
mod current_user;
mod header;
mod passthrough;
mod path;
mod query;

pub use body::BodyStrategy;
pub use current_user::CurrentUserStrategy;
pub use header::HeaderStrategy;
pub use passthrough::PassthroughStrategy;
pub use path::PathStrategy;
pub use query::QueryStrategy;

use crate::error::ParamError;
use serde_json::Value as JsonValue;
use typed_views_core::{ParamSettings, Raw, SourceKind, Value};
use typed_views_validate::Validator;

/// Produces and validates the raw value of one parameter.
pub trait ParamStrategy {
    /// The raw value as found in the request.
    fn raw_value(&self) -> Raw;

    /// Validates the raw value.
    ///
    /// # Errors
    ///
    /// Returns a [`ParamError`] keyed by the parameter's source key.
    fn validate_or_error(&self) -> Result<Value, ParamError>;
}

/// What every validating strategy shares: a parameter, its settings and its
/// validator.
#[derive(Debug, Clone, Copy)]
pub struct Binding<'a> {
    name: &'a str,
    settings: &'a ParamSettings,
    validator: &'a dyn Validator,
}

impl<'a> Binding<'a> {
    /// Creates a binding.
    #[must_use]
    pub const fn new(name: &'a str, settings: &'a ParamSettings, validator: &'a dyn Validator) -> Self {
        Self {
            name,
            settings,
            validator,
        }
    }

    /// The parameter name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// The parameter's settings.
    #[must_use]
    pub const fn settings(&self) -> &'a ParamSettings {
        self.settings
    }

    /// The key values are looked up by and errors are reported under.
    #[must_use]
    pub fn key(&self) -> &'a str {
        self.settings.source().unwrap_or(self.name)
    }

    /// Runs the validator, tagging failures with the key and source kind.
    ///
    /// # Errors
    ///
    /// Returns a [`ParamError`] when validation fails.
    pub fn validate(&self, raw: Raw, kind: SourceKind) -> Result<Value, ParamError> {
        self.validator
            .run_validation(raw)
            .map_err(|detail| ParamError::new(self.key(), kind, detail))
    }
}

/// Walks a dotted path through objects and arrays.
///
/// Numeric segments index arrays. Returns `None` at the first missing segment.
pub(crate) fn lookup_path<'v>(root: &'v JsonValue, path: &str) -> Option<&'v JsonValue> {
    path.split('.').try_fold(root, |current, segment| match current {
        JsonValue::Object(map) => map.get(segment),
        JsonValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
