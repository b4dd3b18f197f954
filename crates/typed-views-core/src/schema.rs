//! The complex-schema adapter seam.
//!
//! A complex-schema type is validated by a pluggable engine rather than by
//! the built-in scalar validators. Engines are grouped into families; the
//! host enables families through configuration and only enabled families are
//! considered when resolving parameters.

use crate::error::ErrorDetail;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The families of schema engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaFamily {
    /// Model types parsed with serde.
    Serde,
    /// Types checked by `validator` rules after parsing.
    Validator,
    /// Declared field schemas checked by the built-in validators.
    Declarative,
}

impl SchemaFamily {
    /// All families.
    pub const ALL: [Self; 3] = [Self::Serde, Self::Validator, Self::Declarative];

    /// The configuration name of the family.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Serde => "serde",
            Self::Validator => "validator",
            Self::Declarative => "declarative",
        }
    }
}

impl fmt::Display for SchemaFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a family name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown schema family '{0}' (expected serde, validator or declarative)")]
pub struct UnknownSchemaFamily(pub String);

impl FromStr for SchemaFamily {
    type Err = UnknownSchemaFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serde" => Ok(Self::Serde),
            "validator" => Ok(Self::Validator),
            "declarative" => Ok(Self::Declarative),
            other => Err(UnknownSchemaFamily(other.to_string())),
        }
    }
}

/// A validator backed by a schema engine.
///
/// Errors are returned in the engine's own shape, wrapped in
/// [`ErrorDetail::Native`]. They are not normalised.
pub trait SchemaAdapter: Send + Sync + 'static {
    /// The engine family.
    fn family(&self) -> SchemaFamily;

    /// The schema type name, for logs and error messages.
    fn type_name(&self) -> &'static str;

    /// Validates a JSON value against the schema.
    ///
    /// # Errors
    ///
    /// Returns the engine-native error payload when validation fails.
    fn run_validation(&self, data: JsonValue) -> Result<Value, ErrorDetail>;
}

/// A declared complex-schema type.
#[derive(Clone)]
pub struct SchemaType {
    adapter: Arc<dyn SchemaAdapter>,
}

impl SchemaType {
    /// Wraps an adapter.
    #[must_use]
    pub fn new(adapter: impl SchemaAdapter) -> Self {
        Self {
            adapter: Arc::new(adapter),
        }
    }

    /// The engine family.
    #[must_use]
    pub fn family(&self) -> SchemaFamily {
        self.adapter.family()
    }

    /// The schema type name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.adapter.type_name()
    }

    /// The adapter.
    #[must_use]
    pub fn adapter(&self) -> Arc<dyn SchemaAdapter> {
        Arc::clone(&self.adapter)
    }
}

impl fmt::Debug for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaType")
            .field("name", &self.name())
            .field("family", &self.family())
            .finish()
    }
}
