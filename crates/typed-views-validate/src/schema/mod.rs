//! Complex-schema support.
//!
//! Three engine families are provided:
//!
//! - [`ModelSchema`] - serde model types
//! - [`RulesSchema`] - serde types with `validator` rules
//! - [`DeclarativeSchema`] - field schemas declared at runtime and checked by
//!   the built-in validators
//!
//! A [`SchemaRegistry`] records which families the host enabled. Schema types
//! from disabled families are treated like any other unknown type.

mod declarative;
mod model;
mod rules;

pub use declarative::DeclarativeSchema;
pub use model::{model, ModelSchema};
pub use rules::{rules, RulesSchema};

use crate::field::FieldKind;
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;
use std::fmt;
use typed_views_core::schema::UnknownSchemaFamily;
use typed_views_core::{ErrorDetail, SchemaFamily, SchemaType, TypeSpec, Value};

/// The set of enabled schema families.
///
/// # Example
///
/// ```
/// use typed_views_core::SchemaFamily;
/// use typed_views_validate::SchemaRegistry;
///
/// let registry = SchemaRegistry::from_names(["serde"]).unwrap();
/// assert!(registry.is_enabled(SchemaFamily::Serde));
/// assert!(!registry.is_enabled(SchemaFamily::Validator));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRegistry {
    enabled: BTreeSet<SchemaFamily>,
}

impl SchemaRegistry {
    /// A registry with no families enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every family enabled.
    #[must_use]
    pub fn all() -> Self {
        Self {
            enabled: SchemaFamily::ALL.into_iter().collect(),
        }
    }

    /// Enables a family.
    #[must_use]
    pub fn with_family(mut self, family: SchemaFamily) -> Self {
        self.enabled.insert(family);
        self
    }

    /// Builds a registry from configured family names.
    ///
    /// # Errors
    ///
    /// Returns an error if a name does not match any family.
    pub fn from_names<I, S>(names: I) -> Result<Self, UnknownSchemaFamily>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let enabled = names
            .into_iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<_, _>>()?;
        Ok(Self { enabled })
    }

    /// Returns `true` if the family is enabled.
    #[must_use]
    pub fn is_enabled(&self, family: SchemaFamily) -> bool {
        self.enabled.contains(&family)
    }

    /// Returns the schema if `ty` is a schema type from an enabled family.
    #[must_use]
    pub fn complex_schema<'a>(&self, ty: &'a TypeSpec) -> Option<&'a SchemaType> {
        ty.schema().filter(|schema| self.is_enabled(schema.family()))
    }

    /// The enabled families, in a stable order.
    pub fn families(&self) -> impl Iterator<Item = SchemaFamily> + '_ {
        self.enabled.iter().copied()
    }
}

/// Field kind delegating to a schema adapter.
pub struct SchemaKind {
    schema: SchemaType,
}

impl SchemaKind {
    /// Wraps a schema type.
    #[must_use]
    pub const fn new(schema: SchemaType) -> Self {
        Self { schema }
    }
}

impl fmt::Debug for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SchemaKind").field(&self.schema).finish()
    }
}

impl FieldKind for SchemaKind {
    fn to_internal_value(&self, data: &JsonValue) -> Result<Value, ErrorDetail> {
        self.schema.adapter().run_validation(data.clone())
    }
}

/// The schema type name used in logs: the last path segment of the Rust type.
pub(crate) fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
