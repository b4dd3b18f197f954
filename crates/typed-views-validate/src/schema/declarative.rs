//! Field schemas declared at runtime.
//!
//! Each field is checked by the same validators handler parameters use.
//! Failures are reported as `{field: "message"}`, one message per field.

use crate::factory::ValidatorFactory;
use crate::field::Validator;
use crate::schema::SchemaRegistry;
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::sync::Arc;
use typed_views_core::{
    ErrorDetail, ParamSettings, Raw, SchemaAdapter, SchemaFamily, SchemaType, TypeSpec, Value,
};

/// A named set of typed fields.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use typed_views_core::{ParamSettings, SchemaAdapter, TypeSpec};
/// use typed_views_validate::DeclarativeSchema;
///
/// let schema = DeclarativeSchema::new("Range")
///     .field("lo", TypeSpec::Int, ParamSettings::default())
///     .field("hi", TypeSpec::Int, ParamSettings::default());
///
/// let err = schema.run_validation(json!({"lo": "x"})).unwrap_err();
/// assert_eq!(
///     err.to_json(),
///     json!({"lo": "A valid integer is required.", "hi": "This field is required."})
/// );
/// ```
pub struct DeclarativeSchema {
    name: &'static str,
    factory: ValidatorFactory,
    fields: Vec<(String, Box<dyn Validator>)>,
}

impl DeclarativeSchema {
    /// Starts an empty schema.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            factory: ValidatorFactory::new(Arc::new(SchemaRegistry::all())),
            fields: Vec::new(),
        }
    }

    /// Adds a field checked by the validator for `ty` and `settings`.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, ty: TypeSpec, settings: ParamSettings) -> Self {
        let validator = self.factory.make(&ty, &settings);
        self.fields.push((name.into(), validator));
        self
    }

    /// The declared field names.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Turns the schema into a parameter type.
    #[must_use]
    pub fn into_type(self) -> TypeSpec {
        TypeSpec::Schema(SchemaType::new(self))
    }
}

impl fmt::Debug for DeclarativeSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclarativeSchema")
            .field("name", &self.name)
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .finish()
    }
}

impl SchemaAdapter for DeclarativeSchema {
    fn family(&self) -> SchemaFamily {
        SchemaFamily::Declarative
    }

    fn type_name(&self) -> &'static str {
        self.name
    }

    fn run_validation(&self, data: JsonValue) -> Result<Value, ErrorDetail> {
        let JsonValue::Object(input) = data else {
            let mut errors = Map::new();
            errors.insert(String::new(), JsonValue::from("Must be an object."));
            return Err(ErrorDetail::Native(JsonValue::Object(errors)));
        };

        let mut output = Map::new();
        let mut errors = Map::new();
        for (name, validator) in &self.fields {
            let raw = input.get(name).cloned().map_or(Raw::Empty, Raw::Json);
            match validator.run_validation(raw) {
                Ok(value) => {
                    output.insert(name.clone(), value.to_json());
                }
                Err(detail) => {
                    let message = detail.first_message().unwrap_or_default();
                    errors.insert(name.clone(), JsonValue::String(message));
                }
            }
        }

        if errors.is_empty() {
            Ok(Value::Json(JsonValue::Object(output)))
        } else {
            Err(ErrorDetail::Native(JsonValue::Object(errors)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> DeclarativeSchema {
        DeclarativeSchema::new("Profile")
            .field("name", TypeSpec::Str, ParamSettings::param().max_length(5).build().unwrap())
            .field(
                "age",
                TypeSpec::Int,
                ParamSettings::param().default(0_i64).build().unwrap(),
            )
    }

    #[test]
    fn test_valid_object() {
        assert_eq!(
            schema().run_validation(json!({"name": "ann", "age": "41"})),
            Ok(Value::Json(json!({"name": "ann", "age": 41})))
        );
    }

    #[test]
    fn test_defaults_apply() {
        assert_eq!(
            schema().run_validation(json!({"name": "ann"})),
            Ok(Value::Json(json!({"name": "ann", "age": 0})))
        );
    }

    #[test]
    fn test_errors_are_single_messages() {
        let err = schema()
            .run_validation(json!({"name": "annabel", "age": "x"}))
            .unwrap_err();
        assert_eq!(
            err.to_json(),
            json!({
                "name": "Ensure this field has no more than 5 characters.",
                "age": "A valid integer is required."
            })
        );
    }

    #[test]
    fn test_not_an_object() {
        let err = schema().run_validation(json!(3)).unwrap_err();
        assert_eq!(err.to_json(), json!({"": "Must be an object."}));
    }

    #[test]
    fn test_into_type() {
        let ty = schema().into_type();
        assert_eq!(ty.schema().map(SchemaType::name), Some("Profile"));
        assert_eq!(ty.schema().map(SchemaType::family), Some(SchemaFamily::Declarative));
    }
}
