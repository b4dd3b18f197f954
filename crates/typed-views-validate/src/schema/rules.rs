//! Serde types checked with `validator` rules.
//!
//! Failures are reported as `{field: [messages]}` with keys sorted.

use super::short_type_name;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use typed_views_core::{ErrorDetail, Instance, SchemaAdapter, SchemaFamily, SchemaType, TypeSpec, Value};
use validator::Validate;

const SCHEMA_KEY: &str = "_schema";
const MISSING: &str = "Missing data for required field.";

/// A type with `validator` rules as a complex schema.
pub struct RulesSchema<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> RulesSchema<T> {
    /// Creates the schema.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for RulesSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Declares `T` as a rule-checked parameter type.
///
/// Rules run only once the input deserialises. Deserialisation stops at the
/// first error, so an input missing several required fields reports only the
/// first one in declaration order, and no rule messages.
#[must_use]
pub fn rules<T>() -> TypeSpec
where
    T: DeserializeOwned + Serialize + Validate + Send + Sync + 'static,
{
    TypeSpec::Schema(SchemaType::new(RulesSchema::<T>::new()))
}

impl<T> SchemaAdapter for RulesSchema<T>
where
    T: DeserializeOwned + Serialize + Validate + Send + Sync + 'static,
{
    fn family(&self) -> SchemaFamily {
        SchemaFamily::Validator
    }

    fn type_name(&self) -> &'static str {
        short_type_name::<T>()
    }

    fn run_validation(&self, data: JsonValue) -> Result<Value, ErrorDetail> {
        if !data.is_object() {
            return Err(single(SCHEMA_KEY, "Invalid input type.".to_string()));
        }
        let instance: T = serde_json::from_value(data).map_err(|e| parse_error(&e))?;
        instance.validate().map_err(|e| rule_errors(&e))?;
        let json = serde_json::to_value(&instance)
            .map_err(|e| single(SCHEMA_KEY, e.to_string()))?;
        Ok(Value::Instance(Instance::new(short_type_name::<T>(), instance, json)))
    }
}

fn single(key: &str, message: String) -> ErrorDetail {
    let mut map = Map::new();
    map.insert(key.to_string(), JsonValue::from(vec![message]));
    ErrorDetail::Native(JsonValue::Object(map))
}

fn parse_error(error: &serde_json::Error) -> ErrorDetail {
    let message = error.to_string();
    if let Some(field) = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
    {
        return single(field, MISSING.to_string());
    }
    let message = message.split(" at line ").next().unwrap_or(&message);
    single(SCHEMA_KEY, message.to_string())
}

fn rule_errors(errors: &validator::ValidationErrors) -> ErrorDetail {
    let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (field, field_errors) in errors.field_errors() {
        let messages = fields.entry(field.to_string()).or_default();
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map_or_else(|| format!("Invalid value ({}).", error.code), ToString::to_string);
            messages.push(message);
        }
    }
    let object = fields
        .into_iter()
        .map(|(field, messages)| (field, JsonValue::from(messages)))
        .collect();
    ErrorDetail::Native(JsonValue::Object(object))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, Serialize, Validate)]
    struct Signup {
        #[validate(length(min = 3, message = "Shorter than minimum length 3."))]
        username: String,
        #[validate(range(min = 18))]
        age: u32,
    }

    fn schema() -> RulesSchema<Signup> {
        RulesSchema::new()
    }

    #[test]
    fn test_valid() {
        let value = schema()
            .run_validation(json!({"username": "ann", "age": 30}))
            .unwrap();
        let Value::Instance(instance) = value else {
            panic!("expected an instance");
        };
        assert_eq!(instance.downcast_ref::<Signup>().unwrap().username, "ann");
    }

    #[test]
    fn test_rule_failures() {
        let err = schema()
            .run_validation(json!({"username": "al", "age": 12}))
            .unwrap_err();
        assert_eq!(
            err.to_json(),
            json!({
                "age": ["Invalid value (range)."],
                "username": ["Shorter than minimum length 3."]
            })
        );
    }

    #[test]
    fn test_missing_field() {
        let err = schema().run_validation(json!({"username": "ann"})).unwrap_err();
        assert_eq!(err.to_json(), json!({"age": ["Missing data for required field."]}));
    }

    #[test]
    fn test_reports_first_missing_field_only() {
        let err = schema().run_validation(json!({})).unwrap_err();
        assert_eq!(
            err.to_json(),
            json!({"username": ["Missing data for required field."]})
        );
    }

    #[test]
    fn test_not_an_object() {
        let err = schema().run_validation(json!("ann")).unwrap_err();
        assert_eq!(err.to_json(), json!({"_schema": ["Invalid input type."]}));
    }
}
