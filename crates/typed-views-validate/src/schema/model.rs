//! Serde model schemas.
//!
//! Input is deserialised straight into the model type. Failures are reported
//! as a list of `{"loc", "msg", "type"}` entries.

use super::short_type_name;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::marker::PhantomData;
use typed_views_core::{ErrorDetail, Instance, SchemaAdapter, SchemaFamily, SchemaType, TypeSpec, Value};

const ROOT: &str = "__root__";

/// A serde model type as a complex schema.
pub struct ModelSchema<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> ModelSchema<T> {
    /// Creates the schema.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for ModelSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Declares `T` as a serde-model parameter type.
///
/// Deserialisation stops at the first error, so an input missing several
/// required fields reports only the first one in declaration order.
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use typed_views_core::SchemaFamily;
///
/// #[derive(Deserialize, Serialize)]
/// struct Filter {
///     tag: String,
/// }
///
/// let ty = typed_views_validate::model::<Filter>();
/// assert_eq!(ty.schema().unwrap().family(), SchemaFamily::Serde);
/// ```
#[must_use]
pub fn model<T>() -> TypeSpec
where
    T: DeserializeOwned + Serialize + Send + Sync + 'static,
{
    TypeSpec::Schema(SchemaType::new(ModelSchema::<T>::new()))
}

impl<T> SchemaAdapter for ModelSchema<T>
where
    T: DeserializeOwned + Serialize + Send + Sync + 'static,
{
    fn family(&self) -> SchemaFamily {
        SchemaFamily::Serde
    }

    fn type_name(&self) -> &'static str {
        short_type_name::<T>()
    }

    fn run_validation(&self, data: JsonValue) -> Result<Value, ErrorDetail> {
        if !data.is_object() {
            return Err(native_error(ROOT, "value is not a valid dict", "type_error.dict"));
        }
        let instance: T = serde_json::from_value(data).map_err(|e| model_error(&e))?;
        let json = serde_json::to_value(&instance)
            .map_err(|e| native_error(ROOT, &e.to_string(), "value_error"))?;
        Ok(Value::Instance(Instance::new(short_type_name::<T>(), instance, json)))
    }
}

fn native_error(loc: &str, msg: &str, kind: &str) -> ErrorDetail {
    ErrorDetail::Native(json!([{ "loc": [loc], "msg": msg, "type": kind }]))
}

fn model_error(error: &serde_json::Error) -> ErrorDetail {
    let message = error.to_string();
    if let Some(field) = quoted_field(&message, "missing field `") {
        return native_error(field, "field required", "value_error.missing");
    }
    if let Some(field) = quoted_field(&message, "unknown field `") {
        return native_error(field, "extra fields not permitted", "value_error.extra");
    }
    let msg = message
        .split(" at line ")
        .next()
        .unwrap_or(&message)
        .to_string();
    native_error(ROOT, &msg, "type_error")
}

fn quoted_field<'a>(message: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = message.strip_prefix(prefix)?;
    rest.split('`').next()
}
