//! The transformation pipeline.
//!
//! Turns a request into the ordered argument list of a handler. Every bound
//! parameter is resolved, extracted and validated in declaration order. A
//! failing parameter never stops the others; all failures are reported
//! together.
//!
//! Validators are built once per signature by [`Pipeline::new`] and reused
//! for every request.

use crate::error::{ParamError, TransformError};
use crate::resolver::{check_captures, resolve, Resolution};
use crate::strategy::{
    Binding, BodyStrategy, CurrentUserStrategy, HeaderStrategy, ParamStrategy, PassthroughStrategy,
    PathStrategy, QueryStrategy,
};
use std::sync::Arc;
use tracing::{debug, error, warn};
use typed_views_core::{
    Args, ParamSettings, Parameter, PathCaptures, Request, Signature, SourceKind,
    ValidationErrors, Value,
};
use typed_views_telemetry::metrics::{record_resolution_error, record_validation_failure};
use typed_views_validate::{MembershipValidator, SchemaRegistry, Validator, ValidatorFactory};

/// A parameter together with its effective settings and prebuilt validators.
#[derive(Debug)]
pub struct PreparedParam {
    param: Parameter,
    settings: ParamSettings,
    validator: Box<dyn Validator>,
    membership: MembershipValidator,
}

impl PreparedParam {
    /// Prepares a parameter.
    ///
    /// The effective settings are the explicit binding (or the defaults)
    /// carrying the effective default.
    #[must_use]
    pub fn new(param: &Parameter, factory: &ValidatorFactory) -> Self {
        let settings = param
            .binding()
            .cloned()
            .unwrap_or_default()
            .with_default(param.effective_default().cloned());
        let validator = factory.make(param.ty(), &settings);
        let membership = MembershipValidator::new(&settings);

        Self {
            param: param.clone(),
            settings,
            validator,
            membership,
        }
    }

    /// The declared parameter.
    #[must_use]
    pub const fn param(&self) -> &Parameter {
        &self.param
    }

    /// The effective settings.
    #[must_use]
    pub const fn settings(&self) -> &ParamSettings {
        &self.settings
    }

    fn extract(
        &self,
        resolution: Resolution,
        request: &Arc<Request>,
        captures: &PathCaptures,
    ) -> Result<Value, ParamError> {
        let binding = Binding::new(self.param.name(), &self.settings, &*self.validator);

        match resolution {
            Resolution::Request => {
                PassthroughStrategy::new(Value::Request(Arc::clone(request))).validate_or_error()
            }
            Resolution::Source { kind, implicit } => match kind {
                SourceKind::Path if implicit => {
                    PathStrategy::by_name(binding, captures).validate_or_error()
                }
                SourceKind::Path => PathStrategy::new(binding, captures).validate_or_error(),
                SourceKind::Query => {
                    let is_list = self.param.ty().list_item().is_some();
                    QueryStrategy::new(binding, request.query(), is_list).validate_or_error()
                }
                SourceKind::Body => BodyStrategy::new(binding, request.data()).validate_or_error(),
                SourceKind::Header => HeaderStrategy::new(binding, request).validate_or_error(),
                SourceKind::CurrentUser => {
                    CurrentUserStrategy::new(binding, request.principal(), &self.membership)
                        .validate_or_error()
                }
            },
        }
    }
}

/// The prepared pipeline for one handler signature.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use typed_views_core::{Parameter, PathCaptures, Request, Signature, TypeSpec, Value};
/// use typed_views_extract::Pipeline;
/// use typed_views_validate::{SchemaRegistry, ValidatorFactory};
///
/// let signature = Signature::new("item_detail")
///     .param(Parameter::new("id", TypeSpec::Int))
///     .param(Parameter::new("q", TypeSpec::Str));
/// let factory = ValidatorFactory::new(Arc::new(SchemaRegistry::all()));
/// let pipeline = Pipeline::new(&signature, &factory);
///
/// let request = Arc::new(Request::builder().uri("/items/5?q=hello").build());
/// let captures = PathCaptures::new().with("id", "5");
/// let args = pipeline.transform(&request, &captures).unwrap();
///
/// assert_eq!(args.get(0), Some(&Value::Int(5)));
/// assert_eq!(args.get(1), Some(&Value::from("hello")));
/// ```
#[derive(Debug)]
pub struct Pipeline {
    signature: Signature,
    registry: SchemaRegistry,
    params: Vec<PreparedParam>,
}

impl Pipeline {
    /// Prepares every bound parameter of the signature.
    #[must_use]
    pub fn new(signature: &Signature, factory: &ValidatorFactory) -> Self {
        let params = signature
            .bound_params()
            .map(|param| PreparedParam::new(param, factory))
            .collect();

        Self {
            signature: signature.clone(),
            registry: factory.registry().clone(),
            params,
        }
    }

    /// The signature this pipeline was prepared for.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The prepared parameters, in declaration order.
    #[must_use]
    pub fn params(&self) -> &[PreparedParam] {
        &self.params
    }

    /// Resolves, extracts and validates every parameter.
    ///
    /// # Errors
    ///
    /// - [`TransformError::Resolution`] if the captures do not fit the signature
    /// - [`TransformError::Validation`] with every failed parameter, keyed by
    ///   source key; a later failure under the same key replaces the earlier one
    pub fn transform(
        &self,
        request: &Arc<Request>,
        captures: &PathCaptures,
    ) -> Result<Args, TransformError> {
        let endpoint = self.signature.name();
        let request_id = request.request_id();

        if let Err(err) = check_captures(&self.signature, captures) {
            error!(request_id = %request_id, endpoint, error = %err, "path captures do not fit the handler");
            record_resolution_error(endpoint);
            return Err(err.into());
        }

        let mut values = Vec::with_capacity(self.params.len());
        let mut errors = ValidationErrors::new();

        for prepared in &self.params {
            let resolution = resolve(&prepared.param, captures, &self.registry);
            debug!(
                request_id = %request_id,
                endpoint,
                parameter = prepared.param.name(),
                source = %resolution,
                "resolved parameter"
            );

            match prepared.extract(resolution, request, captures) {
                Ok(value) => values.push(value),
                Err(err) => {
                    debug!(
                        request_id = %request_id,
                        endpoint,
                        parameter = prepared.param.name(),
                        source_key = err.key(),
                        "parameter failed validation"
                    );
                    record_validation_failure(err.source_kind().as_str());
                    let (key, detail) = err.into_parts();
                    errors.insert(key, detail);
                }
            }
        }

        if !errors.is_empty() {
            warn!(
                request_id = %request_id,
                endpoint,
                failed = errors.len(),
                "request failed parameter validation"
            );
            return Err(errors.into());
        }

        Ok(Args::new(values))
    }
}

/// Prepares a pipeline for `signature` and runs it once.
///
/// # Errors
///
/// See [`Pipeline::transform`].
pub fn transform(
    signature: &Signature,
    request: &Arc<Request>,
    captures: &PathCaptures,
    factory: &ValidatorFactory,
) -> Result<Args, TransformError> {
    Pipeline::new(signature, factory).transform(request, captures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use typed_views_core::{ErrorDetail, Principal, TypeSpec};
    use typed_views_validate::model;

    #[derive(Debug, Serialize, Deserialize)]
    struct NewItem {
        name: String,
        price: f64,
    }

    fn factory() -> ValidatorFactory {
        ValidatorFactory::new(Arc::new(SchemaRegistry::all()))
    }

    fn run(signature: &Signature, request: Request, captures: &PathCaptures) -> Result<Args, TransformError> {
        transform(signature, &Arc::new(request), captures, &factory())
    }

    #[test]
    fn test_path_and_query_in_order() {
        let signature = Signature::new("detail")
            .param(Parameter::new("id", TypeSpec::Int))
            .param(Parameter::new("q", TypeSpec::Str));
        let request = Request::builder().uri("/items/7?q=hello").build();
        let args = run(&signature, request, &PathCaptures::new().with("id", "7")).unwrap();
        assert_eq!(args.into_vec(), vec![Value::Int(7), Value::from("hello")]);
    }

    #[test]
    fn test_collects_every_failure() {
        let signature = Signature::new("search")
            .param(Parameter::new("id", TypeSpec::Int))
            .param(Parameter::new("q", TypeSpec::Str))
            .param(Parameter::new("page", TypeSpec::Int).with_default(1));
        let request = Request::builder().uri("/search?id=abc").build();
        let err = run(&signature, request, &PathCaptures::new()).unwrap_err();

        let errors = err.validation_errors().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.to_json(),
            json!({
                "id": ["A valid integer is required."],
                "q": ["This field is required."]
            })
        );
        assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parameter_default() {
        let signature = Signature::new("list").param(Parameter::new("page", TypeSpec::Int).with_default(1));
        let args = run(&signature, Request::builder().uri("/list").build(), &PathCaptures::new()).unwrap();
        assert_eq!(args.arg::<i64>(0), Ok(1));
    }

    #[test]
    fn test_knob_only_binding() {
        let signature = Signature::new("list").param(
            Parameter::new("page", TypeSpec::Int)
                .bind(ParamSettings::param().min_value(1.0).build().unwrap()),
        );
        let err = run(&signature, Request::builder().uri("/list?page=0").build(), &PathCaptures::new())
            .unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap().get("page"),
            Some(&ErrorDetail::message("Ensure this value is greater than or equal to 1."))
        );
    }

    #[test]
    fn test_implicit_path_reads_capture_by_name() {
        let signature = Signature::new("detail").param(
            Parameter::new("id", TypeSpec::Int)
                .bind(ParamSettings::param().source("item").build().unwrap()),
        );
        let args = run(
            &signature,
            Request::builder().uri("/items/4").build(),
            &PathCaptures::new().with("id", "4"),
        )
        .unwrap();
        assert_eq!(args.arg::<i64>(0), Ok(4));
    }

    #[test]
    fn test_same_key_later_failure_wins() {
        let signature = Signature::new("clash")
            .param(Parameter::new("a", TypeSpec::Int).bind(ParamSettings::query().source("x").build().unwrap()))
            .param(
                Parameter::new("b", TypeSpec::Bool).bind(ParamSettings::query().source("x").build().unwrap()),
            );
        let err = run(&signature, Request::builder().uri("/c?x=nope").build(), &PathCaptures::new())
            .unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("x"), Some(&ErrorDetail::message("Must be a valid boolean.")));
    }

    #[test]
    fn test_request_passthrough() {
        let signature = Signature::new("raw")
            .param(Parameter::unannotated("request"))
            .param(Parameter::new("req", TypeSpec::Request));
        let request = Arc::new(Request::builder().uri("/raw").build());
        let args = Pipeline::new(&signature, &factory())
            .transform(&request, &PathCaptures::new())
            .unwrap();
        for value in args.iter() {
            match value {
                Value::Request(inner) => assert!(Arc::ptr_eq(inner, &request)),
                other => panic!("expected the request, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_schema_from_body() {
        let signature = Signature::new("create").param(Parameter::new("item", model::<NewItem>()));
        let request = Request::builder()
            .uri("/items")
            .json(json!({"name": "lamp", "price": 12.5}))
            .build();
        let args = run(&signature, request, &PathCaptures::new()).unwrap();
        let item = args.instance::<NewItem>(0).unwrap();
        assert_eq!(item.name, "lamp");
    }

    #[test]
    fn test_schema_native_errors() {
        let signature = Signature::new("create").param(Parameter::new("item", model::<NewItem>()));
        let request = Request::builder().uri("/items").json(json!({"name": "lamp"})).build();
        let err = run(&signature, request, &PathCaptures::new()).unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap().to_json(),
            json!({"item": [{"loc": ["price"], "msg": "field required", "type": "value_error.missing"}]})
        );
    }

    #[test]
    fn test_header_and_current_user() {
        let signature = Signature::new("me")
            .param(Parameter::new("x_api_key", TypeSpec::Str).bind(ParamSettings::header().build().unwrap()))
            .param(
                Parameter::new("user_id", TypeSpec::Str).bind(
                    ParamSettings::current_user()
                        .source("user_id")
                        .member_of("staff")
                        .build()
                        .unwrap(),
                ),
            );
        let request = Request::builder()
            .uri("/me")
            .header("X-Api-Key", "k1")
            .principal(Principal::user("42", "ann").with_group("staff"))
            .build();
        let args = run(&signature, request, &PathCaptures::new()).unwrap();
        assert_eq!(args.into_vec(), vec![Value::from("k1"), Value::from("42")]);
    }

    #[test]
    fn test_resolution_error() {
        let signature = Signature::new("detail").param(Parameter::new("id", TypeSpec::Int));
        let captures = PathCaptures::new().with("pk", "1");
        let err = run(&signature, Request::builder().uri("/d/1").build(), &captures).unwrap_err();
        assert!(matches!(err, TransformError::Resolution(_)));
        assert_eq!(err.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_receiver_is_skipped() {
        let signature = Signature::new("action")
            .param(Parameter::receiver())
            .param(Parameter::new("id", TypeSpec::Int));
        let pipeline = Pipeline::new(&signature, &factory());
        assert_eq!(pipeline.params().len(), 1);
        assert_eq!(pipeline.params()[0].param().name(), "id");
    }
}
