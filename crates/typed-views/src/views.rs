//! The entry point that wraps handlers.

use crate::action::{check_receiver, ActionOptions, TypedAction};
use crate::dispatch::reject_variadics;
use crate::endpoint::TypedEndpoint;
use crate::error::{TypedViewError, WrapError};
use crate::view::{MountedView, TypedView};
use http::Method;
use std::sync::Arc;
use tracing::info;
use typed_views_config::TypedViewsConfig;
use typed_views_core::{Handler, MethodHandler, PathCaptures, Request, SchemaFamily, Signature};
use typed_views_extract::Pipeline;
use typed_views_telemetry::{init_telemetry, register_metric_descriptions, TelemetryResult};
use typed_views_validate::{SchemaRegistry, ValidatorFactory};

/// Wraps handlers into typed endpoints.
///
/// Holds the configuration and the validator factory shared by every
/// endpoint it creates. Cheap to clone.
///
/// # Example
///
/// ```rust
/// use http::Method;
/// use std::sync::Arc;
/// use typed_views::prelude::*;
///
/// let views = TypedViews::default();
/// let signature = Signature::new("get_item")
///     .param(Parameter::new("id", TypeSpec::Int))
///     .param(Parameter::new("q", TypeSpec::Str));
/// let endpoint = views
///     .api_view([Method::GET], signature, |args: Args| {
///         format!("{}:{}", args.arg::<i64>(0).unwrap(), args.arg::<String>(1).unwrap())
///     })
///     .unwrap();
///
/// let request = Arc::new(Request::builder().uri("/items/3?q=lamp").build());
/// let captures = PathCaptures::new().with("id", "3");
/// assert_eq!(endpoint.call(&request, &captures).unwrap(), "3:lamp");
/// ```
#[derive(Debug, Clone)]
pub struct TypedViews {
    config: Arc<TypedViewsConfig>,
    factory: ValidatorFactory,
}

impl TypedViews {
    /// Creates the entry point from configuration.
    ///
    /// Complex-schema families are enabled per `schema.packages`.
    ///
    /// # Errors
    ///
    /// Returns [`WrapError::Config`] if a schema package is unknown.
    pub fn new(config: TypedViewsConfig) -> Result<Self, WrapError> {
        let registry = config
            .schema
            .families()?
            .into_iter()
            .fold(SchemaRegistry::new(), SchemaRegistry::with_family);
        register_metric_descriptions();

        let families: Vec<SchemaFamily> = registry.families().collect();
        info!(schema_families = ?families, "typed views configured");

        Ok(Self {
            config: Arc::new(config),
            factory: ValidatorFactory::new(Arc::new(registry)),
        })
    }

    /// Creates the entry point with an explicit schema registry.
    #[must_use]
    pub fn with_registry(registry: SchemaRegistry) -> Self {
        register_metric_descriptions();
        Self {
            config: Arc::new(TypedViewsConfig::default()),
            factory: ValidatorFactory::new(Arc::new(registry)),
        }
    }

    /// Installs the logging subscriber described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns a telemetry error if a subscriber is already installed or the
    /// level filter is invalid.
    pub fn init_telemetry(&self) -> TelemetryResult<()> {
        init_telemetry(&self.config.logging.to_log_config())
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &TypedViewsConfig {
        &self.config
    }

    /// The validator factory.
    #[must_use]
    pub const fn factory(&self) -> &ValidatorFactory {
        &self.factory
    }

    /// Wraps a function-style handler.
    ///
    /// # Errors
    ///
    /// - [`WrapError::NoMethods`] if `methods` is empty
    /// - [`WrapError::VariadicParameter`] if the signature is variadic
    pub fn api_view<R>(
        &self,
        methods: impl IntoIterator<Item = Method>,
        signature: Signature,
        handler: impl Handler<R> + 'static,
    ) -> Result<TypedEndpoint<R>, WrapError> {
        let methods: Vec<Method> = methods.into_iter().collect();
        if methods.is_empty() {
            return Err(WrapError::NoMethods {
                endpoint: signature.name().to_string(),
            });
        }
        reject_variadics(&signature)?;

        let pipeline = Pipeline::new(&signature, &self.factory);
        info!(
            endpoint = signature.name(),
            methods = ?methods,
            params = pipeline.params().len(),
            "wrapped typed endpoint"
        );
        Ok(TypedEndpoint::new(methods, pipeline, Arc::new(handler)))
    }

    /// Wraps a method-style handler.
    ///
    /// # Errors
    ///
    /// - [`WrapError::InvalidReceiver`] unless the first parameter is an
    ///   unannotated `self` receiver
    /// - [`WrapError::VariadicParameter`] if the signature is variadic
    /// - [`WrapError::NoMethods`] if the options list no method
    pub fn action<S, R>(
        &self,
        options: ActionOptions,
        signature: Signature,
        handler: impl MethodHandler<S, R> + 'static,
    ) -> Result<TypedAction<S, R>, WrapError> {
        reject_variadics(&signature)?;
        check_receiver(&signature)?;
        if options.allowed_methods().is_empty() {
            return Err(WrapError::NoMethods {
                endpoint: signature.name().to_string(),
            });
        }

        let pipeline = Pipeline::new(&signature, &self.factory);
        info!(
            endpoint = signature.name(),
            detail = options.is_detail(),
            methods = ?options.allowed_methods(),
            "wrapped typed action"
        );
        Ok(TypedAction::new(options, pipeline, Arc::new(handler)))
    }

    /// Prepares a class-style view.
    ///
    /// # Errors
    ///
    /// Returns a [`WrapError`] if a handler signature is variadic or lacks
    /// the `self` receiver, or if two handlers share a method.
    pub fn mount<V: TypedView>(&self, view: V) -> Result<MountedView<V>, WrapError> {
        let mounted = MountedView::new(view, &self.factory)?;
        info!(
            view = mounted.view().name(),
            methods = ?mounted.allowed_methods(),
            "mounted typed view"
        );
        Ok(mounted)
    }

    /// Mounts `view` and dispatches one request to it.
    ///
    /// Prefer [`mount`](Self::mount) when the view serves many requests.
    ///
    /// # Errors
    ///
    /// See [`MountedView::dispatch`]; an invalid view is a
    /// [`TypedViewError::Wrap`].
    pub fn dispatch<V: TypedView>(
        &self,
        view: V,
        request: &Arc<Request>,
        captures: &PathCaptures,
    ) -> Result<V::Output, TypedViewError> {
        self.mount(view)?.dispatch(request, captures)
    }
}

impl Default for TypedViews {
    fn default() -> Self {
        Self::with_registry(SchemaRegistry::all())
    }
}
