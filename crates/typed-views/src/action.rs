//! Method-style typed actions.
//!
//! An action is a handler defined on a receiver, such as an extra route on a
//! resource set. Its signature must begin with an unannotated `self`, which is
//! passed through untouched and never resolved from the request.

use crate::dispatch::{refuse, run};
use crate::error::{TypedViewError, WrapError};
use crate::view_config::ViewConfig;
use http::Method;
use std::fmt;
use std::sync::Arc;
use typed_views_core::{MethodHandler, ParamKind, PathCaptures, Request, Signature, TypeSpec};
use typed_views_extract::Pipeline;

/// Routing options of an action.
///
/// # Example
///
/// ```rust
/// use http::Method;
/// use typed_views::ActionOptions;
///
/// let options = ActionOptions::new(true).methods([Method::POST]).url_path("set-password");
/// assert!(options.is_detail());
/// assert_eq!(options.allowed_methods(), [Method::POST]);
/// ```
#[derive(Debug, Clone)]
pub struct ActionOptions {
    detail: bool,
    methods: Vec<Method>,
    url_path: Option<String>,
    url_name: Option<String>,
    config: ViewConfig,
}

impl ActionOptions {
    /// Options for a detail (single-object) or list action answering `GET`.
    #[must_use]
    pub fn new(detail: bool) -> Self {
        Self {
            detail,
            methods: vec![Method::GET],
            url_path: None,
            url_name: None,
            config: ViewConfig::default(),
        }
    }

    /// Sets the methods the action answers.
    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    /// Overrides the URL segment.
    pub fn url_path(mut self, url_path: impl Into<String>) -> Self {
        self.url_path = Some(url_path.into());
        self
    }

    /// Overrides the reverse-lookup name.
    pub fn url_name(mut self, url_name: impl Into<String>) -> Self {
        self.url_name = Some(url_name.into());
        self
    }

    /// Replaces the host view configuration.
    pub fn view_config(mut self, config: ViewConfig) -> Self {
        self.config = config;
        self
    }

    /// Whether the action acts on a single object.
    #[must_use]
    pub const fn is_detail(&self) -> bool {
        self.detail
    }

    /// The methods the action answers.
    #[must_use]
    pub fn allowed_methods(&self) -> &[Method] {
        &self.methods
    }
}

/// Checks that a method-style signature starts with an unannotated `self`.
pub(crate) fn check_receiver(signature: &Signature) -> Result<(), WrapError> {
    match signature.params().first() {
        Some(first)
            if first.kind() == ParamKind::Receiver
                && first.name() == "self"
                && matches!(first.ty(), TypeSpec::Unannotated) =>
        {
            Ok(())
        }
        _ => Err(WrapError::invalid_receiver(signature.name())),
    }
}

/// A method-style handler wrapped so it receives its receiver and validated
/// arguments.
///
/// Created by [`TypedViews::action`](crate::TypedViews::action).
pub struct TypedAction<S, R> {
    options: ActionOptions,
    pipeline: Pipeline,
    handler: Arc<dyn MethodHandler<S, R>>,
}

impl<S, R> TypedAction<S, R> {
    pub(crate) fn new(
        options: ActionOptions,
        pipeline: Pipeline,
        handler: Arc<dyn MethodHandler<S, R>>,
    ) -> Self {
        Self {
            options,
            pipeline,
            handler,
        }
    }

    /// The handler name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.pipeline.signature().name()
    }

    /// The routing options.
    #[must_use]
    pub const fn options(&self) -> &ActionOptions {
        &self.options
    }

    /// The URL segment: the override, else the handler name.
    #[must_use]
    pub fn url_path(&self) -> &str {
        self.options.url_path.as_deref().unwrap_or(self.name())
    }

    /// The reverse-lookup name: the override, else the handler name with
    /// underscores turned into dashes.
    #[must_use]
    pub fn url_name(&self) -> String {
        self.options
            .url_name
            .clone()
            .unwrap_or_else(|| self.name().replace('_', "-"))
    }

    /// The host view configuration.
    #[must_use]
    pub const fn view_config(&self) -> &ViewConfig {
        &self.options.config
    }

    /// Validates the request and calls the handler on `receiver`.
    ///
    /// # Errors
    ///
    /// Same as [`TypedEndpoint::call`](crate::TypedEndpoint::call).
    pub fn call(
        &self,
        receiver: &S,
        request: &Arc<Request>,
        captures: &PathCaptures,
    ) -> Result<R, TypedViewError> {
        if !self.options.methods.contains(request.method()) {
            let err = TypedViewError::method_not_allowed(
                request.method().clone(),
                self.options.methods.clone(),
            );
            return refuse(self.name(), err);
        }
        run(&self.pipeline, request, captures, |args| {
            self.handler.call(receiver, args)
        })
    }
}

impl<S, R> fmt::Debug for TypedAction<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedAction")
            .field("name", &self.name())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
