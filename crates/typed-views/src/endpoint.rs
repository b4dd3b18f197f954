//! Function-style typed endpoints.

use crate::dispatch::{refuse, run};
use crate::error::TypedViewError;
use crate::view_config::ViewConfig;
use http::Method;
use std::fmt;
use std::sync::Arc;
use typed_views_core::{Handler, PathCaptures, Request};
use typed_views_extract::Pipeline;

/// A handler wrapped so it receives validated arguments instead of the
/// request.
///
/// Created by [`TypedViews::api_view`](crate::TypedViews::api_view).
pub struct TypedEndpoint<R> {
    methods: Vec<Method>,
    config: ViewConfig,
    pipeline: Pipeline,
    handler: Arc<dyn Handler<R>>,
}

impl<R> TypedEndpoint<R> {
    pub(crate) fn new(methods: Vec<Method>, pipeline: Pipeline, handler: Arc<dyn Handler<R>>) -> Self {
        Self {
            methods,
            config: ViewConfig::default(),
            pipeline,
            handler,
        }
    }

    /// Replaces the host view configuration.
    #[must_use]
    pub fn with_view_config(mut self, config: ViewConfig) -> Self {
        self.config = config;
        self
    }

    /// The handler name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.pipeline.signature().name()
    }

    /// The methods this endpoint answers.
    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// The host view configuration.
    #[must_use]
    pub const fn view_config(&self) -> &ViewConfig {
        &self.config
    }

    /// The prepared pipeline.
    #[must_use]
    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Validates the request and calls the handler.
    ///
    /// # Errors
    ///
    /// - [`TypedViewError::MethodNotAllowed`] for a method not in [`methods`](Self::methods)
    /// - [`TypedViewError::Validation`] if any parameter failed validation
    /// - [`TypedViewError::Resolution`] if the captures do not fit the handler
    pub fn call(&self, request: &Arc<Request>, captures: &PathCaptures) -> Result<R, TypedViewError> {
        if !self.methods.contains(request.method()) {
            let err = TypedViewError::method_not_allowed(request.method().clone(), self.methods.clone());
            return refuse(self.name(), err);
        }
        run(&self.pipeline, request, captures, |args| self.handler.call(args))
    }
}

impl<R> fmt::Debug for TypedEndpoint<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedEndpoint")
            .field("name", &self.name())
            .field("methods", &self.methods)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
