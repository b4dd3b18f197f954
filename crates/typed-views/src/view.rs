//! Class-style typed views.
//!
//! A [`TypedView`] declares one typed handler per HTTP method. Mounting the
//! view prepares a pipeline per handler; dispatching picks the handler for
//! the request method, resolves its parameters and calls it on the view.

use crate::action::check_receiver;
use crate::dispatch::{refuse, reject_variadics, run};
use crate::error::{TypedViewError, WrapError};
use crate::view_config::ViewConfig;
use http::Method;
use std::fmt;
use std::sync::Arc;
use typed_views_core::{MethodHandler, PathCaptures, Request, Signature};
use typed_views_extract::Pipeline;
use typed_views_validate::ValidatorFactory;

/// A view type that maps HTTP methods to typed handlers.
///
/// # Example
///
/// ```rust
/// use http::Method;
/// use typed_views::prelude::*;
///
/// struct Music;
///
/// impl TypedView for Music {
///     type Output = i64;
///
///     fn name(&self) -> &str {
///         "music"
///     }
///
///     fn routes(&self) -> Vec<MethodRoute<Self, i64>> {
///         let get = Signature::new("get")
///             .param(Parameter::receiver())
///             .param(Parameter::new("limit", TypeSpec::Int).with_default(5));
///         vec![MethodRoute::new(Method::GET, get, |_: &Music, args: Args| {
///             args.arg::<i64>(0).unwrap_or_default()
///         })]
///     }
/// }
///
/// let views = TypedViews::default();
/// let request = std::sync::Arc::new(Request::builder().uri("/music?limit=7").build());
/// assert_eq!(views.dispatch(Music, &request, &PathCaptures::new()).unwrap(), 7);
/// ```
pub trait TypedView: Send + Sync + Sized + 'static {
    /// What every handler of the view returns.
    type Output;

    /// The view name, used in logs and metrics.
    fn name(&self) -> &str;

    /// The handlers, one per method.
    fn routes(&self) -> Vec<MethodRoute<Self, Self::Output>>;

    /// The host view configuration.
    fn view_config(&self) -> ViewConfig {
        ViewConfig::default()
    }
}

/// One method handler of a [`TypedView`].
///
/// Like an action, the signature must start with an unannotated `self`.
pub struct MethodRoute<V, R> {
    method: Method,
    signature: Signature,
    handler: Arc<dyn MethodHandler<V, R>>,
}

impl<V, R> MethodRoute<V, R> {
    /// Declares the handler for `method`.
    pub fn new(method: Method, signature: Signature, handler: impl MethodHandler<V, R> + 'static) -> Self {
        Self {
            method,
            signature,
            handler: Arc::new(handler),
        }
    }

    /// The method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// The handler signature.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }
}

impl<V, R> fmt::Debug for MethodRoute<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodRoute")
            .field("method", &self.method)
            .field("signature", &self.signature.name())
            .finish_non_exhaustive()
    }
}

struct PreparedRoute<V, R> {
    method: Method,
    pipeline: Pipeline,
    handler: Arc<dyn MethodHandler<V, R>>,
}

/// A [`TypedView`] with a prepared pipeline per method.
pub struct MountedView<V: TypedView> {
    view: V,
    config: ViewConfig,
    routes: Vec<PreparedRoute<V, V::Output>>,
}

impl<V: TypedView> MountedView<V> {
    pub(crate) fn new(view: V, factory: &ValidatorFactory) -> Result<Self, WrapError> {
        let mut routes: Vec<PreparedRoute<V, V::Output>> = Vec::new();

        for route in view.routes() {
            reject_variadics(&route.signature)?;
            check_receiver(&route.signature)?;
            if routes.iter().any(|r| r.method == route.method) {
                return Err(WrapError::DuplicateMethod {
                    view: view.name().to_string(),
                    method: route.method,
                });
            }
            routes.push(PreparedRoute {
                pipeline: Pipeline::new(&route.signature, factory),
                method: route.method,
                handler: route.handler,
            });
        }

        Ok(Self {
            config: view.view_config(),
            view,
            routes,
        })
    }

    /// The view.
    #[must_use]
    pub const fn view(&self) -> &V {
        &self.view
    }

    /// The host view configuration.
    #[must_use]
    pub const fn view_config(&self) -> &ViewConfig {
        &self.config
    }

    /// The methods the view handles, in declaration order.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        self.routes.iter().map(|r| r.method.clone()).collect()
    }

    /// Picks the handler for the request method, validates and calls it.
    ///
    /// # Errors
    ///
    /// - [`TypedViewError::MethodNotAllowed`] if no handler matches
    /// - [`TypedViewError::Validation`] if any parameter failed validation
    /// - [`TypedViewError::Resolution`] if the captures do not fit the handler
    pub fn dispatch(
        &self,
        request: &Arc<Request>,
        captures: &PathCaptures,
    ) -> Result<V::Output, TypedViewError> {
        let Some(route) = self.routes.iter().find(|r| r.method == *request.method()) else {
            let err = TypedViewError::method_not_allowed(
                request.method().clone(),
                self.allowed_methods(),
            );
            return refuse(self.view.name(), err);
        };

        run(&route.pipeline, request, captures, |args| {
            route.handler.call(&self.view, args)
        })
    }
}

impl<V: TypedView> fmt::Debug for MountedView<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedView")
            .field("name", &self.view.name())
            .field("methods", &self.allowed_methods())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
