//! Facade error types.

use http::{Method, StatusCode};
use serde_json::{json, Value as JsonValue};
use thiserror::Error;
use typed_views_config::ConfigError;
use typed_views_core::ValidationErrors;
use typed_views_extract::{ResolutionError, TransformError};

/// A handler declaration that cannot be wrapped.
///
/// Raised once, when the endpoint is defined, never per request.
#[derive(Error, Debug)]
pub enum WrapError {
    /// The handler declares a variadic parameter.
    #[error("{endpoint}: variable-length argument lists and dictionaries cannot be used with typed views (parameter '{param}')")]
    VariadicParameter {
        /// Handler name.
        endpoint: String,
        /// The offending parameter.
        param: String,
    },

    /// A method-style handler does not start with an unannotated `self`.
    #[error("{endpoint}: for typed methods, 'self' must be passed as the first arg with no annotation")]
    InvalidReceiver {
        /// Handler name.
        endpoint: String,
    },

    /// An endpoint was declared without any HTTP method.
    #[error("{endpoint}: at least one HTTP method is required")]
    NoMethods {
        /// Handler name.
        endpoint: String,
    },

    /// Two handlers of a view claim the same method.
    #[error("{view}: more than one handler for {method}")]
    DuplicateMethod {
        /// View name.
        view: String,
        /// The duplicated method.
        method: Method,
    },

    /// The configuration could not be turned into a schema registry.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl WrapError {
    /// Creates a variadic-parameter error.
    pub fn variadic(endpoint: impl Into<String>, param: impl Into<String>) -> Self {
        Self::VariadicParameter {
            endpoint: endpoint.into(),
            param: param.into(),
        }
    }

    /// Creates an invalid-receiver error.
    pub fn invalid_receiver(endpoint: impl Into<String>) -> Self {
        Self::InvalidReceiver {
            endpoint: endpoint.into(),
        }
    }
}

/// Failure of a typed dispatch.
///
/// # Example
///
/// ```rust
/// use http::{Method, StatusCode};
/// use typed_views::TypedViewError;
///
/// let err = TypedViewError::method_not_allowed(Method::PUT, vec![Method::GET]);
/// assert_eq!(err.status_code(), StatusCode::METHOD_NOT_ALLOWED);
/// assert_eq!(err.to_body()["detail"], "Method \"PUT\" not allowed.");
/// ```
#[derive(Error, Debug)]
pub enum TypedViewError {
    /// One or more parameters failed validation.
    #[error(transparent)]
    Validation(ValidationErrors),

    /// The request method is not handled by the endpoint.
    #[error("method {method} not allowed")]
    MethodNotAllowed {
        /// The request method.
        method: Method,
        /// The methods the endpoint handles.
        allowed: Vec<Method>,
    },

    /// The path captures do not fit the handler signature.
    #[error(transparent)]
    Resolution(ResolutionError),

    /// The handler declaration is invalid.
    #[error(transparent)]
    Wrap(#[from] WrapError),
}

impl TypedViewError {
    /// Creates a method-not-allowed error.
    #[must_use]
    pub fn method_not_allowed(method: Method, allowed: Vec<Method>) -> Self {
        Self::MethodNotAllowed { method, allowed }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Resolution(_) | Self::Wrap(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The value of the `Allow` header for a 405, if any.
    #[must_use]
    pub fn allow_header(&self) -> Option<String> {
        match self {
            Self::MethodNotAllowed { allowed, .. } => Some(
                allowed
                    .iter()
                    .map(Method::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            _ => None,
        }
    }

    /// The JSON response body.
    ///
    /// Validation failures map each source key to its native error payload.
    /// Everything else is `{"detail": message}`.
    #[must_use]
    pub fn to_body(&self) -> JsonValue {
        match self {
            Self::Validation(errors) => errors.to_json(),
            Self::MethodNotAllowed { method, .. } => {
                json!({ "detail": format!("Method \"{method}\" not allowed.") })
            }
            Self::Resolution(err) => json!({ "detail": err.to_string() }),
            Self::Wrap(err) => json!({ "detail": err.to_string() }),
        }
    }

    /// The outcome label recorded in metrics.
    #[must_use]
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::Validation(_) => "invalid",
            Self::MethodNotAllowed { .. } => "method_not_allowed",
            Self::Resolution(_) | Self::Wrap(_) => "error",
        }
    }
}

impl From<TransformError> for TypedViewError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::Validation(errors) => Self::Validation(errors),
            TransformError::Resolution(err) => Self::Resolution(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typed_views_core::ErrorDetail;

    #[test]
    fn test_validation_body() {
        let mut errors = ValidationErrors::new();
        errors.insert("id", ErrorDetail::message("A valid integer is required."));
        let err = TypedViewError::from(TransformError::Validation(errors));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.outcome(), "invalid");
        assert_eq!(err.to_body(), json!({"id": ["A valid integer is required."]}));
    }

    #[test]
    fn test_method_not_allowed() {
        let err = TypedViewError::method_not_allowed(Method::DELETE, vec![Method::GET, Method::POST]);
        assert_eq!(err.allow_header().as_deref(), Some("GET, POST"));
        assert_eq!(err.to_body(), json!({"detail": "Method \"DELETE\" not allowed."}));
    }

    #[test]
    fn test_resolution_is_server_error() {
        let err = TypedViewError::from(TransformError::Resolution(ResolutionError::UnmatchedCapture {
            endpoint: "detail".to_string(),
            capture: "pk".to_string(),
        }));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.outcome(), "error");
    }

    #[test]
    fn test_wrap_error_messages() {
        assert!(WrapError::variadic("list", "args")
            .to_string()
            .contains("variable-length argument lists"));
        assert_eq!(
            WrapError::invalid_receiver("refresh").to_string(),
            "refresh: for typed methods, 'self' must be passed as the first arg with no annotation"
        );
    }
}
