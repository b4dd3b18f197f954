//! Extraction error types.
//!
//! A [`ParamError`] is the failure of one parameter. The pipeline collects
//! them into a single [`TransformError::Validation`]. A [`ResolutionError`]
//! means the path captures do not fit the handler signature at all; it is a
//! routing mistake, not bad input.

use http::StatusCode;
use thiserror::Error;
use typed_views_core::{ErrorDetail, SourceKind, ValidationErrors};

/// Validation failure for a single parameter.
///
/// # Example
///
/// ```rust
/// use typed_views_core::{ErrorDetail, SourceKind};
/// use typed_views_extract::ParamError;
///
/// let err = ParamError::new("id", SourceKind::Path, ErrorDetail::message("This field is required."));
/// assert_eq!(err.key(), "id");
/// assert!(err.to_string().contains("path"));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {source_kind} parameter '{key}'")]
pub struct ParamError {
    key: String,
    source_kind: SourceKind,
    detail: ErrorDetail,
}

impl ParamError {
    /// Creates a parameter error.
    #[must_use]
    pub fn new(key: impl Into<String>, source_kind: SourceKind, detail: ErrorDetail) -> Self {
        Self {
            key: key.into(),
            source_kind,
            detail,
        }
    }

    /// The key the error is reported under: the source override, else the
    /// parameter name.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The request part the value came from.
    #[must_use]
    pub const fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    /// The validator's error payload.
    #[must_use]
    pub const fn detail(&self) -> &ErrorDetail {
        &self.detail
    }

    /// Splits the error into its key and payload.
    #[must_use]
    pub fn into_parts(self) -> (String, ErrorDetail) {
        (self.key, self.detail)
    }
}

/// Path captures that do not fit the handler signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The router produced more captures than the handler declares.
    #[error("{endpoint}: {captures} path capture(s) but only {params} parameter(s) declared")]
    TooManyCaptures {
        /// Handler name.
        endpoint: String,
        /// Number of captures.
        captures: usize,
        /// Number of resolvable parameters.
        params: usize,
    },

    /// A capture matches no parameter name and no path binding's source.
    #[error("{endpoint}: path capture '{capture}' does not match any parameter")]
    UnmatchedCapture {
        /// Handler name.
        endpoint: String,
        /// Capture name.
        capture: String,
    },

    /// A capture shares its name with a parameter bound to another source.
    #[error("{endpoint}: path capture '{capture}' names a parameter bound to {bound_to}")]
    CaptureBoundElsewhere {
        /// Handler name.
        endpoint: String,
        /// Capture name.
        capture: String,
        /// The parameter's explicit source kind.
        bound_to: SourceKind,
    },
}

/// Failure of a whole transformation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// One or more parameters failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The captures do not fit the signature.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

impl TransformError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Resolution(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the validation errors, if this is a validation failure.
    #[must_use]
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Resolution(_) => None,
        }
    }
}
