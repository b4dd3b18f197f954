//! Parameter resolution.
//!
//! Decides, per declared parameter, where its value comes from. The first
//! matching rule wins:
//!
//! 1. an explicit binding with a source kind
//! 2. a parameter declared as the request type
//! 3. a parameter whose name is a path capture
//! 4. a complex-schema type whose family is enabled
//! 5. an unannotated parameter named `request`
//! 6. the query string
//!
//! Rules 3 to 6 are implicit: the binding, if any, only contributes knobs.

use crate::error::ResolutionError;
use std::fmt;
use typed_views_core::{Parameter, PathCaptures, Signature, SourceKind, TypeSpec};
use typed_views_validate::SchemaRegistry;

/// Where one parameter's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The request itself, unvalidated.
    Request,
    /// A part of the request.
    Source {
        /// The request part.
        kind: SourceKind,
        /// `false` when the binding named the kind explicitly.
        implicit: bool,
    },
}

impl Resolution {
    const fn explicit(kind: SourceKind) -> Self {
        Self::Source {
            kind,
            implicit: false,
        }
    }

    const fn implicit(kind: SourceKind) -> Self {
        Self::Source {
            kind,
            implicit: true,
        }
    }

    /// The request part, or `None` for the request passthrough.
    #[must_use]
    pub const fn source_kind(&self) -> Option<SourceKind> {
        match self {
            Self::Request => None,
            Self::Source { kind, .. } => Some(*kind),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request => f.write_str("request"),
            Self::Source {
                kind,
                implicit: true,
            } => write!(f, "{kind} (implicit)"),
            Self::Source { kind, .. } => write!(f, "{kind}"),
        }
    }
}

/// Resolves one parameter against the captures of the current request.
#[must_use]
pub fn resolve(param: &Parameter, captures: &PathCaptures, registry: &SchemaRegistry) -> Resolution {
    if let Some(kind) = param.binding().and_then(|b| b.source_kind()) {
        return Resolution::explicit(kind);
    }
    if matches!(param.ty(), TypeSpec::Request) {
        return Resolution::Request;
    }
    if captures.contains(param.name()) {
        return Resolution::implicit(SourceKind::Path);
    }
    if registry.complex_schema(param.ty()).is_some() {
        return Resolution::implicit(SourceKind::Body);
    }
    if param.name() == "request" && matches!(param.ty(), TypeSpec::Unannotated) {
        return Resolution::Request;
    }
    Resolution::implicit(SourceKind::Query)
}

/// Checks that every path capture has somewhere to go.
///
/// # Errors
///
/// Returns a [`ResolutionError`] when there are more captures than bound
/// parameters, when a capture matches no parameter, or when it names a
/// parameter explicitly bound to another request part.
pub fn check_captures(signature: &Signature, captures: &PathCaptures) -> Result<(), ResolutionError> {
    let params: Vec<&Parameter> = signature.bound_params().collect();

    if captures.len() > params.len() {
        return Err(ResolutionError::TooManyCaptures {
            endpoint: signature.name().to_string(),
            captures: captures.len(),
            params: params.len(),
        });
    }

    for capture in captures.names() {
        let path_bound = params.iter().any(|p| {
            p.binding().is_some_and(|b| {
                b.source_kind() == Some(SourceKind::Path)
                    && b.source().unwrap_or(p.name()) == capture
            })
        });
        if path_bound {
            continue;
        }

        let Some(param) = params.iter().find(|p| p.name() == capture) else {
            return Err(ResolutionError::UnmatchedCapture {
                endpoint: signature.name().to_string(),
                capture: capture.to_string(),
            });
        };

        if let Some(kind) = param.binding().and_then(|b| b.source_kind()) {
            return Err(ResolutionError::CaptureBoundElsewhere {
                endpoint: signature.name().to_string(),
                capture: capture.to_string(),
                bound_to: kind,
            });
        }
    }

    Ok(())
}
