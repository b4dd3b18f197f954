//! The per-request path shared by every wrapper.

use crate::error::{TypedViewError, WrapError};
use std::sync::Arc;
use std::time::Instant;
use typed_views_core::{Args, PathCaptures, Request, Signature};
use typed_views_extract::Pipeline;
use typed_views_telemetry::metrics::record_request;
use typed_views_telemetry::{log_request_complete, log_request_error, log_request_start};

/// Rejects signatures the pipeline cannot bind.
pub(crate) fn reject_variadics(signature: &Signature) -> Result<(), WrapError> {
    match signature.params().iter().find(|p| p.is_variadic()) {
        Some(param) => Err(WrapError::variadic(signature.name(), param.name())),
        None => Ok(()),
    }
}

/// Runs the pipeline and, if every parameter validated, the handler.
pub(crate) fn run<R>(
    pipeline: &Pipeline,
    request: &Arc<Request>,
    captures: &PathCaptures,
    call: impl FnOnce(Args) -> R,
) -> Result<R, TypedViewError> {
    let endpoint = pipeline.signature().name();
    let request_id = request.request_id();
    let start = Instant::now();
    log_request_start!(request_id, request.method(), request.path(), endpoint);

    let result = pipeline
        .transform(request, captures)
        .map(call)
        .map_err(TypedViewError::from);

    let outcome = match &result {
        Ok(_) => "ok",
        Err(err) => {
            if let TypedViewError::Resolution(resolution) = err {
                log_request_error!(request_id, resolution);
            }
            err.outcome()
        }
    };
    record_request(endpoint, outcome);

    let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    log_request_complete!(request_id, outcome, duration_ms);

    result
}

/// Records a request turned away before the pipeline ran.
pub(crate) fn refuse<R>(endpoint: &str, err: TypedViewError) -> Result<R, TypedViewError> {
    record_request(endpoint, err.outcome());
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use typed_views_core::{ParamKind, Parameter, TypeSpec};

    #[test]
    fn test_reject_variadics() {
        let ok = Signature::new("list").param(Parameter::new("q", TypeSpec::Str));
        assert!(reject_variadics(&ok).is_ok());

        let bad = Signature::new("list")
            .param(Parameter::new("q", TypeSpec::Str))
            .param(Parameter::unannotated("kwargs").with_kind(ParamKind::VarKeyword));
        assert!(matches!(
            reject_variadics(&bad),
            Err(WrapError::VariadicParameter { param, .. }) if param == "kwargs"
        ));
    }
}
