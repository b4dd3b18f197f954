//! Metrics emitted by typed-views.
//!
//! Counters are recorded through the `metrics` facade. The host installs
//! whichever recorder it uses; without one, recording is a no-op.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `typed_views_requests_total` | Counter | `endpoint`, `outcome` | Typed dispatches |
//! | `typed_views_validation_failures_total` | Counter | `source_kind` | Failed parameters |
//! | `typed_views_resolution_errors_total` | Counter | `endpoint` | Capture/signature mismatches |
//!
//! # Example
//!
//! ```rust,ignore
//! use typed_views_telemetry::metrics::{record_request, register_metric_descriptions};
//!
//! register_metric_descriptions();
//! record_request("list_users", "ok");
//! ```

use metrics::{counter, describe_counter};
use std::sync::Once;

/// Name of the dispatch counter.
pub const REQUESTS_TOTAL: &str = "typed_views_requests_total";

/// Name of the per-parameter validation failure counter.
pub const VALIDATION_FAILURES_TOTAL: &str = "typed_views_validation_failures_total";

/// Name of the resolution error counter.
pub const RESOLUTION_ERRORS_TOTAL: &str = "typed_views_resolution_errors_total";

static DESCRIPTIONS: Once = Once::new();

/// Registers descriptions for all standard metrics.
///
/// Safe to call more than once; descriptions are registered on the first call.
pub fn register_metric_descriptions() {
    DESCRIPTIONS.call_once(|| {
        describe_counter!(REQUESTS_TOTAL, "Total number of typed handler dispatches");
        describe_counter!(
            VALIDATION_FAILURES_TOTAL,
            "Total number of handler parameters that failed validation"
        );
        describe_counter!(
            RESOLUTION_ERRORS_TOTAL,
            "Total number of requests whose path captures did not match the handler signature"
        );
    });
}

/// Records a completed dispatch.
///
/// * `endpoint` - The handler name
/// * `outcome` - `ok`, `invalid`, `method_not_allowed` or `error`
pub fn record_request(endpoint: &str, outcome: &str) {
    counter!(
        REQUESTS_TOTAL,
        "endpoint" => endpoint.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Records one parameter that failed validation.
pub fn record_validation_failure(source_kind: &str) {
    counter!(
        VALIDATION_FAILURES_TOTAL,
        "source_kind" => source_kind.to_string()
    )
    .increment(1);
}

/// Records a resolution error.
pub fn record_resolution_error(endpoint: &str) {
    counter!(
        RESOLUTION_ERRORS_TOTAL,
        "endpoint" => endpoint.to_string()
    )
    .increment(1);
}
