//! Logging and metrics for typed-views.
//!
//! - **Logging**: a `tracing-subscriber` setup with JSON or pretty output
//! - **Metrics**: counters recorded through the `metrics` facade
//!
//! Library crates only emit events; installing a subscriber or recorder is
//! up to the host.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `typed_views_requests_total` | Counter | `endpoint`, `outcome` |
//! | `typed_views_validation_failures_total` | Counter | `source_kind` |
//! | `typed_views_resolution_errors_total` | Counter | `endpoint` |
//!
//! # Example
//!
//! ```rust,ignore
//! use typed_views_telemetry::{init_telemetry, LogConfig};
//!
//! init_telemetry(&LogConfig::production())?;
//! ```

#![doc(html_root_url = "https://docs.rs/typed-views-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};
pub use metrics::register_metric_descriptions;

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Initializes logging and registers metric descriptions.
///
/// # Errors
///
/// Returns `TelemetryError` if logging fails to initialize.
pub fn init_telemetry(config: &LogConfig) -> TelemetryResult<()> {
    init_logging(config)?;
    register_metric_descriptions();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_with_logging_disabled() {
        let config = LogConfig {
            enabled: false,
            ..LogConfig::default()
        };
        assert!(init_telemetry(&config).is_ok());
    }
}
