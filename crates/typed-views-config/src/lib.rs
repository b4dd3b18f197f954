//! Typed configuration for typed-views.
//!
//! - TOML and JSON configuration files
//! - `.env` files via `dotenvy`
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//!
//! # Configuration File Format
//!
//! ```toml
//! [schema]
//! packages = ["serde", "validator", "declarative"]
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with `PREFIX__SECTION__KEY` variables:
//!
//! - `TYPED_VIEWS__SCHEMA__PACKAGES=serde,validator`
//! - `TYPED_VIEWS__LOGGING__LEVEL=debug`
//! - `TYPED_VIEWS__LOGGING__FORMAT=pretty`

#![doc(html_root_url = "https://docs.rs/typed-views-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{TypedViewsConfig, TypedViewsConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{LogFormat, LoggingConfig, SchemaConfig};
