//! # typed-views
//!
//! **Typed parameter binding and validation for web API handlers**
//!
//! typed-views sits between a host web framework and its handlers. Instead of
//! digging values out of the request, a handler declares its parameters and
//! receives them already parsed and validated:
//!
//! - **Declarative sources** – path, query, body, header or the authenticated user
//! - **Implicit resolution** – sensible sources for parameters without a binding
//! - **Rich validation** – bounds, patterns, formats, decimals, dates, lists, choices
//! - **Complex schemas** – serde models, `validator` rule sets and declarative schemas
//! - **Aggregated errors** – every failing parameter reported in one 400 payload
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use std::sync::Arc;
//! use typed_views::prelude::*;
//!
//! let views = TypedViews::default();
//!
//! let signature = Signature::new("list_items")
//!     .param(Parameter::new("ids", TypeSpec::list(TypeSpec::Int)))
//!     .param(
//!         Parameter::new("limit", TypeSpec::Int)
//!             .bind(ParamSettings::query().default(10).max_value(100.0).build().unwrap()),
//!     );
//!
//! let endpoint = views
//!     .api_view([Method::GET], signature, |args: Args| args.len())
//!     .unwrap();
//!
//! let request = Arc::new(Request::builder().uri("/items?ids=1,2,3&limit=500").build());
//! let err = endpoint.call(&request, &PathCaptures::new()).unwrap_err();
//!
//! assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
//! assert_eq!(
//!     err.to_body(),
//!     serde_json::json!({"limit": ["Ensure this value is less than or equal to 100."]})
//! );
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request ─→ resolve ─→ extract ─→ validate ─→ Args ─→ handler
//!               │                      │
//!               └──── per parameter ───┘──→ ValidationErrors (400)
//! ```

#![doc(html_root_url = "https://docs.rs/typed-views/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod dispatch;
mod endpoint;
mod error;
mod view;
mod view_config;
mod views;

pub use action::{ActionOptions, TypedAction};
pub use endpoint::TypedEndpoint;
pub use error::{TypedViewError, WrapError};
pub use view::{MethodRoute, MountedView, TypedView};
pub use view_config::{ViewConfig, ViewConfigBuilder};
pub use views::TypedViews;

// Re-export the building blocks
pub use typed_views_config as config;
pub use typed_views_core as core;
pub use typed_views_extract as extract;
pub use typed_views_telemetry as telemetry;
pub use typed_views_validate as validate;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use typed_views::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ActionOptions, MethodRoute, MountedView, TypedAction, TypedEndpoint, TypedView,
        TypedViewError, TypedViews, ViewConfig, WrapError,
    };

    pub use typed_views_core::{
        Args, ErrorDetail, FromValue, Handler, MethodHandler, ParamKind, ParamSettings, Parameter,
        PathCaptures, Principal, Raw, Request, SchemaFamily, Signature, TypeSpec,
        ValidationErrors, Value,
    };

    pub use typed_views_config::{ConfigLoader, TypedViewsConfig};

    pub use typed_views_validate::{model, rules, DeclarativeSchema, SchemaRegistry};
}
