//! # typed-views core
//!
//! Core types shared by every typed-views crate.
//!
//! - [`ParamSettings`] - immutable per-parameter binding settings
//! - [`Signature`] / [`Parameter`] / [`TypeSpec`] - declared handler parameters
//! - [`Request`] / [`RequestId`] - the read-only request handed to the pipeline
//! - [`Principal`] - the authenticated user, if any
//! - [`PathCaptures`] - captures produced by the host router
//! - [`Raw`] / [`Value`] / [`Args`] - values before and after validation
//! - [`SchemaAdapter`] - the seam for complex-schema engines
//! - [`Handler`] / [`MethodHandler`] - typed handler traits

#![doc(html_root_url = "https://docs.rs/typed-views-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod captures;
mod error;
mod handler;
mod principal;
mod request;
pub mod schema;
mod settings;
mod signature;
mod value;

pub use captures::PathCaptures;
pub use error::{ArgError, BodyError, ErrorDetail, SettingsError, ValidationErrors};
pub use handler::{Handler, MethodHandler};
pub use principal::Principal;
pub use request::{QueryParams, Request, RequestBuilder, RequestId};
pub use schema::{SchemaAdapter, SchemaFamily, SchemaType};
pub use settings::{
    FilePathOptions, Format, ParamSettings, ParamSettingsBuilder, Protocol, Rounding, SourceKind,
};
pub use signature::{EnumSpec, ParamKind, Parameter, Signature, TypeSpec};
pub use value::{format_duration, Args, FromValue, Instance, Raw, Value};
