//! # typed-views extract
//!
//! Resolution, extraction and the transformation pipeline.
//!
//! For every bound parameter of a handler [`Signature`], the [`resolver`]
//! decides which part of the request holds its value, a [`strategy`] reads
//! the raw value and runs the parameter's validator, and the [`Pipeline`]
//! collects the results into the handler's [`Args`].
//!
//! | Strategy | Reads |
//! |----------|-------|
//! | [`PathStrategy`] | router captures |
//! | [`QueryStrategy`] | query string, with list splitting |
//! | [`BodyStrategy`] | parsed body, dotted paths |
//! | [`HeaderStrategy`] | headers, case-insensitive |
//! | [`CurrentUserStrategy`] | the principal, with group membership checks |
//! | [`PassthroughStrategy`] | the request itself |
//!
//! ## Errors
//!
//! Parameter failures never short-circuit: the pipeline reports every one of
//! them in a single [`TransformError::Validation`] keyed by source key.
//! Captures that do not fit the signature are a [`TransformError::Resolution`].
//!
//! [`Signature`]: typed_views_core::Signature
//! [`Args`]: typed_views_core::Args

#![doc(html_root_url = "https://docs.rs/typed-views-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod pipeline;
pub mod resolver;
pub mod strategy;

pub use error::{ParamError, ResolutionError, TransformError};
pub use pipeline::{transform, Pipeline, PreparedParam};
pub use resolver::{check_captures, resolve, Resolution};
pub use strategy::{
    Binding, BodyStrategy, CurrentUserStrategy, HeaderStrategy, ParamStrategy, PassthroughStrategy,
    PathStrategy, QueryStrategy,
};
