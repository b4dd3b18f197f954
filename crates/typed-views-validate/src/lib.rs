//! # typed-views validate
//!
//! Validators that turn raw request values into typed [`Value`]s.
//!
//! [`ValidatorFactory::make`] picks a validator from a declared
//! [`TypeSpec`] and its [`ParamSettings`]. Every validator implements
//! [`Validator`]: absent input yields the default or a "required" error,
//! null is rejected, and anything else is converted by the type-specific
//! [`FieldKind`].
//!
//! Complex types are validated by schema engines, see [`schema`].
//!
//! [`Value`]: typed_views_core::Value
//! [`TypeSpec`]: typed_views_core::TypeSpec
//! [`ParamSettings`]: typed_views_core::ParamSettings

#![doc(html_root_url = "https://docs.rs/typed-views-validate/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod boolean;
mod choice;
mod decimal;
mod factory;
mod fallback;
pub mod field;
mod list;
mod membership;
mod numeric;
mod patterns;
pub mod schema;
mod string;
mod temporal;

pub use boolean::BooleanKind;
pub use choice::{file_path_choices, ChoiceKind, Restricted};
pub use decimal::DecimalKind;
pub use factory::ValidatorFactory;
pub use fallback::DefaultValidator;
pub use field::{messages, Field, FieldKind, Validator};
pub use list::ListKind;
pub use membership::MembershipValidator;
pub use numeric::{Bounds, FloatKind, IntegerKind};
pub use schema::{model, rules, DeclarativeSchema, ModelSchema, RulesSchema, SchemaKind, SchemaRegistry};
pub use string::{CharKind, IpKind, StringCheck, UuidKind};
pub use temporal::{parse_duration, DateKind, DateTimeKind, DurationKind, TimeKind};
