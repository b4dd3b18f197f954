//! The validator contract and the shared field wrapper.
//!
//! Every validator takes a [`Raw`] value and either returns a validated
//! [`Value`] or an [`ErrorDetail`]. Most validators are a [`Field`]: a
//! [`FieldKind`] that only ever sees present, non-null input, wrapped with the
//! common empty/default/null handling.

use serde_json::Value as JsonValue;
use std::fmt;
use typed_views_core::{ErrorDetail, Raw, Value};

/// Standard validation messages.
pub mod messages {
    /// No value was supplied and there is no default.
    pub const REQUIRED: &str = "This field is required.";
    /// An explicit null was supplied.
    pub const NULL: &str = "This field may not be null.";
    /// An empty string was supplied where blanks are not allowed.
    pub const BLANK: &str = "This field may not be blank.";
    /// Fallback validator: no value and no default.
    pub const VALUE_REQUIRED: &str = "A value for this parameter is required";
    /// Input is not string-like.
    pub const INVALID_STRING: &str = "Not a valid string.";
    /// Input contains NUL characters.
    pub const NULL_CHARACTERS: &str = "Null characters are not allowed.";
    /// Input is not a recognised boolean.
    pub const INVALID_BOOLEAN: &str = "Must be a valid boolean.";
    /// Input is not an integer.
    pub const INVALID_INTEGER: &str = "A valid integer is required.";
    /// Input is not a number.
    pub const INVALID_NUMBER: &str = "A valid number is required.";
    /// Numeric input string is unreasonably long.
    pub const MAX_STRING_LENGTH: &str = "String value too large.";
    /// Input does not match the configured pattern.
    pub const PATTERN: &str = "This value does not match the required pattern.";
    /// Input is not an email address.
    pub const EMAIL: &str = "Enter a valid email address.";
    /// Input is not a slug.
    pub const SLUG: &str =
        "Enter a valid \"slug\" consisting of letters, numbers, underscores or hyphens.";
    /// Input is not a URL.
    pub const URL: &str = "Enter a valid URL.";
    /// Input is not a UUID.
    pub const UUID: &str = "Must be a valid UUID.";
    /// Input is not an IPv4 or IPv6 address.
    pub const IP: &str = "Enter a valid IPv4 or IPv6 address.";
    /// Input is not an IPv4 address.
    pub const IPV4: &str = "Enter a valid IPv4 address.";
    /// Input is not an IPv6 address.
    pub const IPV6: &str = "Enter a valid IPv6 address.";
    /// A list was required to be non-empty.
    pub const EMPTY_LIST: &str = "This list may not be empty.";

    /// Input is not one of the allowed choices.
    #[must_use]
    pub fn invalid_choice(input: &str) -> String {
        format!("\"{input}\" is not a valid choice.")
    }

    /// Input is not a list.
    #[must_use]
    pub fn not_a_list(input_type: &str) -> String {
        format!("Expected a list of items but got type \"{input_type}\".")
    }

    /// String is too long.
    #[must_use]
    pub fn max_length(limit: usize) -> String {
        format!("Ensure this field has no more than {limit} characters.")
    }

    /// String is too short.
    #[must_use]
    pub fn min_length(limit: usize) -> String {
        format!("Ensure this field has at least {limit} characters.")
    }

    /// List has too many items.
    #[must_use]
    pub fn max_items(limit: usize) -> String {
        format!("Ensure this field has no more than {limit} elements.")
    }

    /// List has too few items.
    #[must_use]
    pub fn min_items(limit: usize) -> String {
        format!("Ensure this field has at least {limit} elements.")
    }

    /// Number is above the upper bound.
    #[must_use]
    pub fn max_value(limit: f64) -> String {
        format!(
            "Ensure this value is less than or equal to {}.",
            super::format_bound(limit)
        )
    }

    /// Number is below the lower bound.
    #[must_use]
    pub fn min_value(limit: f64) -> String {
        format!(
            "Ensure this value is greater than or equal to {}.",
            super::format_bound(limit)
        )
    }
}

/// A validator: converts raw input into a validated value.
pub trait Validator: Send + Sync + fmt::Debug {
    /// Runs validation.
    ///
    /// # Errors
    ///
    /// Returns the error payload when the input is absent without a default,
    /// null, or invalid for the validator.
    fn run_validation(&self, data: Raw) -> Result<Value, ErrorDetail>;
}

impl<V: Validator + ?Sized> Validator for Box<V> {
    fn run_validation(&self, data: Raw) -> Result<Value, ErrorDetail> {
        (**self).run_validation(data)
    }
}

/// The type-specific half of a [`Field`].
pub trait FieldKind: Send + Sync + fmt::Debug {
    /// Converts present, non-null input.
    ///
    /// # Errors
    ///
    /// Returns the error payload when the input is invalid.
    fn to_internal_value(&self, data: &JsonValue) -> Result<Value, ErrorDetail>;
}

/// A [`FieldKind`] with the common empty, default and null handling.
///
/// - empty sentinel: the default if one is set, else `"This field is required."`
/// - JSON null: `"This field may not be null."`
/// - a principal: validated through its JSON projection
#[derive(Debug)]
pub struct Field<K> {
    kind: K,
    default: Option<Value>,
}

impl<K: FieldKind> Field<K> {
    /// Wraps a kind with an optional default.
    #[must_use]
    pub const fn new(kind: K, default: Option<Value>) -> Self {
        Self { kind, default }
    }

    /// The wrapped kind.
    #[must_use]
    pub const fn kind(&self) -> &K {
        &self.kind
    }
}

impl<K: FieldKind> Validator for Field<K> {
    fn run_validation(&self, data: Raw) -> Result<Value, ErrorDetail> {
        let data = match data {
            Raw::Empty => {
                return self
                    .default
                    .clone()
                    .ok_or_else(|| ErrorDetail::message(messages::REQUIRED));
            }
            Raw::Json(JsonValue::Null) => return Err(ErrorDetail::message(messages::NULL)),
            Raw::Json(value) => value,
            Raw::Principal(principal) => principal.to_json(),
        };
        self.kind.to_internal_value(&data)
    }
}

/// Collects messages from several checks into one error, or `Ok` if none fired.
pub(crate) fn collect(value: Value, errors: Vec<String>) -> Result<Value, ErrorDetail> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(ErrorDetail::Messages(errors))
    }
}

/// The textual form of a JSON scalar, as echoed in choice messages.
pub(crate) fn display_text(data: &JsonValue) -> String {
    match data {
        JsonValue::String(s) => s.clone(),
        JsonValue::Bool(true) => "True".to_string(),
        JsonValue::Bool(false) => "False".to_string(),
        JsonValue::Null => "None".to_string(),
        other => other.to_string(),
    }
}

/// The type name reported for non-list input.
pub(crate) fn type_name(data: &JsonValue) -> &'static str {
    match data {
        JsonValue::Null => "NoneType",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(n) => {
            if n.is_f64() {
                "float"
            } else {
                "int"
            }
        }
        JsonValue::String(_) => "str",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "dict",
    }
}

/// Formats a numeric bound without a trailing `.0` for whole numbers.
pub(crate) fn format_bound(limit: f64) -> String {
    if limit.fract() == 0.0 && limit.abs() < 1e15 {
        #[allow(clippy::cast_possible_truncation)]
        let whole = limit as i64;
        whole.to_string()
    } else {
        limit.to_string()
    }
}
