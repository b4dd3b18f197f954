//! Error types shared across typed-views.
//!
//! Three families live here:
//!
//! - [`SettingsError`] - a binding was declared with an invalid combination of knobs
//! - [`ArgError`] - a handler asked for an argument of the wrong type
//! - [`ErrorDetail`] / [`ValidationErrors`] - the payload of a failed validation
//!
//! Validation payloads are kept structurally faithful to whatever produced
//! them: scalar validators emit message lists, list validators nest child
//! errors by index, and complex-schema engines keep their own shapes.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors raised while building [`ParamSettings`](crate::ParamSettings).
///
/// These are definition-time errors: they surface when a binding is declared,
/// never while a request is being processed.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Both `regex` and `format` were supplied.
    #[error("cannot set both 'regex' and 'format'")]
    RegexWithFormat,

    /// The `format` knob is not one of the supported formats.
    #[error("'format' must be one of: uuid, email, slug, url, ipv4, ipv6, ip, file_path (got '{0}')")]
    InvalidFormat(String),

    /// The `protocol` knob is not one of `both`, `IPv4`, `IPv6`.
    #[error("'protocol' must be one of: both, IPv4, IPv6 (got '{0}')")]
    InvalidProtocol(String),

    /// The `rounding` knob does not name a known rounding mode.
    #[error("'rounding' must be a valid rounding mode such as ROUND_HALF_UP (got '{0}')")]
    InvalidRounding(String),

    /// The source kind is not one of the supported request parts.
    #[error("'param_type' must be one of: body, query_param, path, header, current_user (got '{0}')")]
    InvalidSourceKind(String),

    /// A pattern knob (`regex` or `match`) failed to compile.
    #[error("invalid pattern for '{knob}': {source}")]
    InvalidPattern {
        /// The knob carrying the pattern.
        knob: &'static str,
        /// The compilation failure.
        #[source]
        source: regex::Error,
    },

    /// A string default timezone could not be parsed as a UTC offset.
    #[error("invalid default timezone offset: {0}")]
    InvalidTimezone(String),
}

impl SettingsError {
    /// Creates an invalid-pattern error for the given knob.
    #[must_use]
    pub fn invalid_pattern(knob: &'static str, source: regex::Error) -> Self {
        Self::InvalidPattern { knob, source }
    }
}

/// Errors raised when a handler converts a positional argument.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgError {
    /// No argument exists at the requested position.
    #[error("no argument at position {index} (handler received {len})")]
    Missing {
        /// The requested position.
        index: usize,
        /// Number of arguments available.
        len: usize,
    },

    /// The argument exists but holds a different kind of value.
    #[error("argument at position {index}: expected {expected}, found {found}")]
    Mismatch {
        /// The requested position.
        index: usize,
        /// The Rust type the handler asked for.
        expected: &'static str,
        /// The kind of value actually present.
        found: &'static str,
    },

    /// A numeric value did not fit the requested integer width.
    #[error("argument at position {index}: value out of range for {expected}")]
    OutOfRange {
        /// The requested position.
        index: usize,
        /// The Rust type the handler asked for.
        expected: &'static str,
    },
}

impl ArgError {
    /// Creates a type mismatch error. The index is filled in by [`Args`](crate::Args).
    #[must_use]
    pub const fn mismatch(expected: &'static str, found: &'static str) -> Self {
        Self::Mismatch {
            index: 0,
            expected,
            found,
        }
    }

    /// Creates an out-of-range error. The index is filled in by [`Args`](crate::Args).
    #[must_use]
    pub const fn out_of_range(expected: &'static str) -> Self {
        Self::OutOfRange { index: 0, expected }
    }

    pub(crate) fn at(self, position: usize) -> Self {
        match self {
            Self::Mismatch {
                expected, found, ..
            } => Self::Mismatch {
                index: position,
                expected,
                found,
            },
            Self::OutOfRange { expected, .. } => Self::OutOfRange {
                index: position,
                expected,
            },
            missing @ Self::Missing { .. } => missing,
        }
    }
}

/// Errors raised while turning a raw HTTP body into request data.
#[derive(Error, Debug)]
pub enum BodyError {
    /// The body claimed to be JSON but did not parse.
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The body claimed to be form-encoded but did not parse.
    #[error("invalid form body: {0}")]
    InvalidForm(#[from] serde_urlencoded::de::Error),

    /// The content type is not one the request builder understands.
    #[error("unsupported content type: {0}")]
    UnsupportedMediaType(String),
}

/// The error payload produced by a single validator.
///
/// # Example
///
/// ```
/// use typed_views_core::ErrorDetail;
///
/// let detail = ErrorDetail::message("This field is required.");
/// assert_eq!(detail.to_json(), serde_json::json!(["This field is required."]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetail {
    /// A flat list of messages.
    Messages(Vec<String>),
    /// Errors nested under keys (list indices, schema fields).
    Nested(IndexMap<String, ErrorDetail>),
    /// An engine-native payload, passed through untouched.
    Native(serde_json::Value),
}

impl ErrorDetail {
    /// A single-message detail.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Messages(vec![message.into()])
    }

    /// Returns the messages if this is a flat message list.
    #[must_use]
    pub fn messages(&self) -> Option<&[String]> {
        match self {
            Self::Messages(messages) => Some(messages),
            _ => None,
        }
    }

    /// Returns the first human-readable message found in this detail.
    #[must_use]
    pub fn first_message(&self) -> Option<String> {
        match self {
            Self::Messages(messages) => messages.first().cloned(),
            Self::Nested(map) => map.values().find_map(Self::first_message),
            Self::Native(value) => match value {
                serde_json::Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            },
        }
    }

    /// Converts the detail into its JSON representation.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Messages(messages) => serde_json::Value::Array(
                messages
                    .iter()
                    .cloned()
                    .map(serde_json::Value::String)
                    .collect(),
            ),
            Self::Nested(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Self::Native(value) => value.clone(),
        }
    }
}

impl Serialize for ErrorDetail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Aggregated validation errors for one request, keyed by parameter source.
///
/// Insertion order is preserved. Inserting under an existing key replaces the
/// earlier entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Error)]
#[serde(transparent)]
#[error("validation failed for {} parameter(s)", .errors.len())]
pub struct ValidationErrors {
    errors: IndexMap<String, ErrorDetail>,
}

impl ValidationErrors {
    /// Creates an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the error for a source key, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, detail: ErrorDetail) {
        self.errors.insert(key.into(), detail);
    }

    /// Returns the error recorded for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ErrorDetail> {
        self.errors.get(key)
    }

    /// Returns `true` if no errors were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of keys with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterates over `(key, detail)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ErrorDetail)> {
        self.errors.iter()
    }

    /// Returns the keys with errors in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// Converts the errors into a JSON object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.errors
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl FromIterator<(String, ErrorDetail)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (String, ErrorDetail)>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_settings_error_messages() {
        assert_eq!(
            SettingsError::RegexWithFormat.to_string(),
            "cannot set both 'regex' and 'format'"
        );
        assert!(SettingsError::InvalidProtocol("IPv5".into())
            .to_string()
            .contains("IPv5"));
    }

    #[test]
    fn test_arg_error_position() {
        let err = ArgError::mismatch("i64", "string").at(2);
        assert_eq!(
            err,
            ArgError::Mismatch {
                index: 2,
                expected: "i64",
                found: "string"
            }
        );
    }

    #[test]
    fn test_nested_detail_json() {
        let mut children = IndexMap::new();
        children.insert(
            "1".to_string(),
            ErrorDetail::message("A valid integer is required."),
        );
        let detail = ErrorDetail::Nested(children);
        assert_eq!(
            detail.to_json(),
            json!({"1": ["A valid integer is required."]})
        );
        assert_eq!(
            detail.first_message().as_deref(),
            Some("A valid integer is required.")
        );
    }

    #[test]
    fn test_validation_errors_replace_same_key() {
        let mut errors = ValidationErrors::new();
        errors.insert("id", ErrorDetail::message("first"));
        errors.insert("q", ErrorDetail::message("other"));
        errors.insert("id", ErrorDetail::message("second"));

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["id", "q"]);
        assert_eq!(
            errors.to_json(),
            json!({"id": ["second"], "q": ["other"]})
        );
    }

    #[test]
    fn test_validation_errors_serialize() {
        let mut errors = ValidationErrors::new();
        errors.insert("user", ErrorDetail::Native(json!({"id": "Required"})));
        let body = serde_json::to_value(&errors).unwrap();
        assert_eq!(body, json!({"user": {"id": "Required"}}));
    }
}
