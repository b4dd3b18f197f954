//! String-shaped fields: plain strings, patterns, named formats, UUIDs and
//! IP addresses.

use crate::field::{collect, messages, FieldKind};
use crate::patterns;
use regex::Regex;
use serde_json::Value as JsonValue;
use std::net::IpAddr;
use typed_views_core::{ErrorDetail, ParamSettings, Protocol, Value};
use uuid::Uuid;
use validator::ValidateEmail;

/// An extra check applied to a string after length validation.
#[derive(Debug, Clone)]
pub enum StringCheck {
    /// The string must contain a match for the pattern.
    Pattern(Regex),
    /// The string must be an email address.
    Email,
    /// The string must be a slug.
    Slug,
    /// The string must be an absolute URL.
    Url,
}

impl StringCheck {
    fn check(&self, value: &str) -> Option<&'static str> {
        let ok = match self {
            Self::Pattern(re) => re.is_match(value),
            Self::Email => value.validate_email(),
            Self::Slug => patterns::slug().is_match(value),
            Self::Url => is_valid_url(value),
        };
        if ok {
            None
        } else {
            Some(match self {
                Self::Pattern(_) => messages::PATTERN,
                Self::Email => messages::EMAIL,
                Self::Slug => messages::SLUG,
                Self::Url => messages::URL,
            })
        }
    }
}

fn is_valid_url(value: &str) -> bool {
    url::Url::parse(value).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https" | "ftp" | "ftps") && url.host().is_some()
    })
}

/// Common blank handling for string-shaped kinds.
///
/// Returns `Some(result)` when the input is blank and the caller should stop.
fn blank(data: &JsonValue, trim: bool, allow_blank: bool) -> Option<Result<Value, ErrorDetail>> {
    let JsonValue::String(text) = data else {
        return None;
    };
    if text.is_empty() || (trim && text.trim().is_empty()) {
        Some(if allow_blank {
            Ok(Value::Str(String::new()))
        } else {
            Err(ErrorDetail::message(messages::BLANK))
        })
    } else {
        None
    }
}

/// A string field with optional length limits and one extra check.
#[derive(Debug, Clone)]
pub struct CharKind {
    trim_whitespace: bool,
    allow_blank: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    check: Option<StringCheck>,
}

impl CharKind {
    /// Builds a string kind from settings.
    #[must_use]
    pub fn new(settings: &ParamSettings, check: Option<StringCheck>) -> Self {
        Self {
            trim_whitespace: settings.trim_whitespace(),
            allow_blank: settings.allow_blank(),
            min_length: settings.min_length(),
            max_length: settings.max_length(),
            check,
        }
    }
}

impl FieldKind for CharKind {
    fn to_internal_value(&self, data: &JsonValue) -> Result<Value, ErrorDetail> {
        if let Some(result) = blank(data, self.trim_whitespace, self.allow_blank) {
            return result;
        }

        let text = match data {
            JsonValue::String(s) => s.clone(),
            JsonValue::Number(n) => n.to_string(),
            _ => return Err(ErrorDetail::message(messages::INVALID_STRING)),
        };
        let value = if self.trim_whitespace {
            text.trim().to_string()
        } else {
            text
        };

        let mut errors = Vec::new();
        let length = value.chars().count();
        if let Some(max) = self.max_length {
            if length > max {
                errors.push(messages::max_length(max));
            }
        }
        if let Some(min) = self.min_length {
            if length < min {
                errors.push(messages::min_length(min));
            }
        }
        if value.contains('\0') {
            errors.push(messages::NULL_CHARACTERS.to_string());
        }
        if let Some(message) = self.check.as_ref().and_then(|c| c.check(&value)) {
            errors.push(message.to_string());
        }
        collect(Value::Str(value), errors)
    }
}

/// A UUID field. Accepts hyphenated, simple, braced and URN forms, or an
/// integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidKind;

impl FieldKind for UuidKind {
    fn to_internal_value(&self, data: &JsonValue) -> Result<Value, ErrorDetail> {
        let parsed = match data {
            JsonValue::String(s) => Uuid::parse_str(s).ok(),
            JsonValue::Number(n) => n.as_u64().map(|v| Uuid::from_u128(u128::from(v))),
            _ => None,
        };
        parsed
            .map(Value::Uuid)
            .ok_or_else(|| ErrorDetail::message(messages::UUID))
    }
}

/// An IP address field restricted to a protocol.
#[derive(Debug, Clone)]
pub struct IpKind {
    protocol: Protocol,
    trim_whitespace: bool,
    allow_blank: bool,
}

impl IpKind {
    /// Builds an IP kind for a protocol.
    #[must_use]
    pub fn new(settings: &ParamSettings, protocol: Protocol) -> Self {
        Self {
            protocol,
            trim_whitespace: settings.trim_whitespace(),
            allow_blank: settings.allow_blank(),
        }
    }

    const fn message(&self) -> &'static str {
        match self.protocol {
            Protocol::Both => messages::IP,
            Protocol::IPv4 => messages::IPV4,
            Protocol::IPv6 => messages::IPV6,
        }
    }
}

impl FieldKind for IpKind {
    fn to_internal_value(&self, data: &JsonValue) -> Result<Value, ErrorDetail> {
        if let Some(result) = blank(data, self.trim_whitespace, self.allow_blank) {
            return result;
        }
        let JsonValue::String(text) = data else {
            return Err(ErrorDetail::message(messages::IP));
        };
        let text = if self.trim_whitespace { text.trim() } else { text };

        let parsed = text.parse::<IpAddr>().ok().filter(|ip| match self.protocol {
            Protocol::Both => true,
            Protocol::IPv4 => ip.is_ipv4(),
            Protocol::IPv6 => ip.is_ipv6(),
        });
        parsed
            .map(Value::Ip)
            .ok_or_else(|| ErrorDetail::message(self.message()))
    }
}
