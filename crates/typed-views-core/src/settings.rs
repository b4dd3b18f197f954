//! Per-parameter binding settings.
//!
//! A [`ParamSettings`] value describes where a handler parameter comes from
//! and which validation knobs apply to it. Settings are built once, when the
//! handler is declared, and are immutable afterwards.
//!
//! # Example
//!
//! ```
//! use typed_views_core::{ParamSettings, SourceKind};
//!
//! let settings = ParamSettings::query()
//!     .source("search")
//!     .max_length(64)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(settings.source_kind(), Some(SourceKind::Query));
//! assert_eq!(settings.source(), Some("search"));
//! assert!(settings.trim_whitespace());
//! ```

use crate::error::SettingsError;
use crate::value::Value;
use chrono::FixedOffset;
use regex::Regex;
use rust_decimal::RoundingStrategy;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// The part of the request a parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// A capture from the URL path.
    Path,
    /// A query-string parameter.
    Query,
    /// The parsed request body.
    Body,
    /// A request header.
    Header,
    /// The authenticated principal.
    CurrentUser,
}

impl SourceKind {
    /// Returns the canonical name of this source kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query_param",
            Self::Body => "body",
            Self::Header => "header",
            Self::CurrentUser => "current_user",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "path" => Ok(Self::Path),
            "query" | "query_param" => Ok(Self::Query),
            "body" => Ok(Self::Body),
            "header" => Ok(Self::Header),
            "current_user" => Ok(Self::CurrentUser),
            other => Err(SettingsError::InvalidSourceKind(other.to_string())),
        }
    }
}

/// String formats recognised by the `format` knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// A UUID in any standard textual form.
    Uuid,
    /// An email address.
    Email,
    /// Letters, digits, underscores and hyphens.
    Slug,
    /// An absolute http(s)/ftp(s) URL.
    Url,
    /// An IPv4 address.
    Ipv4,
    /// An IPv6 address.
    Ipv6,
    /// Either address family, restricted by the `protocol` knob.
    Ip,
    /// One of the paths listed under the `path` knob.
    FilePath,
}

impl FromStr for Format {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uuid" => Ok(Self::Uuid),
            "email" => Ok(Self::Email),
            "slug" => Ok(Self::Slug),
            "url" => Ok(Self::Url),
            "ipv4" => Ok(Self::Ipv4),
            "ipv6" => Ok(Self::Ipv6),
            "ip" => Ok(Self::Ip),
            "file_path" => Ok(Self::FilePath),
            other => Err(SettingsError::InvalidFormat(other.to_string())),
        }
    }
}

/// IP protocol restriction for the `ip` format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Protocol {
    /// Accept IPv4 and IPv6.
    #[default]
    Both,
    /// Accept IPv4 only.
    IPv4,
    /// Accept IPv6 only.
    IPv6,
}

impl FromStr for Protocol {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "both" => Ok(Self::Both),
            "ipv4" => Ok(Self::IPv4),
            "ipv6" => Ok(Self::IPv6),
            _ => Err(SettingsError::InvalidProtocol(s.to_string())),
        }
    }
}

/// Decimal rounding modes, named the way decimal contexts usually name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round half away from zero.
    HalfUp,
    /// Round half to even (banker's rounding).
    HalfEven,
    /// Round half towards zero.
    HalfDown,
    /// Always away from zero.
    Up,
    /// Always towards zero.
    Down,
    /// Towards positive infinity.
    Ceiling,
    /// Towards negative infinity.
    Floor,
}

impl Rounding {
    /// The equivalent `rust_decimal` strategy.
    #[must_use]
    pub const fn strategy(self) -> RoundingStrategy {
        match self {
            Self::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Self::HalfEven => RoundingStrategy::MidpointNearestEven,
            Self::HalfDown => RoundingStrategy::MidpointTowardZero,
            Self::Up => RoundingStrategy::AwayFromZero,
            Self::Down => RoundingStrategy::ToZero,
            Self::Ceiling => RoundingStrategy::ToPositiveInfinity,
            Self::Floor => RoundingStrategy::ToNegativeInfinity,
        }
    }
}

impl FromStr for Rounding {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix("ROUND_").unwrap_or(s);
        match name.to_ascii_uppercase().as_str() {
            "HALF_UP" => Ok(Self::HalfUp),
            "HALF_EVEN" => Ok(Self::HalfEven),
            "HALF_DOWN" => Ok(Self::HalfDown),
            "UP" => Ok(Self::Up),
            "DOWN" => Ok(Self::Down),
            "CEILING" => Ok(Self::Ceiling),
            "FLOOR" => Ok(Self::Floor),
            _ => Err(SettingsError::InvalidRounding(s.to_string())),
        }
    }
}

/// File-path listing options used by the `file_path` format.
#[derive(Debug, Clone)]
pub struct FilePathOptions {
    path: Option<PathBuf>,
    pattern: Option<Regex>,
    recursive: bool,
    allow_files: bool,
    allow_folders: bool,
}

impl FilePathOptions {
    /// The directory whose entries are the valid choices.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    /// Pattern an entry's file name must match.
    #[must_use]
    pub const fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// Whether subdirectories are listed too.
    #[must_use]
    pub const fn recursive(&self) -> bool {
        self.recursive
    }

    /// Whether files are valid choices.
    #[must_use]
    pub const fn allow_files(&self) -> bool {
        self.allow_files
    }

    /// Whether folders are valid choices.
    #[must_use]
    pub const fn allow_folders(&self) -> bool {
        self.allow_folders
    }
}

impl Default for FilePathOptions {
    fn default() -> Self {
        Self {
            path: None,
            pattern: None,
            recursive: false,
            allow_files: true,
            allow_folders: false,
        }
    }
}

/// Immutable binding settings for one handler parameter.
///
/// Build with one of the source-specific constructors ([`query`](Self::query),
/// [`path`](Self::path), [`body`](Self::body), [`header`](Self::header),
/// [`current_user`](Self::current_user)) or with [`param`](Self::param) for
/// knob-only settings such as list-child settings.
#[derive(Debug, Clone)]
pub struct ParamSettings {
    source_kind: Option<SourceKind>,
    default: Option<Value>,
    source: Option<String>,
    min_value: Option<f64>,
    max_value: Option<f64>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    regex: Option<Regex>,
    format: Option<Format>,
    input_formats: Vec<String>,
    default_timezone: Option<FixedOffset>,
    trim_whitespace: bool,
    allow_blank: bool,
    choices: Option<Vec<String>>,
    delimiter: String,
    max_digits: Option<u32>,
    decimal_places: Option<u32>,
    rounding: Option<Rounding>,
    coerce_to_string: bool,
    localize: bool,
    file_path: FilePathOptions,
    protocol: Protocol,
    child: Option<Box<ParamSettings>>,
    allow_empty: bool,
    member_of: Option<String>,
    member_of_any: Vec<String>,
}

impl Default for ParamSettings {
    fn default() -> Self {
        Self {
            source_kind: None,
            default: None,
            source: None,
            min_value: None,
            max_value: None,
            min_length: None,
            max_length: None,
            regex: None,
            format: None,
            input_formats: Vec::new(),
            default_timezone: None,
            trim_whitespace: true,
            allow_blank: false,
            choices: None,
            delimiter: ",".to_string(),
            max_digits: None,
            decimal_places: None,
            rounding: None,
            coerce_to_string: false,
            localize: false,
            file_path: FilePathOptions::default(),
            protocol: Protocol::Both,
            child: None,
            allow_empty: true,
            member_of: None,
            member_of_any: Vec::new(),
        }
    }
}

impl ParamSettings {
    /// Settings builder for a query-string parameter.
    #[must_use]
    pub fn query() -> ParamSettingsBuilder {
        ParamSettingsBuilder::new(Some(SourceKind::Query))
    }

    /// Settings builder for a path capture.
    #[must_use]
    pub fn path() -> ParamSettingsBuilder {
        ParamSettingsBuilder::new(Some(SourceKind::Path))
    }

    /// Settings builder for a body value.
    #[must_use]
    pub fn body() -> ParamSettingsBuilder {
        ParamSettingsBuilder::new(Some(SourceKind::Body))
    }

    /// Settings builder for a request header.
    #[must_use]
    pub fn header() -> ParamSettingsBuilder {
        ParamSettingsBuilder::new(Some(SourceKind::Header))
    }

    /// Settings builder for the authenticated principal.
    #[must_use]
    pub fn current_user() -> ParamSettingsBuilder {
        ParamSettingsBuilder::new(Some(SourceKind::CurrentUser))
    }

    /// Settings builder with no source kind.
    ///
    /// Use for list-child settings, or to attach validation knobs to a
    /// parameter whose source is still resolved implicitly.
    #[must_use]
    pub fn param() -> ParamSettingsBuilder {
        ParamSettingsBuilder::new(None)
    }

    /// Settings with a source kind and every knob at its default.
    #[must_use]
    pub fn for_kind(kind: Option<SourceKind>) -> Self {
        Self {
            source_kind: kind,
            ..Self::default()
        }
    }

    /// Returns a copy of these settings with a different default.
    #[must_use]
    pub fn with_default(&self, default: Option<Value>) -> Self {
        Self {
            default,
            ..self.clone()
        }
    }

    /// Returns a copy of these settings with a different source kind.
    #[must_use]
    pub fn with_source_kind(&self, kind: Option<SourceKind>) -> Self {
        Self {
            source_kind: kind,
            ..self.clone()
        }
    }

    /// The request part this parameter is read from, if set.
    #[must_use]
    pub const fn source_kind(&self) -> Option<SourceKind> {
        self.source_kind
    }

    /// The default used when the value is absent.
    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The source key override (dotted path or `"*"`).
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Returns `true` if the source is the `"*"` wildcard.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.source.as_deref() == Some("*")
    }

    /// Lower numeric bound.
    #[must_use]
    pub const fn min_value(&self) -> Option<f64> {
        self.min_value
    }

    /// Upper numeric bound.
    #[must_use]
    pub const fn max_value(&self) -> Option<f64> {
        self.max_value
    }

    /// Minimum string length or list size.
    #[must_use]
    pub const fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    /// Maximum string length or list size.
    #[must_use]
    pub const fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Compiled pattern the value must match.
    #[must_use]
    pub const fn regex(&self) -> Option<&Regex> {
        self.regex.as_ref()
    }

    /// Named string format.
    #[must_use]
    pub const fn format(&self) -> Option<Format> {
        self.format
    }

    /// Custom strftime-style input formats for temporal types.
    #[must_use]
    pub fn input_formats(&self) -> &[String] {
        &self.input_formats
    }

    /// Offset applied to naive datetimes.
    #[must_use]
    pub const fn default_timezone(&self) -> Option<FixedOffset> {
        self.default_timezone
    }

    /// Whether surrounding whitespace is stripped from strings.
    #[must_use]
    pub const fn trim_whitespace(&self) -> bool {
        self.trim_whitespace
    }

    /// Whether empty strings are accepted.
    #[must_use]
    pub const fn allow_blank(&self) -> bool {
        self.allow_blank
    }

    /// Allowed values, if restricted.
    #[must_use]
    pub fn choices(&self) -> Option<&[String]> {
        self.choices.as_deref()
    }

    /// Delimiter used to split query lists.
    #[must_use]
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Maximum number of decimal digits.
    #[must_use]
    pub const fn max_digits(&self) -> Option<u32> {
        self.max_digits
    }

    /// Maximum number of decimal places.
    #[must_use]
    pub const fn decimal_places(&self) -> Option<u32> {
        self.decimal_places
    }

    /// Rounding applied when quantizing decimals.
    #[must_use]
    pub const fn rounding(&self) -> Option<Rounding> {
        self.rounding
    }

    /// Whether decimals are returned as strings.
    #[must_use]
    pub const fn coerce_to_string(&self) -> bool {
        self.coerce_to_string
    }

    /// Whether locale thousands separators are accepted in decimals.
    #[must_use]
    pub const fn localize(&self) -> bool {
        self.localize
    }

    /// File-path listing options.
    #[must_use]
    pub const fn file_path(&self) -> &FilePathOptions {
        &self.file_path
    }

    /// IP protocol restriction.
    #[must_use]
    pub const fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Settings applied to each list item.
    #[must_use]
    pub fn child(&self) -> Option<&ParamSettings> {
        self.child.as_deref()
    }

    /// Whether empty lists are accepted.
    #[must_use]
    pub const fn allow_empty(&self) -> bool {
        self.allow_empty
    }

    /// Group the principal must belong to.
    #[must_use]
    pub fn member_of(&self) -> Option<&str> {
        self.member_of.as_deref()
    }

    /// Groups of which the principal must belong to at least one.
    #[must_use]
    pub fn member_of_any(&self) -> &[String] {
        &self.member_of_any
    }
}

/// Builder for [`ParamSettings`].
///
/// Knobs that take enumerated string values (`format`, `protocol`,
/// `rounding`, `param_type`) and patterns are checked by [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct ParamSettingsBuilder {
    settings: ParamSettings,
    source_kind: Option<String>,
    regex: Option<String>,
    format: Option<String>,
    protocol: Option<String>,
    rounding: Option<String>,
    file_match: Option<String>,
    default_timezone: Option<String>,
    child: Option<Box<ParamSettingsBuilder>>,
}

impl ParamSettingsBuilder {
    fn new(kind: Option<SourceKind>) -> Self {
        Self {
            settings: ParamSettings::for_kind(kind),
            source_kind: None,
            regex: None,
            format: None,
            protocol: None,
            rounding: None,
            file_match: None,
            default_timezone: None,
            child: None,
        }
    }

    /// Sets the source kind by name (`path`, `query_param`, `body`, `header`, `current_user`).
    pub fn param_type(mut self, name: impl Into<String>) -> Self {
        self.source_kind = Some(name.into());
        self
    }

    /// Sets the default value.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.settings.default = Some(value.into());
        self
    }

    /// Sets the source key (dotted path or `"*"`).
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.settings.source = Some(source.into());
        self
    }

    /// Sets the lower numeric bound.
    pub fn min_value(mut self, value: f64) -> Self {
        self.settings.min_value = Some(value);
        self
    }

    /// Sets the upper numeric bound.
    pub fn max_value(mut self, value: f64) -> Self {
        self.settings.max_value = Some(value);
        self
    }

    /// Sets the minimum length.
    pub fn min_length(mut self, length: usize) -> Self {
        self.settings.min_length = Some(length);
        self
    }

    /// Sets the maximum length.
    pub fn max_length(mut self, length: usize) -> Self {
        self.settings.max_length = Some(length);
        self
    }

    /// Sets the pattern strings must match.
    pub fn regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }

    /// Sets the named string format.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Adds a strftime-style input format for temporal types.
    pub fn input_format(mut self, format: impl Into<String>) -> Self {
        self.settings.input_formats.push(format.into());
        self
    }

    /// Sets the offset applied to naive datetimes.
    pub fn default_timezone(mut self, offset: FixedOffset) -> Self {
        self.settings.default_timezone = Some(offset);
        self
    }

    /// Sets the offset applied to naive datetimes from text such as `+02:00` or `Z`.
    pub fn default_timezone_str(mut self, offset: impl Into<String>) -> Self {
        self.default_timezone = Some(offset.into());
        self
    }

    /// Sets whether surrounding whitespace is stripped.
    pub fn trim_whitespace(mut self, trim: bool) -> Self {
        self.settings.trim_whitespace = trim;
        self
    }

    /// Sets whether empty strings are accepted.
    pub fn allow_blank(mut self, allow: bool) -> Self {
        self.settings.allow_blank = allow;
        self
    }

    /// Restricts the value to a set of choices.
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the delimiter used to split query lists.
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.settings.delimiter = delimiter.into();
        self
    }

    /// Sets the maximum number of decimal digits.
    pub fn max_digits(mut self, digits: u32) -> Self {
        self.settings.max_digits = Some(digits);
        self
    }

    /// Sets the maximum number of decimal places.
    pub fn decimal_places(mut self, places: u32) -> Self {
        self.settings.decimal_places = Some(places);
        self
    }

    /// Sets the decimal rounding mode by name, e.g. `ROUND_HALF_UP`.
    pub fn rounding(mut self, rounding: impl Into<String>) -> Self {
        self.rounding = Some(rounding.into());
        self
    }

    /// Returns decimals as strings.
    pub fn coerce_to_string(mut self, coerce: bool) -> Self {
        self.settings.coerce_to_string = coerce;
        self
    }

    /// Accepts locale thousands separators in decimals.
    pub fn localize(mut self, localize: bool) -> Self {
        self.settings.localize = localize;
        self
    }

    /// Sets the directory listed by the `file_path` format.
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings.file_path.path = Some(path.into());
        self
    }

    /// Sets the pattern listed file names must match.
    pub fn file_match(mut self, pattern: impl Into<String>) -> Self {
        self.file_match = Some(pattern.into());
        self
    }

    /// Lists subdirectories recursively.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.settings.file_path.recursive = recursive;
        self
    }

    /// Sets whether files are valid choices.
    pub fn allow_files(mut self, allow: bool) -> Self {
        self.settings.file_path.allow_files = allow;
        self
    }

    /// Sets whether folders are valid choices.
    pub fn allow_folders(mut self, allow: bool) -> Self {
        self.settings.file_path.allow_folders = allow;
        self
    }

    /// Sets the IP protocol restriction (`both`, `IPv4`, `IPv6`).
    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    /// Sets the settings applied to each list item.
    pub fn child(mut self, child: ParamSettingsBuilder) -> Self {
        self.child = Some(Box::new(child));
        self
    }

    /// Sets whether empty lists are accepted.
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.settings.allow_empty = allow;
        self
    }

    /// Requires the principal to belong to a group.
    pub fn member_of(mut self, group: impl Into<String>) -> Self {
        self.settings.member_of = Some(group.into());
        self
    }

    /// Requires the principal to belong to at least one of these groups.
    pub fn member_of_any<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.member_of_any = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Validates the knobs and returns the settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if `regex` and `format` are both set, if an
    /// enumerated knob holds an unknown value, or if a pattern fails to compile.
    pub fn build(self) -> Result<ParamSettings, SettingsError> {
        let mut settings = self.settings;

        if self.regex.is_some() && self.format.is_some() {
            return Err(SettingsError::RegexWithFormat);
        }

        if let Some(kind) = self.source_kind {
            settings.source_kind = Some(kind.parse()?);
        }
        if let Some(format) = self.format {
            settings.format = Some(format.parse()?);
        }
        if let Some(protocol) = self.protocol {
            settings.protocol = protocol.parse()?;
        }
        if let Some(rounding) = self.rounding {
            settings.rounding = Some(rounding.parse()?);
        }
        if let Some(pattern) = self.regex {
            settings.regex =
                Some(Regex::new(&pattern).map_err(|e| SettingsError::invalid_pattern("regex", e))?);
        }
        if let Some(pattern) = self.file_match {
            settings.file_path.pattern =
                Some(Regex::new(&pattern).map_err(|e| SettingsError::invalid_pattern("match", e))?);
        }
        if let Some(offset) = self.default_timezone {
            settings.default_timezone = Some(parse_offset(&offset)?);
        }
        if let Some(child) = self.child {
            settings.child = Some(Box::new(child.build()?));
        }

        Ok(settings)
    }
}

fn parse_offset(text: &str) -> Result<FixedOffset, SettingsError> {
    let invalid = || SettingsError::InvalidTimezone(text.to_string());
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'+') => (1, &trimmed[1..]),
        Some(b'-') => (-1, &trimmed[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => (
            rest.get(..2).ok_or_else(invalid)?,
            rest.get(2..).ok_or_else(invalid)?,
        ),
        None => (rest, "0"),
    };
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    let seconds = hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|total| total.checked_mul(sign))
        .ok_or_else(invalid)?;
    FixedOffset::east_opt(seconds).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ParamSettings::param().build().unwrap();
        assert_eq!(settings.source_kind(), None);
        assert!(settings.trim_whitespace());
        assert!(!settings.allow_blank());
        assert_eq!(settings.delimiter(), ",");
        assert!(!settings.coerce_to_string());
        assert!(!settings.localize());
        assert!(!settings.file_path().recursive());
        assert!(settings.file_path().allow_files());
        assert!(!settings.file_path().allow_folders());
        assert_eq!(settings.protocol(), Protocol::Both);
        assert!(settings.allow_empty());
        assert!(settings.member_of_any().is_empty());
        assert!(settings.default_value().is_none());
    }

    #[test]
    fn test_source_constructors() {
        assert_eq!(
            ParamSettings::path().build().unwrap().source_kind(),
            Some(SourceKind::Path)
        );
        assert_eq!(
            ParamSettings::body().build().unwrap().source_kind(),
            Some(SourceKind::Body)
        );
        assert_eq!(
            ParamSettings::header().build().unwrap().source_kind(),
            Some(SourceKind::Header)
        );
        assert_eq!(
            ParamSettings::current_user().build().unwrap().source_kind(),
            Some(SourceKind::CurrentUser)
        );
    }

    #[test]
    fn test_regex_and_format_rejected() {
        let result = ParamSettings::query().regex("^a").format("email").build();
        assert!(matches!(result, Err(SettingsError::RegexWithFormat)));
    }

    #[test]
    fn test_invalid_format_rejected() {
        let result = ParamSettings::query().format("phone").build();
        assert!(matches!(result, Err(SettingsError::InvalidFormat(f)) if f == "phone"));
    }

    #[test]
    fn test_invalid_protocol_rejected() {
        let result = ParamSettings::query().protocol("IPv5").build();
        assert!(matches!(result, Err(SettingsError::InvalidProtocol(_))));
        let ok = ParamSettings::query().protocol("IPv6").build().unwrap();
        assert_eq!(ok.protocol(), Protocol::IPv6);
    }

    #[test]
    fn test_invalid_param_type_rejected() {
        let result = ParamSettings::param().param_type("cookie").build();
        assert!(matches!(result, Err(SettingsError::InvalidSourceKind(_))));
        let ok = ParamSettings::param().param_type("header").build().unwrap();
        assert_eq!(ok.source_kind(), Some(SourceKind::Header));
    }

    #[test]
    fn test_bad_regex_rejected() {
        let result = ParamSettings::query().regex("(unclosed").build();
        assert!(matches!(
            result,
            Err(SettingsError::InvalidPattern { knob: "regex", .. })
        ));
    }

    #[test]
    fn test_rounding_names() {
        assert_eq!("ROUND_HALF_UP".parse::<Rounding>().unwrap(), Rounding::HalfUp);
        assert_eq!("ROUND_FLOOR".parse::<Rounding>().unwrap(), Rounding::Floor);
        assert_eq!(
            Rounding::HalfEven.strategy(),
            RoundingStrategy::MidpointNearestEven
        );
        assert!(ParamSettings::query().rounding("ROUND_SIDEWAYS").build().is_err());
    }

    #[test]
    fn test_child_settings() {
        let settings = ParamSettings::query()
            .child(ParamSettings::param().min_value(1.0))
            .build()
            .unwrap();
        assert_eq!(settings.child().and_then(ParamSettings::min_value), Some(1.0));
    }

    #[test]
    fn test_default_timezone_parsing() {
        let settings = ParamSettings::query()
            .default_timezone_str("+02:00")
            .build()
            .unwrap();
        assert_eq!(
            settings.default_timezone(),
            FixedOffset::east_opt(7200)
        );
        assert_eq!(
            ParamSettings::query()
                .default_timezone_str("-0530")
                .build()
                .unwrap()
                .default_timezone(),
            FixedOffset::west_opt(5 * 3600 + 30 * 60)
        );
        for bad in ["later", "+1é1", "+99999999", "+25:00"] {
            assert!(matches!(
                ParamSettings::query().default_timezone_str(bad).build(),
                Err(SettingsError::InvalidTimezone(_))
            ));
        }
    }

    #[test]
    fn test_with_default_keeps_knobs() {
        let settings = ParamSettings::query().max_length(3).build().unwrap();
        let updated = settings.with_default(Some(Value::Int(5)));
        assert_eq!(updated.max_length(), Some(3));
        assert_eq!(updated.default_value(), Some(&Value::Int(5)));
    }
}
