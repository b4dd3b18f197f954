//! Raw and validated parameter values.
//!
//! Extraction produces a [`Raw`] value, validators turn it into a [`Value`],
//! and handlers pull concrete Rust types out of the resulting [`Args`] with
//! [`FromValue`].

use crate::error::ArgError;
use crate::principal::Principal;
use crate::request::Request;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::any::Any;
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use uuid::Uuid;

/// A value as extracted from the request, before validation.
///
/// `Empty` means "nothing was supplied" and is distinct from an explicit
/// JSON `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Raw {
    /// Nothing was supplied.
    Empty,
    /// A JSON value from the path, query, body or headers.
    Json(JsonValue),
    /// The authenticated principal itself.
    Principal(Principal),
}

impl Raw {
    /// Returns `true` for the empty sentinel.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the JSON form of the raw value, if it has one.
    #[must_use]
    pub fn to_json(&self) -> Option<JsonValue> {
        match self {
            Self::Empty => None,
            Self::Json(value) => Some(value.clone()),
            Self::Principal(principal) => Some(principal.to_json()),
        }
    }
}

impl From<JsonValue> for Raw {
    fn from(value: JsonValue) -> Self {
        Self::Json(value)
    }
}

impl From<&str> for Raw {
    fn from(value: &str) -> Self {
        Self::Json(JsonValue::String(value.to_string()))
    }
}

impl From<Option<JsonValue>> for Raw {
    fn from(value: Option<JsonValue>) -> Self {
        value.map_or(Self::Empty, Self::Json)
    }
}

/// A type-erased complex-schema instance.
///
/// Holds the validated Rust value together with its JSON projection, so the
/// instance can be rendered without knowing its concrete type.
#[derive(Clone)]
pub struct Instance {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
    json: JsonValue,
}

impl Instance {
    /// Wraps a validated value.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(type_name: &'static str, value: T, json: JsonValue) -> Self {
        Self {
            type_name,
            inner: Arc::new(value),
            json,
        }
    }

    /// The schema type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The JSON projection of the instance.
    #[must_use]
    pub const fn json(&self) -> &JsonValue {
        &self.json
    }

    /// Borrows the instance as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Returns a shared handle to the instance as `T`.
    #[must_use]
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .field("json", &self.json)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.type_name == other.type_name && self.json == other.json)
    }
}

/// A validated parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A fixed-point decimal.
    Decimal(Decimal),
    /// A string.
    Str(String),
    /// A UUID.
    Uuid(Uuid),
    /// An IP address.
    Ip(IpAddr),
    /// A timezone-aware datetime.
    DateTime(DateTime<FixedOffset>),
    /// A calendar date.
    Date(NaiveDate),
    /// A time of day.
    Time(NaiveTime),
    /// A duration.
    Duration(TimeDelta),
    /// A list of validated values.
    List(Vec<Value>),
    /// Unvalidated or schema-shaped JSON.
    Json(JsonValue),
    /// The authenticated principal.
    Principal(Principal),
    /// The request itself.
    Request(Arc<Request>),
    /// A complex-schema instance.
    Instance(Instance),
}

impl Value {
    /// A short name for the kind of value, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Decimal(_) => "decimal",
            Self::Str(_) => "string",
            Self::Uuid(_) => "uuid",
            Self::Ip(_) => "ip",
            Self::DateTime(_) => "datetime",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::Duration(_) => "duration",
            Self::List(_) => "list",
            Self::Json(_) => "json",
            Self::Principal(_) => "principal",
            Self::Request(_) => "request",
            Self::Instance(_) => "instance",
        }
    }

    /// Returns `true` for [`Value::Null`] and JSON `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null | Self::Json(JsonValue::Null))
    }

    /// The textual form used for choice membership checks.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Json(JsonValue::String(s)) => s.clone(),
            other => match other.to_json() {
                JsonValue::String(s) => s,
                json => json.to_string(),
            },
        }
    }

    /// Converts the value into JSON for rendering.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null | Self::Request(_) => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Int(i) => JsonValue::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
            Self::Decimal(d) => JsonValue::String(d.to_string()),
            Self::Str(s) => JsonValue::String(s.clone()),
            Self::Uuid(u) => JsonValue::String(u.to_string()),
            Self::Ip(ip) => JsonValue::String(ip.to_string()),
            Self::DateTime(dt) => JsonValue::String(format_datetime(dt)),
            Self::Date(d) => JsonValue::String(d.format("%Y-%m-%d").to_string()),
            Self::Time(t) => JsonValue::String(t.format("%H:%M:%S%.f").to_string()),
            Self::Duration(d) => JsonValue::String(format_duration(*d)),
            Self::List(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
            Self::Json(json) => json.clone(),
            Self::Principal(p) => p.to_json(),
            Self::Instance(instance) => instance.json().clone(),
        }
    }
}

fn format_datetime(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
}

/// Formats a duration as `[DD] [HH:[MM:]]ss[.uuuuuu]`.
#[must_use]
pub fn format_duration(duration: TimeDelta) -> String {
    let mut micros = duration.num_microseconds().unwrap_or(i64::MAX);
    let negative = micros < 0;
    if negative {
        micros = -micros;
    }
    let total_seconds = micros / 1_000_000;
    let fraction = micros % 1_000_000;
    let mut days = total_seconds / 86_400;
    let mut rest = total_seconds % 86_400;
    if negative && (rest > 0 || fraction > 0) {
        days = -days - 1;
        rest = 86_400 - rest - i64::from(fraction > 0);
    } else if negative {
        days = -days;
    }
    let fraction = if negative && fraction > 0 { 1_000_000 - fraction } else { fraction };

    let hours = rest / 3600;
    let minutes = (rest % 3600) / 60;
    let seconds = rest % 60;

    let mut out = String::new();
    if days != 0 {
        out.push_str(&format!("{days} "));
    }
    out.push_str(&format!("{hours:02}:{minutes:02}:{seconds:02}"));
    if fraction != 0 {
        out.push_str(&format!(".{fraction:06}"));
    }
    out
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<JsonValue> for Value {
    fn from(v: JsonValue) -> Self {
        Self::Json(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

/// Conversion from a validated [`Value`] into a concrete handler argument type.
pub trait FromValue: Sized {
    /// Performs the conversion.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError`] if the value holds a different kind.
    fn from_value(value: Value) -> Result<Self, ArgError>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ArgError> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ArgError> {
        match value {
            Value::Bool(b) | Value::Json(JsonValue::Bool(b)) => Ok(b),
            other => Err(ArgError::mismatch("bool", other.kind())),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, ArgError> {
        match value {
            Value::Int(i) => Ok(i),
            Value::Json(JsonValue::Number(n)) => {
                n.as_i64().ok_or_else(|| ArgError::out_of_range("i64"))
            }
            other => Err(ArgError::mismatch("i64", other.kind())),
        }
    }
}

macro_rules! narrow_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ArgError> {
                    let wide = i64::from_value(value)
                        .map_err(|_| ArgError::mismatch(stringify!($ty), "non-integer"))?;
                    <$ty>::try_from(wide).map_err(|_| ArgError::out_of_range(stringify!($ty)))
                }
            }
        )*
    };
}

narrow_int!(i32, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ArgError> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            Value::Json(JsonValue::Number(n)) => {
                n.as_f64().ok_or_else(|| ArgError::out_of_range("f64"))
            }
            other => Err(ArgError::mismatch("f64", other.kind())),
        }
    }
}

impl FromValue for Decimal {
    fn from_value(value: Value) -> Result<Self, ArgError> {
        match value {
            Value::Decimal(d) => Ok(d),
            Value::Int(i) => Ok(Decimal::from(i)),
            Value::Str(s) => s
                .parse()
                .map_err(|_| ArgError::mismatch("Decimal", "string")),
            other => Err(ArgError::mismatch("Decimal", other.kind())),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ArgError> {
        match value {
            Value::Str(s) | Value::Json(JsonValue::String(s)) => Ok(s),
            Value::Uuid(u) => Ok(u.to_string()),
            Value::Ip(ip) => Ok(ip.to_string()),
            Value::Decimal(d) => Ok(d.to_string()),
            other => Err(ArgError::mismatch("String", other.kind())),
        }
    }
}

impl FromValue for Uuid {
    fn from_value(value: Value) -> Result<Self, ArgError> {
        match value {
            Value::Uuid(u) => Ok(u),
            other => Err(ArgError::mismatch("Uuid", other.kind())),
        }
    }
}

impl FromValue for IpAddr {
    fn from_value(value: Value) -> Result<Self, ArgError> {
        match value {
            Value::Ip(ip) => Ok(ip),
            other => Err(ArgError::mismatch("IpAddr", other.kind())),
        }
    }
}

impl FromValue for DateTime<FixedOffset> {
    fn from_value(value: Value) -> Result<Self, ArgError> {
        match value {
            Value::DateTime(dt) => Ok(dt),
            other => Err(ArgError::mismatch("DateTime", other.kind())),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: Value) -> Result<Self, ArgError> {
        match value {
            Value::Date(d) => Ok(d),
            other => Err(ArgError::mismatch("NaiveDate", other.kind())),
        }
    }
}

impl FromValue for NaiveTime {
    fn from_value(value: Value) -> Result<Self, ArgError> {
        match value {
            Value::Time(t) => Ok(t),
            other => Err(ArgError::mismatch("NaiveTime", other.kind())),
        }
    }
}

impl FromValue for TimeDelta {
    fn from_value(value: Value) -> Result<Self, ArgError> {
        match value {
            Value::Duration(d) => Ok(d),
            other => Err(ArgError::mismatch("TimeDelta", other.kind())),
        }
    }
}

impl FromValue for JsonValue {
    fn from_value(value: Value) -> Result<Self, ArgError> {
        match value {
            Value::Request(_) => Err(ArgError::mismatch("serde_json::Value", "request")),
            other => Ok(other.to_json()),
        }
    }
}

impl FromValue for Principal {
    fn from_value(value: Value) -> Result<Self, ArgError> {
        match value {
            Value::Principal(p) => Ok(p),
            other => Err(ArgError::mismatch("Principal", other.kind())),
        }
    }
}

impl FromValue for Arc<Request> {
    fn from_value(value: Value) -> Result<Self, ArgError> {
        match value {
            Value::Request(r) => Ok(r),
            other => Err(ArgError::mismatch("Request", other.kind())),
        }
    }
}

impl FromValue for Instance {
    fn from_value(value: Value) -> Result<Self, ArgError> {
        match value {
            Value::Instance(i) => Ok(i),
            other => Err(ArgError::mismatch("Instance", other.kind())),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ArgError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ArgError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            Value::Json(JsonValue::Array(items)) => items
                .into_iter()
                .map(|item| T::from_value(Value::Json(item)))
                .collect(),
            other => Err(ArgError::mismatch("Vec", other.kind())),
        }
    }
}

/// The ordered positional arguments handed to a typed handler.
///
/// # Example
///
/// ```
/// use typed_views_core::{Args, Value};
///
/// let args = Args::new(vec![Value::Int(7), Value::from("hello")]);
/// let id: i64 = args.arg(0).unwrap();
/// let q: String = args.arg(1).unwrap();
/// assert_eq!((id, q.as_str()), (7, "hello"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: Vec<Value>,
}

impl Args {
    /// Wraps an ordered list of values.
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrows the raw value at a position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Converts the argument at a position into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError`] if the position is out of range or holds another kind.
    pub fn arg<T: FromValue>(&self, index: usize) -> Result<T, ArgError> {
        let value = self.values.get(index).cloned().ok_or(ArgError::Missing {
            index,
            len: self.values.len(),
        })?;
        T::from_value(value).map_err(|e| e.at(index))
    }

    /// Returns the complex-schema instance at a position as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError`] if the position is out of range or is not an instance of `T`.
    pub fn instance<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>, ArgError> {
        match self.values.get(index) {
            Some(Value::Instance(instance)) => instance
                .downcast::<T>()
                .ok_or_else(|| ArgError::mismatch(std::any::type_name::<T>(), "instance").at(index)),
            Some(other) => Err(ArgError::mismatch(std::any::type_name::<T>(), other.kind()).at(index)),
            None => Err(ArgError::Missing {
                index,
                len: self.values.len(),
            }),
        }
    }

    /// Iterates over the values.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Consumes the arguments, returning the values.
    #[must_use]
    pub fn into_vec(self) -> Vec<Value> {
        self.values
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl<'a> IntoIterator for &'a Args {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
