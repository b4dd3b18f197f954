//! The request object handed to the binding pipeline.
//!
//! The host framework builds a [`Request`] once per incoming HTTP request.
//! It is read-only afterwards and shared behind an `Arc` so handlers that ask
//! for the request get the same object the pipeline read from.

use crate::error::BodyError;
use crate::principal::Principal;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it ideal for request tracking
/// and log correlation.
///
/// # Example
///
/// ```
/// use typed_views_core::RequestId;
///
/// let id = RequestId::new();
/// println!("Request ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Query-string parameters as an ordered multimap.
///
/// Repeated keys keep every value; [`get`](Self::get) returns the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    inner: IndexMap<String, Vec<String>>,
}

impl QueryParams {
    /// Creates an empty multimap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw query string (without the leading `?`).
    ///
    /// Malformed pairs are skipped.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap_or_default();
        pairs.into_iter().collect()
    }

    /// Appends a value for a key.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(key.into()).or_default().push(value.into());
    }

    /// Returns the last value supplied for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .get(key)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Returns every value supplied for a key.
    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.inner.get(key).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if the key was supplied.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Returns true if no parameters were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Flattens to a JSON object holding the last value per key.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.inner
                .iter()
                .filter_map(|(k, values)| {
                    values
                        .last()
                        .map(|v| (k.clone(), JsonValue::String(v.clone())))
                })
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.append(k, v);
        }
        params
    }
}

/// An incoming request, as exposed by the host framework.
///
/// # Example
///
/// ```
/// use typed_views_core::Request;
///
/// let request = Request::builder()
///     .uri("/items?q=shoes&page=2")
///     .header("X-Api-Version", "3")
///     .build();
///
/// assert_eq!(request.query().get("q"), Some("shoes"));
/// assert_eq!(request.headers().get("x-api-version").unwrap(), "3");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    request_id: RequestId,
    method: Method,
    path: String,
    query: QueryParams,
    headers: HeaderMap,
    data: JsonValue,
    principal: Option<Principal>,
}

impl Request {
    /// Starts building a request.
    #[must_use]
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    /// The request ID.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// The HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// The URL path, without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The query-string parameters.
    #[must_use]
    pub const fn query(&self) -> &QueryParams {
        &self.query
    }

    /// The request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The parsed body. An empty object when no body was sent.
    #[must_use]
    pub const fn data(&self) -> &JsonValue {
        &self.data
    }

    /// The authenticated principal, `None` for anonymous requests.
    #[must_use]
    pub const fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Headers as a JSON object with lower-cased names.
    ///
    /// Values that are not valid UTF-8 are skipped. Repeated headers keep the
    /// last value.
    #[must_use]
    pub fn headers_json(&self) -> JsonValue {
        let mut map = Map::new();
        for (name, value) in &self.headers {
            if let Ok(text) = value.to_str() {
                map.insert(name.as_str().to_string(), JsonValue::String(text.to_string()));
            }
        }
        JsonValue::Object(map)
    }
}

/// Builder for [`Request`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    request_id: Option<RequestId>,
    method: Method,
    path: String,
    query: QueryParams,
    headers: HeaderMap,
    data: JsonValue,
    principal: Option<Principal>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            request_id: None,
            method: Method::GET,
            path: "/".to_string(),
            query: QueryParams::new(),
            headers: HeaderMap::new(),
            data: JsonValue::Object(Map::new()),
            principal: None,
        }
    }
}

impl RequestBuilder {
    /// Sets the request ID. A fresh one is generated otherwise.
    pub fn request_id(mut self, id: RequestId) -> Self {
        self.request_id = Some(id);
        self
    }

    /// Sets the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the path and query string from a URI such as `/items?q=1`.
    pub fn uri(mut self, uri: &str) -> Self {
        match uri.split_once('?') {
            Some((path, query)) => {
                self.path = path.to_string();
                for (k, values) in QueryParams::parse(query).inner {
                    for v in values {
                        self.query.append(k.clone(), v);
                    }
                }
            }
            None => self.path = uri.to_string(),
        }
        self
    }

    /// Appends a query parameter.
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.append(key, value);
        self
    }

    /// Appends a header. Invalid names or values are ignored.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Sets the parsed body.
    pub fn json(mut self, data: JsonValue) -> Self {
        self.data = data;
        self
    }

    /// Parses a raw body according to its content type.
    ///
    /// JSON and `application/x-www-form-urlencoded` bodies are supported. An
    /// empty body leaves the data as an empty object.
    ///
    /// # Errors
    ///
    /// Returns [`BodyError`] if the body does not parse or the content type
    /// is not supported.
    pub fn raw_body(mut self, content_type: &str, body: impl Into<Bytes>) -> Result<Self, BodyError> {
        let body: Bytes = body.into();
        if body.is_empty() {
            return Ok(self);
        }

        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        self.data = if mime == "application/json" || mime.ends_with("+json") {
            serde_json::from_slice(&body)?
        } else if mime == "application/x-www-form-urlencoded" {
            let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(&body)?;
            JsonValue::Object(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k, JsonValue::String(v)))
                    .collect(),
            )
        } else {
            debug!(content_type, "unsupported request body");
            return Err(BodyError::UnsupportedMediaType(content_type.to_string()));
        };
        Ok(self)
    }

    /// Attaches an authenticated principal.
    pub fn principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    /// Builds the request.
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            request_id: self.request_id.unwrap_or_default(),
            method: self.method,
            path: self.path,
            query: self.query,
            headers: self.headers,
            data: self.data,
            principal: self.principal,
        }
    }
}
