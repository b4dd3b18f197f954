//! Path captures produced by the host router.
//!
//! Captures are stored in a small vector since routes rarely have more than
//! a handful of dynamic segments.

use serde_json::Value as JsonValue;
use smallvec::SmallVec;

/// Maximum number of captures stored inline.
const INLINE_CAPTURES: usize = 4;

/// Ordered `(name, value)` pairs captured from the URL path.
///
/// Values are JSON so a router with typed converters can hand over numbers
/// as numbers; plain routers push strings.
///
/// # Example
///
/// ```rust
/// use typed_views_core::PathCaptures;
///
/// let mut captures = PathCaptures::new();
/// captures.push("id", "123");
///
/// assert_eq!(captures.get("id"), Some(&serde_json::json!("123")));
/// assert!(captures.contains("id"));
/// assert_eq!(captures.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathCaptures {
    inner: SmallVec<[(String, JsonValue); INLINE_CAPTURES]>,
}

impl PathCaptures {
    /// Creates an empty capture set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a capture.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<JsonValue>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Adds a capture, returning the set.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.push(name, value);
        self
    }

    /// Returns the value of a capture by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.inner.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Returns `true` if a capture with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.iter().any(|(n, _)| n == name)
    }

    /// Returns true if there are no captures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of captures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Returns an iterator over capture names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.iter().map(|(n, _)| n.as_str())
    }
}

impl<N: Into<String>, V: Into<JsonValue>> FromIterator<(N, V)> for PathCaptures {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_captures_new() {
        let captures = PathCaptures::new();
        assert!(captures.is_empty());
        assert_eq!(captures.len(), 0);
    }

    #[test]
    fn test_captures_keep_types() {
        let captures = PathCaptures::new().with("id", 7).with("slug", "intro");
        assert_eq!(captures.get("id"), Some(&json!(7)));
        assert_eq!(captures.get("slug"), Some(&json!("intro")));
    }

    #[test]
    fn test_captures_order() {
        let captures: PathCaptures = vec![("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(captures.names().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_captures_spill_to_heap() {
        let mut captures = PathCaptures::new();
        for i in 0..10 {
            captures.push(format!("p{i}"), i);
        }
        assert_eq!(captures.len(), 10);
        assert_eq!(captures.get("p9"), Some(&json!(9)));
    }
}
