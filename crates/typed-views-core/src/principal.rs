//! The authenticated principal attached to a request.
//!
//! Authentication itself happens upstream. By the time a request reaches the
//! binding pipeline the host has either attached a [`Principal`] or left the
//! request anonymous.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// An authenticated user.
///
/// Besides the well-known fields, free-form `attributes` are flattened into
/// the principal's JSON projection so they can be reached with dotted paths.
///
/// # Example
///
/// ```rust
/// use typed_views_core::Principal;
///
/// let user = Principal::user("u-123", "alice")
///     .with_group("staff")
///     .with_attribute("profile", serde_json::json!({"city": "Oslo"}));
///
/// assert_eq!(user.log_id(), "user:u-123");
/// assert!(user.is_member_of("staff"));
/// assert_eq!(user.lookup("profile.city"), serde_json::json!("Oslo"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    /// Stable identifier of the user.
    pub user_id: String,

    /// Login name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Roles granted to the user.
    #[serde(default)]
    pub roles: Vec<String>,

    /// Groups the user belongs to.
    #[serde(default)]
    pub groups: Vec<String>,

    /// Whether the user is staff.
    #[serde(default)]
    pub is_staff: bool,

    /// Whether the user is a superuser.
    #[serde(default)]
    pub is_superuser: bool,

    /// Additional attributes.
    #[serde(flatten, default)]
    pub attributes: Map<String, JsonValue>,
}

impl Principal {
    /// Creates a principal with an id and username.
    #[must_use]
    pub fn user(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: Some(username.into()),
            ..Self::default()
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a group membership.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// Adds a role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Sets a free-form attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Returns a string identifier suitable for logging.
    ///
    /// Never includes email or other contact details.
    #[must_use]
    pub fn log_id(&self) -> String {
        format!("user:{}", self.user_id)
    }

    /// Returns `true` if the user belongs to the group.
    #[must_use]
    pub fn is_member_of(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    /// Returns `true` if the user belongs to at least one of the groups.
    #[must_use]
    pub fn is_member_of_any(&self, groups: &[String]) -> bool {
        groups.iter().any(|g| self.is_member_of(g))
    }

    /// The JSON projection of this principal.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }

    /// Walks a dotted attribute path through the JSON projection.
    ///
    /// Any missing segment yields `null`. Numeric segments index into arrays.
    #[must_use]
    pub fn lookup(&self, path: &str) -> JsonValue {
        let mut current = self.to_json();
        for segment in path.split('.') {
            current = match current {
                JsonValue::Object(mut map) => map.remove(segment).unwrap_or(JsonValue::Null),
                JsonValue::Array(mut items) => match segment.parse::<usize>() {
                    Ok(idx) if idx < items.len() => items.swap_remove(idx),
                    _ => JsonValue::Null,
                },
                _ => JsonValue::Null,
            };
            if current.is_null() {
                break;
            }
        }
        current
    }
}
