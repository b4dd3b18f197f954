//! The authenticated principal.

use super::{Binding, ParamStrategy};
use crate::error::ParamError;
use serde_json::Value as JsonValue;
use typed_views_core::{Principal, Raw, SourceKind, Value};
use typed_views_validate::MembershipValidator;

/// Reads the principal or one of its attributes, then checks membership.
///
/// An unset source or `"*"` yields the principal itself, or null for an
/// anonymous request. A dotted source walks the principal's attributes and
/// degrades to null at the first missing one. Group membership is always
/// checked against the principal, not the extracted value.
#[derive(Debug)]
pub struct CurrentUserStrategy<'a> {
    binding: Binding<'a>,
    principal: Option<&'a Principal>,
    membership: &'a MembershipValidator,
}

impl<'a> CurrentUserStrategy<'a> {
    /// Creates the strategy.
    #[must_use]
    pub const fn new(
        binding: Binding<'a>,
        principal: Option<&'a Principal>,
        membership: &'a MembershipValidator,
    ) -> Self {
        Self {
            binding,
            principal,
            membership,
        }
    }
}

impl ParamStrategy for CurrentUserStrategy<'_> {
    fn raw_value(&self) -> Raw {
        match (self.binding.settings().source(), self.principal) {
            (None | Some("*"), Some(principal)) => Raw::Principal(principal.clone()),
            (None | Some("*"), None) | (Some(_), None) => Raw::Json(JsonValue::Null),
            (Some(path), Some(principal)) => Raw::Json(principal.lookup(path)),
        }
    }

    fn validate_or_error(&self) -> Result<Value, ParamError> {
        let value = self
            .binding
            .validate(self.raw_value(), SourceKind::CurrentUser)?;
        self.membership
            .check(self.principal)
            .map_err(|detail| ParamError::new(self.binding.key(), SourceKind::CurrentUser, detail))?;
        Ok(value)
    }
}
