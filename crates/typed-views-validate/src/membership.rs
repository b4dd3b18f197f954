//! Group-membership checks against the authenticated principal.

use typed_views_core::{ErrorDetail, ParamSettings, Principal};

/// Checks `member_of` / `member_of_any` against the real principal.
///
/// The check runs on the principal itself, never on the value extracted
/// through a dotted path. Anonymous requests fail any configured check.
#[derive(Debug, Clone, Default)]
pub struct MembershipValidator {
    member_of: Option<String>,
    member_of_any: Vec<String>,
}

impl MembershipValidator {
    /// Reads the membership knobs from settings.
    #[must_use]
    pub fn new(settings: &ParamSettings) -> Self {
        Self {
            member_of: settings.member_of().map(str::to_string),
            member_of_any: settings.member_of_any().to_vec(),
        }
    }

    /// Returns `true` if no membership check is configured.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.member_of.is_none() && self.member_of_any.is_empty()
    }

    /// Runs the configured checks.
    ///
    /// # Errors
    ///
    /// Returns a message naming the required group(s) when a check fails.
    pub fn check(&self, principal: Option<&Principal>) -> Result<(), ErrorDetail> {
        if let Some(group) = &self.member_of {
            if !principal.is_some_and(|p| p.is_member_of(group)) {
                return Err(ErrorDetail::message(format!(
                    "User must be a member of the '{group}' group"
                )));
            }
        }
        if !self.member_of_any.is_empty()
            && !principal.is_some_and(|p| p.is_member_of_any(&self.member_of_any))
        {
            let groups = self
                .member_of_any
                .iter()
                .map(|g| format!("'{g}'"))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ErrorDetail::message(format!(
                "User must be a member of at least one of these groups: {groups}"
            )));
        }
        Ok(())
    }
}
