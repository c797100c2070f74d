//! Session identity and roles.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Account role granted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(AsRefStr, Display, EnumString)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular user.
    #[serde(alias = "ROLE_USER")]
    User,
    /// Administrator with access to user and team management.
    #[serde(alias = "ROLE_ADMIN")]
    Admin,
}

/// The authenticated identity held for the lifetime of a client session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    /// Opaque bearer credential.
    pub token: String,
    /// Login name.
    pub username: String,
    /// Granted roles; never empty.
    pub roles: BTreeSet<Role>,
    /// Whether the account is active.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Backend account identifier, when reported.
    #[serde(default)]
    pub user_id: Option<String>,
    /// E-mail address, when reported.
    #[serde(default)]
    pub email: Option<String>,
    /// Given name, when reported.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name, when reported.
    #[serde(default)]
    pub last_name: Option<String>,
}

fn default_active() -> bool {
    true
}

impl SessionIdentity {
    /// Creates an active identity.
    ///
    /// An empty role list is normalized to `{USER}`.
    pub fn new(
        token: impl Into<String>,
        username: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        let mut identity = Self {
            token: token.into(),
            username: username.into(),
            roles: roles.into_iter().collect(),
            active: true,
            user_id: None,
            email: None,
            first_name: None,
            last_name: None,
        };
        identity.normalize_roles();
        identity
    }

    /// Ensures the role set contains at least [`Role::User`].
    pub fn normalize_roles(&mut self) {
        if self.roles.is_empty() {
            self.roles.insert(Role::User);
        }
    }

    /// Returns true if the identity carries the admin role.
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    /// Human readable role label.
    pub fn role_label(&self) -> &'static str {
        if self.is_admin() {
            "Administrator"
        } else {
            "User"
        }
    }

    /// Returns the `Authorization` header value for this identity.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for SessionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionIdentity")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .field("roles", &self.roles)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_empty_roles_default_to_user() {
        let identity = SessionIdentity::new("t", "bob", []);
        assert!(identity.roles.contains(&Role::User));
        assert!(!identity.is_admin());
        assert_eq!(identity.role_label(), "User");
    }

    #[test]
    fn test_admin_role() {
        let identity = SessionIdentity::new("t", "root", [Role::User, Role::Admin]);
        assert!(identity.is_admin());
        assert_eq!(identity.role_label(), "Administrator");
    }

    #[test]
    fn test_debug_redacts_token() {
        let identity = SessionIdentity::new("super-secret", "bob", [Role::User]);
        let debug = format!("{identity:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("bob"));
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::from_str("ADMIN").unwrap(), Role::Admin);
        assert_eq!(Role::from_str("user").unwrap(), Role::User);
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
    }
}
