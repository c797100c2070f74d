//! Authentication and user administration payloads.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{Role, UserId};
use crate::{Error, Result};

/// Special characters accepted (and one of which is required) in passwords.
pub const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Minimum password length for accounts created through the admin portal.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Checks the password complexity policy.
///
/// Passwords must be at least [`PASSWORD_MIN_LENGTH`] characters drawn from
/// ASCII letters, digits and [`PASSWORD_SPECIALS`], and contain at least one
/// lowercase letter, one uppercase letter, one digit and one special character.
pub fn validate_password_complexity(password: &str) -> Result<(), ValidationError> {
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c));

    let complex = password.chars().count() >= PASSWORD_MIN_LENGTH
        && allowed
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c));

    if complex {
        Ok(())
    } else {
        Err(ValidationError::new("password_complexity").with_message(Cow::Borrowed(
            "Password must contain at least one uppercase letter, one lowercase letter, \
             one number, and one special character",
        )))
    }
}

/// Login request.
#[derive(Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Username or e-mail address.
    #[validate(length(min = 1, max = 254))]
    pub username_or_email: String,
    /// Plain-text password.
    #[validate(length(min = 1, max = 1000))]
    pub password: String,
}

impl Credentials {
    /// Creates a login request.
    pub fn new(username_or_email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username_or_email: username_or_email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username_or_email", &self.username_or_email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Self-service registration request.
#[derive(Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Login name.
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    /// E-mail address.
    #[validate(email)]
    pub email: String,
    /// Plain-text password.
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    /// Given name.
    #[validate(length(max = 100))]
    pub first_name: String,
    /// Family name.
    #[validate(length(max = 100))]
    pub last_name: String,
}

impl Registration {
    /// Validates the form including the password confirmation.
    pub fn validate_with_confirmation(&self, confirm_password: &str) -> Result<()> {
        check_confirmation(&self.password, confirm_password)?;
        self.validate()?;
        Ok(())
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Account creation request issued by an administrator.
#[derive(Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Login name.
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    /// E-mail address.
    #[validate(email)]
    pub email: String,
    /// Plain-text password.
    #[validate(custom(function = "validate_password_complexity"))]
    pub password: String,
    /// Given name.
    #[validate(length(max = 100))]
    pub first_name: String,
    /// Family name.
    #[validate(length(max = 100))]
    pub last_name: String,
    /// Granted roles.
    pub roles: BTreeSet<Role>,
}

impl NewUser {
    /// Validates the form including the password confirmation.
    ///
    /// The confirmation is checked first, then the field constraints and the
    /// password complexity policy.
    pub fn validate_with_confirmation(&self, confirm_password: &str) -> Result<()> {
        check_confirmation(&self.password, confirm_password)?;
        self.validate()?;
        Ok(())
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

/// Account update request issued by an administrator.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    /// Login name.
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    /// E-mail address.
    #[validate(email)]
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Granted roles.
    pub roles: BTreeSet<Role>,
    /// Whether the account is active.
    pub active: bool,
}

impl From<&UserAccount> for UserUpdate {
    fn from(user: &UserAccount) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone().unwrap_or_default(),
            last_name: user.last_name.clone().unwrap_or_default(),
            roles: user.roles.clone(),
            active: user.active,
        }
    }
}

/// Account record as returned by the admin endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    /// Backend identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// E-mail address.
    #[serde(default)]
    pub email: String,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Granted roles.
    #[serde(default)]
    pub roles: BTreeSet<Role>,
    /// Whether the account is active.
    #[serde(default)]
    pub active: bool,
}

impl UserAccount {
    /// Returns true if the account carries the admin role.
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

fn check_confirmation(password: &str, confirm_password: &str) -> Result<()> {
    if password == confirm_password {
        Ok(())
    } else {
        Err(Error::validation().with_message("Passwords do not match"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn new_user(password: &str) -> NewUser {
        NewUser {
            username: "carol".into(),
            email: "carol@example.com".into(),
            password: password.into(),
            first_name: "Carol".into(),
            last_name: "Doe".into(),
            roles: [Role::User].into(),
        }
    }

    #[test]
    fn test_password_complexity() {
        assert!(validate_password_complexity("Abc1@x").is_ok());
        assert!(validate_password_complexity("abc1@x").is_err());
        assert!(validate_password_complexity("ABC1@X").is_err());
        assert!(validate_password_complexity("Abcd@x").is_err());
        assert!(validate_password_complexity("Abc12x").is_err());
        assert!(validate_password_complexity("Ab1@").is_err());
        assert!(validate_password_complexity("Abc1@x#").is_err());
    }

    #[test]
    fn test_confirmation_mismatch() {
        let err = new_user("Secret1!")
            .validate_with_confirmation("Secret2!")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        assert_eq!(err.message.as_deref(), Some("Passwords do not match"));
    }

    #[test]
    fn test_weak_password_rejected() {
        let err = new_user("password")
            .validate_with_confirmation("password")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
    }

    #[test]
    fn test_valid_new_user() {
        assert!(
            new_user("Secret1!")
                .validate_with_confirmation("Secret1!")
                .is_ok()
        );
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials::new("alice", "hunter2");
        assert!(!format!("{credentials:?}").contains("hunter2"));
    }

    #[test]
    fn test_user_update_from_account() {
        let account: UserAccount = serde_json::from_str(
            r#"{"id":3,"username":"dave","email":"d@x.io","roles":["USER","ADMIN"],"active":true}"#,
        )
        .unwrap();
        assert!(account.is_admin());

        let update = UserUpdate::from(&account);
        assert_eq!(update.username, "dave");
        assert_eq!(update.first_name, "");
        assert!(update.active);
    }
}
