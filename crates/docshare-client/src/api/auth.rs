//! Login, registration and logout.

use std::collections::BTreeSet;

use docshare_core::types::{Credentials, Registration, Role, SessionIdentity};
use docshare_core::{Error, Result};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use validator::Validate;

use crate::client::{ApiClient, TRACING_TARGET, status_error};
use crate::error::transport;

/// Body of a successful `POST /auth/login`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    #[serde(alias = "accessToken", alias = "jwt")]
    token: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    id: Option<docshare_core::types::UserId>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    roles: BTreeSet<Role>,
    #[serde(default)]
    active: Option<bool>,
}

impl LoginResponse {
    fn into_identity(self, fallback_username: &str) -> SessionIdentity {
        let username = self
            .username
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| fallback_username.to_owned());

        let mut identity = SessionIdentity::new(self.token, username, self.roles);
        identity.active = self.active.unwrap_or(true);
        identity.user_id = self.id.map(|id| id.to_string());
        identity.email = self.email;
        identity.first_name = self.first_name;
        identity.last_name = self.last_name;
        identity
    }
}

impl ApiClient {
    /// Exchanges credentials for a session identity and establishes it.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidCredentials`] when the backend rejects the
    /// credentials and [`ErrorKind::ValidationError`] when they are blank.
    ///
    /// [`ErrorKind::InvalidCredentials`]: docshare_core::ErrorKind::InvalidCredentials
    /// [`ErrorKind::ValidationError`]: docshare_core::ErrorKind::ValidationError
    pub async fn login(&self, credentials: &Credentials) -> Result<SessionIdentity> {
        credentials.validate()?;

        tracing::debug!(
            target: TRACING_TARGET,
            username = %credentials.username_or_email,
            "Logging in"
        );

        let request = self
            .public(Method::POST, &["auth", "login"])?
            .json(credentials);
        let response = request.send().await.map_err(transport)?;
        let status = response.status();

        if matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            tracing::info!(
                target: TRACING_TARGET,
                status = status.as_u16(),
                "Login rejected"
            );
            return Err(Error::invalid_credentials()
                .with_status(status.as_u16())
                .with_message("Invalid username or password"));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let bytes = response.bytes().await.map_err(transport)?;
        let login: LoginResponse = serde_json::from_slice(&bytes).map_err(transport)?;
        let identity = login.into_identity(&credentials.username_or_email);

        self.session().establish(identity.clone()).await;
        Ok(identity)
    }

    /// Creates a new account. The session is not changed.
    pub async fn register(
        &self,
        registration: &Registration,
        confirm_password: &str,
    ) -> Result<()> {
        registration.validate_with_confirmation(confirm_password)?;

        tracing::debug!(
            target: TRACING_TARGET,
            username = %registration.username,
            "Registering account"
        );

        let request = self
            .public(Method::POST, &["auth", "register"])?
            .json(registration);
        self.send_empty(request).await
    }

    /// Clears the session locally. Never fails.
    pub async fn logout(&self) {
        self.session().logout().await;
    }
}
