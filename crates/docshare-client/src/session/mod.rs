//! The single current session, passed explicitly to the API client.
//!
//! A [`Session`] holds at most one [`SessionIdentity`] and mirrors it into a
//! [`TokenStore`] so that a later run can pick it up again with
//! [`Session::restore`].

mod store;

use std::fmt;
use std::sync::Arc;

use docshare_core::types::SessionIdentity;
use docshare_core::{Error, Result};
use tokio::sync::RwLock;

pub use self::store::{FileTokenStore, MemoryTokenStore, TOKEN_KEY, TokenStore, USER_KEY};

/// Tracing target for session operations.
pub const TRACING_TARGET: &str = "docshare_client::session";

/// Shared handle to the current session identity.
///
/// Clones observe the same identity.
#[derive(Clone)]
pub struct Session {
    identity: Arc<RwLock<Option<SessionIdentity>>>,
    store: Arc<dyn TokenStore>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl Session {
    /// Creates an empty session persisted into `store`.
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self {
            identity: Arc::new(RwLock::new(None)),
            store: Arc::new(store),
        }
    }

    /// Creates an empty session that is never written to disk.
    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::new())
    }

    /// Loads the persisted identity, if any.
    ///
    /// Returns true if an identity was restored.
    pub async fn restore(&self) -> Result<bool> {
        let loaded = self.store.load()?;
        let restored = loaded.is_some();

        if let Some(identity) = &loaded {
            tracing::debug!(
                target: TRACING_TARGET,
                username = %identity.username,
                "session restored"
            );
        }

        *self.identity.write().await = loaded;
        Ok(restored)
    }

    /// Replaces the current identity and persists it.
    ///
    /// A failure to persist is logged; the in-process session is still set.
    pub async fn establish(&self, mut identity: SessionIdentity) {
        identity.normalize_roles();

        if let Err(error) = self.store.save(&identity) {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "failed to persist session"
            );
        }

        tracing::info!(
            target: TRACING_TARGET,
            username = %identity.username,
            admin = identity.is_admin(),
            "session established"
        );

        *self.identity.write().await = Some(identity);
    }

    /// Clears the identity locally. Never fails.
    pub async fn logout(&self) {
        let previous = self.identity.write().await.take();

        if let Err(error) = self.store.clear() {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "failed to clear persisted session"
            );
        }

        if let Some(identity) = previous {
            tracing::info!(
                target: TRACING_TARGET,
                username = %identity.username,
                "session cleared"
            );
        }
    }

    /// Returns a copy of the current identity.
    pub async fn identity(&self) -> Option<SessionIdentity> {
        self.identity.read().await.clone()
    }

    /// Returns true if a token is held.
    pub async fn is_authenticated(&self) -> bool {
        self.identity.read().await.is_some()
    }

    /// Returns true if the held identity carries the admin role.
    pub async fn is_admin(&self) -> bool {
        self.identity
            .read()
            .await
            .as_ref()
            .is_some_and(SessionIdentity::is_admin)
    }

    /// Returns the `Authorization` header value.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Unauthenticated`] if no token is held.
    ///
    /// [`ErrorKind::Unauthenticated`]: docshare_core::ErrorKind::Unauthenticated
    pub async fn bearer(&self) -> Result<String> {
        self.identity
            .read()
            .await
            .as_ref()
            .map(SessionIdentity::bearer)
            .ok_or_else(|| Error::unauthenticated().with_message("not logged in"))
    }

    /// Returns the bearer header value if the identity is an administrator.
    ///
    /// The role check is local; the backend enforces it again.
    pub async fn require_admin(&self) -> Result<String> {
        let guard = self.identity.read().await;
        match guard.as_ref() {
            None => Err(Error::unauthenticated().with_message("not logged in")),
            Some(identity) if !identity.is_admin() => {
                Err(Error::unauthenticated().with_message("administrator role required"))
            }
            Some(identity) => Ok(identity.bearer()),
        }
    }
}
