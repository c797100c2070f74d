//! Persistence of the session identity between client runs.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use docshare_core::types::{Role, SessionIdentity};
use docshare_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Key holding the user profile.
pub const USER_KEY: &str = "user";

/// Storage for the single current session identity.
pub trait TokenStore: Send + Sync {
    /// Loads the persisted identity, if any.
    fn load(&self) -> Result<Option<SessionIdentity>>;

    /// Persists `identity`, replacing any previous one.
    fn save(&self, identity: &SessionIdentity) -> Result<()>;

    /// Removes the persisted identity.
    fn clear(&self) -> Result<()>;
}

/// Volatile store that lives as long as the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    identity: Mutex<Option<SessionIdentity>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for MemoryTokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTokenStore").finish_non_exhaustive()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SessionIdentity>> {
        Ok(self
            .identity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, identity: &SessionIdentity) -> Result<()> {
        *self.identity.lock().unwrap_or_else(PoisonError::into_inner) = Some(identity.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.identity.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Profile half of a persisted session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUser {
    username: String,
    #[serde(default)]
    roles: BTreeSet<Role>,
    #[serde(default = "default_active")]
    active: bool,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
}

fn default_active() -> bool {
    true
}

/// On-disk layout: `{"token": "...", "user": {...}}`.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    user: StoredUser,
}

impl From<&SessionIdentity> for StoredSession {
    fn from(identity: &SessionIdentity) -> Self {
        Self {
            token: identity.token.clone(),
            user: StoredUser {
                username: identity.username.clone(),
                roles: identity.roles.clone(),
                active: identity.active,
                user_id: identity.user_id.clone(),
                email: identity.email.clone(),
                first_name: identity.first_name.clone(),
                last_name: identity.last_name.clone(),
            },
        }
    }
}

impl From<StoredSession> for SessionIdentity {
    fn from(stored: StoredSession) -> Self {
        let mut identity = SessionIdentity::new(stored.token, stored.user.username, stored.user.roles);
        identity.active = stored.user.active;
        identity.user_id = stored.user.user_id;
        identity.email = stored.user.email;
        identity.first_name = stored.user.first_name;
        identity.last_name = stored.user.last_name;
        identity
    }
}

/// JSON file store keyed by [`TOKEN_KEY`] and [`USER_KEY`].
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, action: &str, err: std::io::Error) -> Error {
        Error::from(err).with_message(format!(
            "failed to {action} session file '{}'",
            self.path.display()
        ))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SessionIdentity>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error("read", err)),
        };

        let stored: StoredSession = serde_json::from_str(&raw)?;
        if stored.token.is_empty() {
            return Ok(None);
        }
        Ok(Some(stored.into()))
    }

    fn save(&self, identity: &SessionIdentity) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error("create directory for", e))?;
        }

        let json = serde_json::to_vec_pretty(&StoredSession::from(identity))?;
        fs::write(&self.path, json).map_err(|e| self.io_error("write", e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|e| self.io_error("restrict permissions of", e))?;
        }

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error("remove", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> SessionIdentity {
        let mut identity = SessionIdentity::new("tok-1", "alice", [Role::User, Role::Admin]);
        identity.email = Some("alice@example.com".into());
        identity
    }

    #[test]
    fn test_memory_store_round() {
        let store = MemoryTokenStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&identity()).unwrap();
        assert_eq!(store.load().unwrap(), Some(identity()));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_uses_fixed_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("session.json"));

        store.save(&identity()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw[TOKEN_KEY], "tok-1");
        assert_eq!(raw[USER_KEY]["username"], "alice");
        assert!(raw[USER_KEY].get("token").is_none());

        assert_eq!(store.load().unwrap(), Some(identity()));
    }

    #[test]
    fn test_file_store_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("absent.json"));

        assert!(store.load().unwrap().is_none());
        assert!(store.clear().is_ok());
    }

    #[test]
    fn test_file_store_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.json"));

        store.save(&identity()).unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
    }
}
