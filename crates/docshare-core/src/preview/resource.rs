//! Process-local object URLs and the releasable [`PreviewResource`] handle.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use uuid::Uuid;

use crate::TRACING_TARGET_PREVIEW;

/// Scheme prefix of every URL minted by an [`ObjectUrlStore`].
pub const OBJECT_URL_PREFIX: &str = "blob:docshare/";

/// Bytes and content type registered under an object URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// The registered bytes.
    pub bytes: Bytes,
    /// Content type supplied at registration.
    pub content_type: String,
}

/// Registry of in-memory objects addressable by single-use URLs.
///
/// Clones share the same registry. A URL stays resolvable until it is
/// revoked; revoking frees the bytes held by the registry.
#[derive(Clone, Default)]
pub struct ObjectUrlStore {
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
}

impl fmt::Debug for ObjectUrlStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectUrlStore")
            .field("live_objects", &self.len())
            .finish()
    }
}

impl ObjectUrlStore {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn objects(&self) -> MutexGuard<'_, HashMap<String, StoredObject>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `bytes` and returns a fresh URL addressing them.
    pub fn create_object_url(&self, bytes: Bytes, content_type: impl Into<String>) -> String {
        let url = format!("{OBJECT_URL_PREFIX}{}", Uuid::new_v4());
        let size = bytes.len();

        self.objects().insert(
            url.clone(),
            StoredObject {
                bytes,
                content_type: content_type.into(),
            },
        );

        tracing::trace!(target: TRACING_TARGET_PREVIEW, %url, size, "object url created");
        url
    }

    /// Looks up the object behind `url`, if it has not been revoked.
    pub fn resolve(&self, url: &str) -> Option<StoredObject> {
        self.objects().get(url).cloned()
    }

    /// Revokes `url`. Returns false if it was unknown or already revoked.
    pub fn revoke(&self, url: &str) -> bool {
        let revoked = self.objects().remove(url).is_some();
        if revoked {
            tracing::trace!(target: TRACING_TARGET_PREVIEW, %url, "object url revoked");
        }
        revoked
    }

    /// Returns true if `url` is currently resolvable.
    pub fn contains(&self, url: &str) -> bool {
        self.objects().contains_key(url)
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects().len()
    }

    /// Returns true if no objects are live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `url` was minted by an object URL store.
    pub fn is_object_url(url: &str) -> bool {
        url.starts_with(OBJECT_URL_PREFIX)
    }
}

/// Fetched bytes made displayable through a process-local access URL.
///
/// The handle owns exactly one registered object. [`Self::release`] revokes
/// it; further calls are no-ops. Dropping an unreleased handle releases it,
/// so every exit path of the owning scope reclaims the object.
pub struct PreviewResource {
    access_url: String,
    content_type: String,
    suggested_filename: String,
    size: usize,
    store: ObjectUrlStore,
    released: AtomicBool,
}

impl PreviewResource {
    /// Registers `bytes` in `store` and wraps the resulting URL.
    pub fn new(
        store: &ObjectUrlStore,
        bytes: Bytes,
        content_type: impl Into<String>,
        suggested_filename: impl Into<String>,
    ) -> Self {
        let content_type = content_type.into();
        let size = bytes.len();
        let access_url = store.create_object_url(bytes, content_type.clone());

        Self {
            access_url,
            content_type,
            suggested_filename: suggested_filename.into(),
            size,
            store: store.clone(),
            released: AtomicBool::new(false),
        }
    }

    /// The single-use locator, valid until [`Self::release`].
    pub fn access_url(&self) -> &str {
        &self.access_url
    }

    /// Content type reported when the bytes were fetched.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Name to use when saving the content.
    pub fn suggested_filename(&self) -> &str {
        &self.suggested_filename
    }

    /// Size of the wrapped content in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the wrapped bytes while the handle is live.
    pub fn bytes(&self) -> Option<Bytes> {
        if self.is_released() {
            return None;
        }
        self.store.resolve(&self.access_url).map(|obj| obj.bytes)
    }

    /// Returns true once the handle has been released.
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Revokes the access URL.
    ///
    /// Idempotent: returns true only for the call that actually released.
    pub fn release(&self) -> bool {
        if self.released.swap(true, Ordering::AcqRel) {
            return false;
        }

        self.store.revoke(&self.access_url);
        tracing::debug!(
            target: TRACING_TARGET_PREVIEW,
            url = %self.access_url,
            filename = %self.suggested_filename,
            "preview resource released"
        );
        true
    }
}

impl Drop for PreviewResource {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for PreviewResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewResource")
            .field("access_url", &self.access_url)
            .field("content_type", &self.content_type)
            .field("suggested_filename", &self.suggested_filename)
            .field("size", &self.size)
            .field("released", &self.is_released())
            .finish()
    }
}
