//! A single preview slot with last-request-wins semantics.
//!
//! ```text
//! Idle ──open──▶ Loading ──▶ Ready ──close──▶ Idle
//!                   │          │
//!                   ▼          └──open──▶ Loading
//!                 Failed ──open──▶ Loading
//! ```
//!
//! Every transition away from `Ready` releases the held resource after it
//! has been taken out of the slot, so nothing can observe a revoked URL
//! through the view.

use std::sync::Arc;

use docshare_core::preview::PreviewResource;
use docshare_core::types::{DocumentId, DocumentRef};
use docshare_core::{Error, ErrorKind, Result};
use tokio::sync::Mutex;

use super::{PreviewContent, TRACING_TARGET};
use crate::client::ApiClient;

/// Observable state of a [`PreviewView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    /// Nothing is shown.
    Idle,
    /// A preview for the document is being fetched.
    Loading(DocumentId),
    /// A preview for the document is ready.
    Ready(DocumentId),
    /// The last attempt failed.
    Failed {
        /// Document the attempt was for.
        document_id: DocumentId,
        /// Failure category.
        kind: ErrorKind,
        /// User-facing description.
        message: String,
    },
}

enum ViewState {
    Idle,
    Loading(DocumentId),
    Ready {
        document: DocumentRef,
        resource: PreviewResource,
    },
    Failed {
        document_id: DocumentId,
        kind: ErrorKind,
        message: String,
    },
}

impl ViewState {
    fn status(&self) -> ViewStatus {
        match self {
            Self::Idle => ViewStatus::Idle,
            Self::Loading(id) => ViewStatus::Loading(id.clone()),
            Self::Ready { document, .. } => ViewStatus::Ready(document.id.clone()),
            Self::Failed {
                document_id,
                kind,
                message,
            } => ViewStatus::Failed {
                document_id: document_id.clone(),
                kind: *kind,
                message: message.clone(),
            },
        }
    }

    /// Releases the resource held by a `Ready` state.
    fn release(self) {
        if let Self::Ready { resource, .. } = self {
            resource.release();
        }
    }
}

struct ViewInner {
    generation: u64,
    state: ViewState,
}

/// Preview slot owning at most one [`PreviewResource`].
///
/// Opening a new document while another is loading supersedes the earlier
/// request: its result is released as soon as it arrives and never becomes
/// `Ready`. Clones share the same slot.
#[derive(Clone)]
pub struct PreviewView {
    client: ApiClient,
    inner: Arc<Mutex<ViewInner>>,
}

impl std::fmt::Debug for PreviewView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewView").finish_non_exhaustive()
    }
}

impl PreviewView {
    /// Creates an idle view.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            inner: Arc::new(Mutex::new(ViewInner {
                generation: 0,
                state: ViewState::Idle,
            })),
        }
    }

    /// Current state.
    pub async fn status(&self) -> ViewStatus {
        self.inner.lock().await.state.status()
    }

    /// Shows `document`, replacing whatever the view held.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Superseded`] if another `open` or a `close`
    /// happened while this request was in flight, and the acquisition error
    /// otherwise. In both cases nothing from this request is kept.
    pub async fn open(&self, document: &DocumentRef) -> Result<()> {
        let (generation, previous) = {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;
            let previous = std::mem::replace(
                &mut inner.state,
                ViewState::Loading(document.id.clone()),
            );
            (inner.generation, previous)
        };
        previous.release();

        tracing::debug!(
            target: TRACING_TARGET,
            document_id = %document.id,
            generation,
            "Preview requested"
        );

        let acquired = self.client.acquire(document).await;

        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            drop(inner);
            if let Ok(resource) = acquired {
                resource.release();
            }

            tracing::debug!(
                target: TRACING_TARGET,
                document_id = %document.id,
                generation,
                "Stale preview discarded"
            );
            return Err(Error::superseded()
                .with_message(format!("preview of '{}' was superseded", document.name)));
        }

        match acquired {
            Ok(resource) => {
                inner.state = ViewState::Ready {
                    document: document.clone(),
                    resource,
                };
                Ok(())
            }
            Err(error) => {
                inner.state = ViewState::Failed {
                    document_id: document.id.clone(),
                    kind: error.kind(),
                    message: error.message.clone().unwrap_or_else(|| error.to_string()),
                };
                Err(error)
            }
        }
    }

    /// Returns the view to `Idle`, releasing any held resource.
    ///
    /// An in-flight request is superseded.
    pub async fn close(&self) {
        let previous = {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;
            std::mem::replace(&mut inner.state, ViewState::Idle)
        };
        previous.release();
    }

    /// Runs `f` against the ready resource, if any.
    ///
    /// The slot stays locked while `f` runs, so the resource cannot be
    /// released underneath it.
    pub async fn with_ready<T>(
        &self,
        f: impl FnOnce(&DocumentRef, &PreviewResource) -> T,
    ) -> Option<T> {
        let inner = self.inner.lock().await;
        match &inner.state {
            ViewState::Ready { document, resource } => Some(f(document, resource)),
            _ => None,
        }
    }

    /// Builds the displayable content of the ready resource, if any.
    pub async fn render(&self) -> Option<Result<PreviewContent>> {
        let inner = self.inner.lock().await;
        match &inner.state {
            ViewState::Ready { document, resource } => {
                Some(self.client.render(resource, document).await)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{ClientConfig, Session};

    use super::*;

    fn view() -> PreviewView {
        let client = ApiClient::new(ClientConfig::default(), Session::in_memory()).unwrap();
        PreviewView::new(client)
    }

    #[tokio::test]
    async fn test_unshareable_document_fails() {
        let view = view();
        let doc = DocumentRef::new(1u64, "private.txt");

        let err = view.open(&doc).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotShareable);
        assert!(matches!(
            view.status().await,
            ViewStatus::Failed { kind: ErrorKind::NotShareable, .. }
        ));
    }

    #[tokio::test]
    async fn test_close_from_idle() {
        let view = view();
        view.close().await;
        assert_eq!(view.status().await, ViewStatus::Idle);
        assert!(view.render().await.is_none());
    }
}
