//! Preview acquisition and scoped release.

use docshare_core::preview::{PreviewResource, classify, suggested_filename};
use docshare_core::types::DocumentRef;
use docshare_core::{Error, Result};

use super::TRACING_TARGET;
use crate::client::ApiClient;

impl ApiClient {
    /// Fetches the document once through its sharing handle and wraps the
    /// bytes in a [`PreviewResource`].
    ///
    /// The caller owns the returned resource and must release it. Dropping it
    /// also releases.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::NotShareable`] without a network call when the document
    ///   has no sharing handle.
    /// - [`ErrorKind::NetworkError`] when the fetch fails.
    /// - [`ErrorKind::EmptyBody`] when text or CSV content came back empty.
    ///
    /// [`ErrorKind::NotShareable`]: docshare_core::ErrorKind::NotShareable
    /// [`ErrorKind::NetworkError`]: docshare_core::ErrorKind::NetworkError
    /// [`ErrorKind::EmptyBody`]: docshare_core::ErrorKind::EmptyBody
    pub async fn acquire(&self, document: &DocumentRef) -> Result<PreviewResource> {
        let Some(handle) = &document.sharing_handle else {
            return Err(Error::not_shareable().with_message(format!(
                "document '{}' has no sharing link",
                document.name
            )));
        };

        let content = self.shared_content(handle).await?;
        let filename = suggested_filename(content.disposition.as_deref(), &document.name);

        if content.bytes.is_empty() && classify(&content.content_type, &filename).requires_content()
        {
            return Err(Error::empty_body().with_message(format!(
                "'{filename}' returned no content"
            )));
        }

        let resource =
            PreviewResource::new(self.object_urls(), content.bytes, content.content_type, filename);

        tracing::debug!(
            target: TRACING_TARGET,
            document_id = %document.id,
            url = %resource.access_url(),
            content_type = %resource.content_type(),
            size = resource.size(),
            "Preview acquired"
        );

        Ok(resource)
    }

    /// Acquires a preview, runs `f` with it and releases it on every exit path.
    ///
    /// The resource is released after `f` returns, whether it succeeded or
    /// failed. If the returned future is dropped mid-way the resource is
    /// released by its destructor.
    pub async fn with_preview<T, F>(&self, document: &DocumentRef, f: F) -> Result<T>
    where
        F: AsyncFnOnce(&PreviewResource) -> Result<T>,
    {
        let resource = self.acquire(document).await?;
        let result = f(&resource).await;
        resource.release();
        result
    }
}
