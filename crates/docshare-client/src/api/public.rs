//! Unauthenticated share-link retrieval.

use bytes::Bytes;
use docshare_core::preview::{GENERIC_CONTENT_TYPE, suggested_filename};
use docshare_core::types::SharingHandle;
use docshare_core::{Error, Result};
use reqwest::Method;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderName};

use crate::api::DownloadedFile;
use crate::client::{ApiClient, TRACING_TARGET};
use crate::error::transport;

/// Raw response of `GET /documents/share/{handle}`.
#[derive(Debug, Clone)]
pub struct SharedContent {
    /// Response body.
    pub bytes: Bytes,
    /// Reported content type, or [`GENERIC_CONTENT_TYPE`].
    pub content_type: String,
    /// Raw `Content-Disposition` header, when present.
    pub disposition: Option<String>,
}

impl SharedContent {
    /// Name to save the content under.
    pub fn filename(&self, fallback: &str) -> String {
        suggested_filename(self.disposition.as_deref(), fallback)
    }
}

impl ApiClient {
    /// Fetches the bytes behind a sharing handle without credentials.
    pub async fn shared_content(&self, handle: &SharingHandle) -> Result<SharedContent> {
        tracing::debug!(target: TRACING_TARGET, %handle, "Fetching shared content");

        let request = self.public(Method::GET, &["documents", "share", handle.as_str()])?;
        let response = self.send(request).await?;

        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
        };
        let content_type = header(CONTENT_TYPE)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| GENERIC_CONTENT_TYPE.to_owned());
        let disposition = header(CONTENT_DISPOSITION);

        let bytes = response.bytes().await.map_err(transport)?;

        Ok(SharedContent {
            bytes,
            content_type,
            disposition,
        })
    }

    /// Downloads a shared document, deriving the file name from the response.
    ///
    /// `link` may be a bare handle or a full share URL.
    pub async fn shared_download(&self, link: &str) -> Result<DownloadedFile> {
        let handle = SharingHandle::from_link(link).ok_or_else(|| {
            Error::not_shareable().with_message("empty sharing link")
        })?;

        let content = self.shared_content(&handle).await?;
        let filename = content.filename(handle.as_str());

        Ok(DownloadedFile {
            bytes: content.bytes,
            filename,
            content_type: Some(content.content_type),
        })
    }
}
