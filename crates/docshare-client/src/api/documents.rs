//! Authenticated document endpoints.

use std::path::Path;

use bytes::Bytes;
use docshare_core::preview::suggested_filename;
use docshare_core::types::{DocumentId, DocumentRef, DocumentUpdate, ShareRequest, UploadMetadata};
use docshare_core::{Error, Result};
use reqwest::Method;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderName};
use reqwest::multipart::{Form, Part};
use validator::Validate;

use crate::client::{ApiClient, TRACING_TARGET};
use crate::error::transport;

/// A file to upload together with its metadata.
#[derive(Debug, Clone)]
pub struct UploadDocument {
    /// Name of the uploaded file.
    pub file_name: String,
    /// File contents.
    pub bytes: Bytes,
    /// MIME type of the file, when known.
    pub content_type: Option<String>,
    /// Display metadata.
    pub metadata: UploadMetadata,
}

impl UploadDocument {
    /// Creates an upload from in-memory bytes.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
            content_type: None,
            metadata: UploadMetadata::default(),
        }
    }

    /// Reads the file at `path`.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                Error::validation().with_message(format!("not a file: '{}'", path.display()))
            })?
            .to_owned();

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            Error::from(e).with_message(format!("failed to read '{}'", path.display()))
        })?;

        Ok(Self::new(file_name, bytes))
    }

    /// Set the display metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: UploadMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set the MIME type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Display name sent to the backend; falls back to the file name.
    pub fn display_name(&self) -> &str {
        let name = self.metadata.name.trim();
        if name.is_empty() {
            &self.file_name
        } else {
            name
        }
    }

    fn into_form(self) -> Result<Form> {
        let name = self.display_name().to_owned();
        let mut part = Part::bytes(self.bytes.to_vec()).file_name(self.file_name);
        if let Some(content_type) = &self.content_type {
            part = part.mime_str(content_type).map_err(|e| {
                Error::validation()
                    .with_message(format!("invalid content type '{content_type}'"))
                    .with_source(e)
            })?;
        }

        Ok(Form::new()
            .part("file", part)
            .text("name", name)
            .text("description", self.metadata.description)
            .text("teamShared", self.metadata.team_shared.to_string()))
    }
}

/// Bytes of a downloaded document.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    /// File contents.
    pub bytes: Bytes,
    /// Name to save the file under.
    pub filename: String,
    /// Content type reported by the backend.
    pub content_type: Option<String>,
}

impl ApiClient {
    /// Uploads a new document.
    pub async fn upload(&self, upload: UploadDocument) -> Result<DocumentRef> {
        upload.metadata.validate()?;
        if upload.file_name.trim().is_empty() {
            return Err(Error::validation().with_message("Please select a file to upload"));
        }

        tracing::debug!(
            target: TRACING_TARGET,
            file_name = %upload.file_name,
            size = upload.bytes.len(),
            "Uploading document"
        );

        let form = upload.into_form()?;
        let request = self
            .authorized(Method::POST, &["documents", "upload"])
            .await?
            .multipart(form);
        self.owned_document(request).await
    }

    /// Lists documents owned by the current user.
    pub async fn my_files(&self) -> Result<Vec<DocumentRef>> {
        let request = self
            .authorized(Method::GET, &["documents", "my-files"])
            .await?;
        self.document_list(request).await
    }

    /// Lists documents shared with the team.
    pub async fn team_files(&self) -> Result<Vec<DocumentRef>> {
        let request = self
            .authorized(Method::GET, &["documents", "team-files"])
            .await?;
        self.document_list(request).await
    }

    /// Lists the current user's files, or every document for administrators.
    pub async fn visible_files(&self) -> Result<Vec<DocumentRef>> {
        if self.session().is_admin().await {
            self.all_documents().await
        } else {
            self.my_files().await
        }
    }

    /// Lists team files through the admin endpoint for administrators.
    pub async fn visible_team_files(&self) -> Result<Vec<DocumentRef>> {
        if self.session().is_admin().await {
            self.admin_team_documents().await
        } else {
            self.team_files().await
        }
    }

    /// Fetches a single document record.
    pub async fn get_document(&self, id: &DocumentId) -> Result<DocumentRef> {
        let request = self
            .authorized(Method::GET, &["documents", id.as_str()])
            .await?;
        self.owned_document(request).await
    }

    /// Downloads the bytes of a document.
    pub async fn download(&self, document: &DocumentRef) -> Result<DownloadedFile> {
        let request = self
            .authorized(Method::GET, &["documents", document.id.as_str(), "download"])
            .await?;
        let response = self.send(request).await?;

        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
        };
        let content_type = header(CONTENT_TYPE);
        let filename = suggested_filename(
            header(CONTENT_DISPOSITION).as_deref(),
            document.display_file_name(),
        );

        let bytes = response.bytes().await.map_err(transport)?;

        tracing::debug!(
            target: TRACING_TARGET,
            document_id = %document.id,
            size = bytes.len(),
            %filename,
            "Document downloaded"
        );

        Ok(DownloadedFile {
            bytes,
            filename,
            content_type,
        })
    }

    /// Updates sharing settings of a document.
    pub async fn share(&self, id: &DocumentId, share: &ShareRequest) -> Result<DocumentRef> {
        let request = self
            .authorized(Method::POST, &["documents", id.as_str(), "share"])
            .await?
            .json(share);
        self.owned_document(request).await
    }

    /// Edits the metadata of a document.
    pub async fn update_document(
        &self,
        id: &DocumentId,
        update: &DocumentUpdate,
    ) -> Result<DocumentRef> {
        update.validate()?;

        let request = self
            .authorized(Method::PUT, &["documents", id.as_str()])
            .await?
            .json(update);
        self.owned_document(request).await
    }

    /// Deletes a document owned by the current user.
    pub async fn delete_document(&self, id: &DocumentId) -> Result<()> {
        let request = self
            .authorized(Method::DELETE, &["documents", id.as_str()])
            .await?;
        self.send_empty(request).await?;

        tracing::info!(target: TRACING_TARGET, document_id = %id, "Document deleted");
        Ok(())
    }

    /// Searches documents visible to the current user.
    pub async fn search(&self, query: &str) -> Result<Vec<DocumentRef>> {
        let request = self
            .authorized(Method::GET, &["documents", "search"])
            .await?
            .query(&[("q", query)]);
        self.document_list(request).await
    }

    /// Sends `request` and marks ownership on the returned list.
    pub(crate) async fn document_list(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<DocumentRef>> {
        let mut documents: Vec<DocumentRef> = self.send_json(request).await?;
        let identity = self.session().identity().await;
        for document in &mut documents {
            document.mark_ownership(identity.as_ref());
        }
        Ok(documents)
    }

    async fn owned_document(&self, request: reqwest::RequestBuilder) -> Result<DocumentRef> {
        let mut document: DocumentRef = self.send_json(request).await?;
        let identity = self.session().identity().await;
        document.mark_ownership(identity.as_ref());
        Ok(document)
    }
}
