//! Document records as seen by the client.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::{DocumentId, SessionIdentity};
use crate::preview::{RenderStrategy, classify};

/// Opaque token permitting unauthenticated retrieval of one document's bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SharingHandle(String);

impl SharingHandle {
    /// Creates a handle from either a bare token or a full share link.
    ///
    /// Links are reduced to their last path segment. Returns `None` when
    /// nothing usable remains.
    pub fn from_link(link: &str) -> Option<Self> {
        let token = link
            .trim()
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();

        (!token.is_empty()).then(|| Self(token.to_owned()))
    }

    /// Returns the handle as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SharingHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SharingHandle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let link = String::deserialize(deserializer)?;
        Self::from_link(&link).ok_or_else(|| serde::de::Error::custom("empty sharing handle"))
    }
}

/// A shareable document as returned by the backend.
///
/// Records are created by the backend on upload and are only changed through
/// explicit edit or share calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    /// Server-assigned identifier.
    pub id: DocumentId,

    /// Display name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,

    /// Original file name of the upload, when the backend reports it.
    #[serde(default)]
    pub file_name: Option<String>,

    /// MIME-like type reported by the backend; may be absent or unreliable.
    #[serde(default)]
    pub file_type: Option<String>,

    /// Size of the content in bytes.
    #[serde(default)]
    pub file_size: u64,

    /// Handle enabling anonymous fetch of the bytes; absent means not previewable.
    #[serde(
        default,
        rename = "shareableLink",
        alias = "sharingHandle",
        deserialize_with = "lenient_handle"
    )]
    pub sharing_handle: Option<SharingHandle>,

    /// Whether the document is visible to the whole team.
    #[serde(default)]
    pub team_shared: bool,

    /// Username of the uploader.
    #[serde(default, alias = "ownerUsername", alias = "uploadedBy")]
    pub owner: Option<String>,

    /// Upload time.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<Timestamp>,

    /// Derived by the client from the current session; never sent by the backend.
    #[serde(skip)]
    pub owned_by_current_user: bool,
}

impl DocumentRef {
    /// Creates a minimal record, mostly useful for tests and optimistic updates.
    pub fn new(id: impl Into<DocumentId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            file_name: None,
            file_type: None,
            file_size: 0,
            sharing_handle: None,
            team_shared: false,
            owner: None,
            created_at: None,
            owned_by_current_user: false,
        }
    }

    /// Sets the size in bytes.
    pub fn with_file_size(mut self, file_size: u64) -> Self {
        self.file_size = file_size;
        self
    }

    /// Sets the sharing handle from a token or share link.
    pub fn with_sharing_handle(mut self, link: &str) -> Self {
        self.sharing_handle = SharingHandle::from_link(link);
        self
    }

    /// Sets the owner username.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Returns true if a preview can be requested for this document.
    pub fn is_shareable(&self) -> bool {
        self.sharing_handle.is_some()
    }

    /// Name used when saving the content locally.
    pub fn display_file_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or(&self.name)
    }

    /// Classifies the document from its metadata alone.
    pub fn render_strategy(&self) -> RenderStrategy {
        classify(self.file_type.as_deref().unwrap_or_default(), &self.name)
    }

    /// Recomputes [`Self::owned_by_current_user`] against the given identity.
    pub fn mark_ownership(&mut self, identity: Option<&SessionIdentity>) {
        self.owned_by_current_user = match (identity, self.owner.as_deref()) {
            (Some(identity), Some(owner)) => identity.username == owner,
            _ => false,
        };
    }
}

/// Treats a null or blank link as "not shareable" instead of failing the record.
fn lenient_handle<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<SharingHandle>, D::Error> {
    let link = Option::<String>::deserialize(deserializer)?;
    Ok(link.as_deref().and_then(SharingHandle::from_link))
}

/// Accepts RFC 3339 timestamps as well as offset-less civil datetimes (read as UTC).
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Timestamp>, D::Error> {
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Ok(Some(ts));
    }

    Ok(raw
        .parse::<jiff::civil::DateTime>()
        .ok()
        .and_then(|dt| dt.to_zoned(jiff::tz::TimeZone::UTC).ok())
        .map(|zoned| zoned.timestamp()))
}

/// Metadata accompanying a multipart upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadMetadata {
    /// Display name; the file name is used when empty.
    #[validate(length(max = 255))]
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Whether the document is shared with the team.
    pub team_shared: bool,
}

/// Payload for `POST /documents/{id}/share`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    /// Target document.
    pub document_id: DocumentId,
    /// Usernames the document is shared with.
    pub shared_with_users: Vec<String>,
    /// Whether the document is shared with the team.
    pub team_shared: bool,
}

impl ShareRequest {
    /// Builds a request from a comma separated list of usernames.
    ///
    /// Entries are trimmed and blanks are dropped.
    pub fn from_user_list(document_id: DocumentId, users: &str, team_shared: bool) -> Self {
        let shared_with_users = users
            .split(',')
            .map(str::trim)
            .filter(|user| !user.is_empty())
            .map(str::to_owned)
            .collect();

        Self {
            document_id,
            shared_with_users,
            team_shared,
        }
    }
}

/// Payload for `PUT /documents/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpdate {
    /// New display name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// New description.
    pub description: String,
    /// New team visibility.
    pub team_shared: bool,
}

impl From<&DocumentRef> for DocumentUpdate {
    fn from(doc: &DocumentRef) -> Self {
        Self {
            name: doc.name.clone(),
            description: doc.description.clone().unwrap_or_default(),
            team_shared: doc.team_shared,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    #[test]
    fn test_deserialize_backend_document() {
        let json = r#"{
            "id": 42,
            "name": "Quarterly report",
            "description": null,
            "fileName": "report.pdf",
            "fileType": "application/pdf",
            "fileSize": 2048,
            "shareableLink": "http://localhost:8080/api/documents/share/abc-123",
            "teamShared": true,
            "ownerUsername": "alice",
            "createdAt": "2024-03-01T10:15:30"
        }"#;

        let doc: DocumentRef = serde_json::from_str(json).unwrap();
        assert_eq!(doc.id.as_str(), "42");
        assert_eq!(doc.sharing_handle.as_ref().unwrap().as_str(), "abc-123");
        assert_eq!(doc.owner.as_deref(), Some("alice"));
        assert!(doc.created_at.is_some());
        assert!(!doc.owned_by_current_user);
        assert_eq!(doc.render_strategy(), RenderStrategy::Pdf);
    }

    #[test]
    fn test_missing_handle_is_not_shareable() {
        let doc: DocumentRef = serde_json::from_str(r#"{"id":"x","name":"a.txt"}"#).unwrap();
        assert!(!doc.is_shareable());
        assert_eq!(doc.file_size, 0);

        let blank: DocumentRef =
            serde_json::from_str(r#"{"id":"y","name":"b.txt","shareableLink":""}"#).unwrap();
        assert!(!blank.is_shareable());
    }

    #[test]
    fn test_sharing_handle_from_link() {
        assert_eq!(SharingHandle::from_link("abc").unwrap().as_str(), "abc");
        assert_eq!(
            SharingHandle::from_link("https://host/api/documents/share/xyz/")
                .unwrap()
                .as_str(),
            "xyz"
        );
        assert!(SharingHandle::from_link("  ").is_none());
    }

    #[test]
    fn test_mark_ownership() {
        let identity = SessionIdentity::new("token", "alice", [Role::User]);
        let mut doc = DocumentRef::new("1", "notes.md").with_owner("alice");

        doc.mark_ownership(Some(&identity));
        assert!(doc.owned_by_current_user);

        doc.mark_ownership(None);
        assert!(!doc.owned_by_current_user);
    }

    #[test]
    fn test_share_request_from_user_list() {
        let request = ShareRequest::from_user_list("7".into(), " bob, ,carol ,", true);
        assert_eq!(request.shared_with_users, vec!["bob", "carol"]);
        assert!(request.team_shared);
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let doc = DocumentRef::new("1", "");
        assert!(doc.validate().is_err());
    }
}
