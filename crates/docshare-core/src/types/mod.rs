//! Common data types for the docshare client.
//!
//! # Overview
//!
//! - **Identifiers**: [`EntityId`] shared by documents and user accounts
//! - **Documents**: [`DocumentRef`] plus the upload, share and edit payloads
//! - **Identity**: [`SessionIdentity`] and [`Role`]
//! - **Accounts**: login, registration and admin payloads with local validation

mod account;
mod document;
mod id;
mod identity;

pub use account::{
    Credentials, NewUser, PASSWORD_MIN_LENGTH, PASSWORD_SPECIALS, Registration, UserAccount,
    UserUpdate, validate_password_complexity,
};
pub use document::{DocumentRef, DocumentUpdate, ShareRequest, SharingHandle, UploadMetadata};
pub use id::{DocumentId, EntityId, UserId};
pub use identity::{Role, SessionIdentity};
