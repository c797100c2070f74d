//! Backend endpoints, grouped by area.
//!
//! Every group is implemented as inherent methods on [`ApiClient`].
//!
//! [`ApiClient`]: crate::ApiClient

mod admin;
mod auth;
mod dashboard;
mod documents;
mod public;

pub use dashboard::{DashboardSummary, RECENT_LIMIT};
pub use documents::{DownloadedFile, UploadDocument};
pub use public::SharedContent;
