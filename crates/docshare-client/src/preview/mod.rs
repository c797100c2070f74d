//! Preview acquisition, rendering and the view state machine.
//!
//! - [`ApiClient::acquire`] fetches a shared document once and wraps it in a
//!   [`PreviewResource`](docshare_core::preview::PreviewResource).
//! - [`ApiClient::with_preview`] scopes a resource to a closure.
//! - [`render`] maps a resource onto [`PreviewContent`].
//! - [`PreviewView`] holds at most one resource and discards superseded requests.
//!
//! [`ApiClient::acquire`]: crate::ApiClient::acquire
//! [`ApiClient::with_preview`]: crate::ApiClient::with_preview

mod acquire;
mod fetch;
mod render;
mod view;

pub use fetch::ContentFetcher;
pub use render::{OfficeInfo, OfficeKind, PreviewContent, render};
pub use view::{PreviewView, ViewStatus};

/// Tracing target for preview operations.
pub const TRACING_TARGET: &str = "docshare_client::preview";
