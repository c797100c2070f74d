#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod config;
mod error;

pub mod api;
pub mod preview;
pub mod session;

pub use crate::api::{DashboardSummary, DownloadedFile, SharedContent, UploadDocument};
pub use crate::client::{ApiClient, TRACING_TARGET};
pub use crate::config::{ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
pub use crate::preview::{ContentFetcher, PreviewContent, PreviewView, ViewStatus};
pub use crate::session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
