#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for preview resource operations.
pub const TRACING_TARGET_PREVIEW: &str = "docshare_core::preview";

mod error;

pub mod preview;
pub mod types;

pub use error::{BoxedError, Error, ErrorKind, Result};
