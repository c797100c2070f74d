//! Client-side preview primitives.
//!
//! # Core Types
//!
//! - [`RenderStrategy`] and [`classify`]: viewer selection from content type and file name
//! - [`PreviewResource`]: fetched bytes behind a releasable, process-local access URL
//! - [`ObjectUrlStore`]: the registry that mints and revokes access URLs
//! - [`CsvTable`]: bounded tabular view over decoded CSV text
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use docshare_core::preview::{ObjectUrlStore, PreviewResource, RenderStrategy, classify};
//!
//! let store = ObjectUrlStore::new();
//! let resource = PreviewResource::new(&store, Bytes::from_static(b"a,b"), "text/plain", "data.csv");
//!
//! assert_eq!(classify(resource.content_type(), resource.suggested_filename()), RenderStrategy::Csv);
//! assert!(resource.release());
//! assert!(!resource.release());
//! ```

mod csv;
mod disposition;
mod format;
mod resource;
mod strategy;

pub use csv::{CsvTable, DEFAULT_MAX_ROWS, parse_csv};
pub use disposition::{PLACEHOLDER_FILENAME, filename_from_disposition, suggested_filename};
pub use format::format_file_size;
pub use resource::{OBJECT_URL_PREFIX, ObjectUrlStore, PreviewResource, StoredObject};
pub use strategy::{
    GENERIC_CONTENT_TYPE, OFFICE_CONTENT_TYPES, RenderStrategy, classify, file_extension,
    normalize_content_type,
};
