//! Content adapters turning a [`PreviewResource`] into displayable content.

use docshare_core::preview::{
    CsvTable, DEFAULT_MAX_ROWS, PreviewResource, RenderStrategy, classify, file_extension,
    format_file_size, normalize_content_type,
};
use docshare_core::types::DocumentRef;
use docshare_core::{Error, Result};
use serde::Serialize;
use strum::{AsRefStr, Display};

use super::ContentFetcher;
use crate::client::ApiClient;

/// Label used when a size or type is not known.
const UNKNOWN: &str = "Unknown";

/// Family of an office document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[derive(AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
pub enum OfficeKind {
    /// Word processing document.
    #[strum(serialize = "Microsoft Word Document")]
    Word,
    /// Spreadsheet.
    #[strum(serialize = "Microsoft Excel Spreadsheet")]
    Excel,
    /// Any other office format.
    #[strum(serialize = "Office Document")]
    Generic,
}

impl OfficeKind {
    /// Picks the family from the file extension, then the content type.
    pub fn detect(filename: &str, content_type: &str) -> Self {
        let content_type = normalize_content_type(content_type);
        match file_extension(filename).as_str() {
            "doc" | "docx" => Self::Word,
            "xlsx" => Self::Excel,
            _ if content_type.contains("msword") || content_type.contains("wordprocessingml") => {
                Self::Word
            }
            _ if content_type.contains("ms-excel") || content_type.contains("spreadsheetml") => {
                Self::Excel
            }
            _ => Self::Generic,
        }
    }
}

/// Summary of an office document, which is offered for download only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfficeInfo {
    /// Document family.
    pub kind: OfficeKind,
    /// File name to save under.
    pub file_name: String,
    /// Access URL for the download.
    pub url: String,
    /// Reported content type.
    pub mime: String,
    /// Human readable size.
    pub size: String,
}

/// Displayable content selected by the render strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum PreviewContent {
    /// Inline image.
    Image {
        /// Access URL.
        url: String,
        /// Alternative text.
        alt: String,
    },
    /// Embedded PDF.
    Pdf {
        /// Access URL.
        url: String,
        /// Viewer title.
        title: String,
    },
    /// Decoded text.
    Text {
        /// File name shown above the text.
        file_name: String,
        /// The decoded text.
        text: String,
    },
    /// Bounded table.
    Csv {
        /// File name shown above the table.
        file_name: String,
        /// Parsed rows.
        table: CsvTable,
    },
    /// Office document.
    Office(OfficeInfo),
    /// Audio player.
    Audio {
        /// Access URL.
        url: String,
        /// Reported content type.
        mime: String,
    },
    /// Video player.
    Video {
        /// Access URL.
        url: String,
        /// Reported content type.
        mime: String,
    },
    /// No viewer available.
    Unsupported {
        /// File name.
        name: String,
        /// Reported content type.
        mime: String,
        /// Human readable size.
        size: String,
    },
}

impl PreviewContent {
    /// Strategy that produced this content.
    pub fn strategy(&self) -> RenderStrategy {
        match self {
            Self::Image { .. } => RenderStrategy::Image,
            Self::Pdf { .. } => RenderStrategy::Pdf,
            Self::Text { .. } => RenderStrategy::Text,
            Self::Csv { .. } => RenderStrategy::Csv,
            Self::Office(_) => RenderStrategy::Office,
            Self::Audio { .. } => RenderStrategy::Audio,
            Self::Video { .. } => RenderStrategy::Video,
            Self::Unsupported { .. } => RenderStrategy::Unsupported,
        }
    }
}

/// Human readable size of the previewed content.
fn size_label(resource: &PreviewResource, document: &DocumentRef) -> String {
    if document.file_size > 0 {
        format_file_size(document.file_size)
    } else if resource.size() > 0 {
        format_file_size(resource.size() as u64)
    } else {
        UNKNOWN.to_owned()
    }
}

/// Builds the displayable content for `resource` using `strategy`.
///
/// Text and CSV are read back through `fetcher`; the other strategies only
/// reference the access URL.
pub async fn render(
    resource: &PreviewResource,
    document: &DocumentRef,
    strategy: RenderStrategy,
    fetcher: &ContentFetcher,
) -> Result<PreviewContent> {
    if resource.is_released() {
        return Err(Error::fetch_error(404).with_message("preview resource already released"));
    }

    let url = resource.access_url().to_owned();
    let file_name = resource.suggested_filename().to_owned();
    let mime = resource.content_type().to_owned();
    let title = if document.name.is_empty() {
        "Preview".to_owned()
    } else {
        document.name.clone()
    };

    let content = match strategy {
        RenderStrategy::Image => PreviewContent::Image { url, alt: title },
        RenderStrategy::Pdf => PreviewContent::Pdf { url, title },
        RenderStrategy::Text => {
            let text = fetcher.fetch_text(&url).await?;
            if text.is_empty() {
                return Err(Error::empty_body());
            }
            PreviewContent::Text { file_name, text }
        }
        RenderStrategy::Csv => {
            let table = fetcher.fetch_csv(&url, DEFAULT_MAX_ROWS).await?;
            if table.is_empty() {
                return Err(Error::empty_body());
            }
            PreviewContent::Csv { file_name, table }
        }
        RenderStrategy::Office => PreviewContent::Office(OfficeInfo {
            kind: OfficeKind::detect(&file_name, &mime),
            size: size_label(resource, document),
            file_name,
            url,
            mime,
        }),
        RenderStrategy::Audio => PreviewContent::Audio { url, mime },
        RenderStrategy::Video => PreviewContent::Video { url, mime },
        RenderStrategy::Unsupported => PreviewContent::Unsupported {
            size: size_label(resource, document),
            name: title,
            mime: if mime.is_empty() { UNKNOWN.to_owned() } else { mime },
        },
    };

    Ok(content)
}

impl ApiClient {
    /// Returns a fetcher reading through this client's object registry.
    pub fn content_fetcher(&self) -> ContentFetcher {
        ContentFetcher::new(self.http().clone(), self.object_urls().clone())
    }

    /// Classifies `resource` and builds its displayable content.
    pub async fn render(
        &self,
        resource: &PreviewResource,
        document: &DocumentRef,
    ) -> Result<PreviewContent> {
        let strategy = classify(resource.content_type(), resource.suggested_filename());
        render(resource, document, strategy, &self.content_fetcher()).await
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use docshare_core::ErrorKind;
    use docshare_core::preview::ObjectUrlStore;

    use super::*;

    fn setup() -> (ObjectUrlStore, ContentFetcher) {
        let objects = ObjectUrlStore::new();
        let fetcher = ContentFetcher::new(reqwest::Client::new(), objects.clone());
        (objects, fetcher)
    }

    #[test]
    fn test_office_kind_detection() {
        assert_eq!(OfficeKind::detect("a.docx", ""), OfficeKind::Word);
        assert_eq!(OfficeKind::detect("a.xlsx", ""), OfficeKind::Excel);
        assert_eq!(
            OfficeKind::detect("sheet", "application/vnd.ms-excel"),
            OfficeKind::Excel
        );
        assert_eq!(OfficeKind::detect("a.ppt", ""), OfficeKind::Generic);
        assert_eq!(OfficeKind::Word.to_string(), "Microsoft Word Document");
    }

    #[tokio::test]
    async fn test_render_csv() {
        let (objects, fetcher) = setup();
        let resource = PreviewResource::new(
            &objects,
            Bytes::from_static(b",x\n1,2\n"),
            "text/plain",
            "data.csv",
        );
        let doc = DocumentRef::new(1u64, "data.csv");

        let strategy = classify(resource.content_type(), resource.suggested_filename());
        let content = render(&resource, &doc, strategy, &fetcher).await.unwrap();

        let PreviewContent::Csv { table, .. } = content else {
            panic!("expected csv content");
        };
        assert_eq!(table.headers, ["Column 1", "x"]);
        assert_eq!(table.rows, [["1", "2"]]);
    }

    #[tokio::test]
    async fn test_render_image_keeps_url() {
        let (objects, fetcher) = setup();
        let resource =
            PreviewResource::new(&objects, Bytes::from_static(b"\x89PNG"), "image/png", "p.png");
        let doc = DocumentRef::new(2u64, "Photo");

        let content = render(&resource, &doc, RenderStrategy::Image, &fetcher)
            .await
            .unwrap();
        assert_eq!(
            content,
            PreviewContent::Image {
                url: resource.access_url().to_owned(),
                alt: "Photo".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_render_unsupported_size_label() {
        let (objects, fetcher) = setup();
        let resource =
            PreviewResource::new(&objects, Bytes::from_static(b"zip"), "", "archive.zip");
        let doc = DocumentRef::new(3u64, "archive.zip").with_file_size(1536);

        let content = render(&resource, &doc, RenderStrategy::Unsupported, &fetcher)
            .await
            .unwrap();
        assert_eq!(
            content,
            PreviewContent::Unsupported {
                name: "archive.zip".into(),
                mime: "Unknown".into(),
                size: "1.5 KB".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_render_released_resource() {
        let (objects, fetcher) = setup();
        let resource =
            PreviewResource::new(&objects, Bytes::from_static(b"hi"), "text/plain", "a.txt");
        resource.release();

        let doc = DocumentRef::new(4u64, "a.txt");
        let err = render(&resource, &doc, RenderStrategy::Text, &fetcher)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FetchError);
    }
}
