//! Render strategy classification.
//!
//! [`classify`] maps a content type and a file name onto the viewer that
//! should display the content. Tiers are tested in a fixed priority order and
//! each tier accepts either a content-type signal or a file extension, so a
//! `.csv` file served as `text/plain` still lands on [`RenderStrategy::Csv`].

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "svg"];
const OFFICE_EXTENSIONS: &[&str] = &["doc", "docx", "xlsx"];
const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "json", "xml", "md", "html", "css", "js", "py", "java", "cpp", "c", "h",
];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "avi", "mov"];

/// Word and Excel content types, matched as substrings.
pub const OFFICE_CONTENT_TYPES: &[&str] = &[
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// Content type used when the backend reports none.
pub const GENERIC_CONTENT_TYPE: &str = "application/octet-stream";

/// The viewer selected for a piece of content.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, EnumIter)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RenderStrategy {
    /// Inline image.
    Image,
    /// Embedded PDF viewer.
    Pdf,
    /// Decoded text.
    Text,
    /// Tabular view of comma separated values.
    Csv,
    /// Word or Excel document; offered for download only.
    Office,
    /// Audio player.
    Audio,
    /// Video player.
    Video,
    /// No viewer available.
    #[default]
    Unsupported,
}

impl RenderStrategy {
    /// Returns true if the viewer needs the decoded bytes rather than the access URL.
    #[must_use]
    pub fn requires_content(&self) -> bool {
        matches!(self, Self::Text | Self::Csv)
    }

    /// Returns true if the viewer embeds the access URL directly.
    #[must_use]
    pub fn embeds_url(&self) -> bool {
        matches!(self, Self::Image | Self::Pdf | Self::Audio | Self::Video)
    }
}

/// Lower-cased media type without parameters, e.g. `text/plain; charset=utf-8` → `text/plain`.
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Lower-cased extension of `filename`, or an empty string when it has none.
pub fn file_extension(filename: &str) -> String {
    let basename = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    match basename.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => String::new(),
    }
}

/// Selects the render strategy for the given content type and file name.
///
/// Pure and total: every input pair maps to exactly one strategy.
pub fn classify(content_type: &str, filename: &str) -> RenderStrategy {
    let mime = normalize_content_type(content_type);
    let ext = file_extension(filename);
    let ext_in = |set: &[&str]| set.contains(&ext.as_str());

    if mime.starts_with("image/") || ext_in(IMAGE_EXTENSIONS) {
        RenderStrategy::Image
    } else if mime == "application/pdf" || ext == "pdf" {
        RenderStrategy::Pdf
    } else if OFFICE_CONTENT_TYPES.iter().any(|t| mime.contains(t)) || ext_in(OFFICE_EXTENSIONS)
    {
        RenderStrategy::Office
    } else if ext == "csv" || mime.contains("csv") {
        RenderStrategy::Csv
    } else if mime.starts_with("text/")
        || mime == "application/json"
        || mime == "application/xml"
        || ext_in(TEXT_EXTENSIONS)
    {
        RenderStrategy::Text
    } else if mime.starts_with("audio/") || ext_in(AUDIO_EXTENSIONS) {
        RenderStrategy::Audio
    } else if mime.starts_with("video/") || ext_in(VIDEO_EXTENSIONS) {
        RenderStrategy::Video
    } else {
        RenderStrategy::Unsupported
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_csv_wins_over_text() {
        assert_eq!(classify("text/plain", "data.csv"), RenderStrategy::Csv);
        assert_eq!(classify("text/csv", "export"), RenderStrategy::Csv);
    }

    #[test]
    fn test_content_type_signals() {
        assert_eq!(classify("IMAGE/PNG", "x"), RenderStrategy::Image);
        assert_eq!(classify("application/pdf", ""), RenderStrategy::Pdf);
        assert_eq!(
            classify("application/json; charset=utf-8", "payload"),
            RenderStrategy::Text
        );
        assert_eq!(classify("audio/mpeg", "x"), RenderStrategy::Audio);
        assert_eq!(classify("video/mp4", "x"), RenderStrategy::Video);
        assert_eq!(
            classify(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                "x"
            ),
            RenderStrategy::Office
        );
    }

    #[test]
    fn test_extension_fallback_for_generic_type() {
        assert_eq!(classify(GENERIC_CONTENT_TYPE, "photo.JPG"), RenderStrategy::Image);
        assert_eq!(classify("", "manual.pdf"), RenderStrategy::Pdf);
        assert_eq!(classify("", "letter.docx"), RenderStrategy::Office);
        assert_eq!(classify("", "main.rs.py"), RenderStrategy::Text);
        assert_eq!(classify("", "clip.mov"), RenderStrategy::Video);
    }

    #[test]
    fn test_ogg_is_audio_first() {
        assert_eq!(classify("", "track.ogg"), RenderStrategy::Audio);
    }

    #[test]
    fn test_image_outranks_pdf() {
        assert_eq!(classify("image/png", "scan.pdf"), RenderStrategy::Image);
    }

    #[test]
    fn test_unsupported() {
        assert_eq!(classify("", "archive.zip"), RenderStrategy::Unsupported);
        assert_eq!(classify("", "Makefile"), RenderStrategy::Unsupported);
        assert_eq!(classify("", ""), RenderStrategy::Unsupported);
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("a/b/report.Final.PDF"), "pdf");
        assert_eq!(file_extension("README"), "");
        assert_eq!(file_extension("dir.d/README"), "");
    }

    #[test]
    fn test_strategy_helpers() {
        let needs_content: Vec<_> = RenderStrategy::iter()
            .filter(RenderStrategy::requires_content)
            .collect();
        assert_eq!(needs_content, vec![RenderStrategy::Text, RenderStrategy::Csv]);
        assert!(RenderStrategy::Pdf.embeds_url());
        assert!(!RenderStrategy::Office.embeds_url());
    }
}
