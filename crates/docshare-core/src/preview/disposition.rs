//! `Content-Disposition` filename extraction.

use std::sync::LazyLock;

use regex::Regex;

/// Name used when neither the response nor the document supplies one.
pub const PLACEHOLDER_FILENAME: &str = "file";

static FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)filename\s*=\s*(?:"([^"]*)"|'([^']*)'|([^;\n]*))"#)
        .expect("filename pattern is valid")
});

static FILENAME_EXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)filename\*\s*=\s*(?:[^']*)'(?:[^']*)'([^;\n]*)"#)
        .expect("extended filename pattern is valid")
});

/// Extracts the file name carried by a `Content-Disposition` header value.
///
/// The plain `filename=` parameter wins; the RFC 5987 `filename*=` form is
/// used when it is the only one present.
pub fn filename_from_disposition(disposition: &str) -> Option<String> {
    let plain = FILENAME.captures(disposition).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map(|m| m.as_str().trim().replace(['"', '\''], ""))
    });

    plain
        .filter(|name| !name.is_empty())
        .or_else(|| {
            FILENAME_EXT
                .captures(disposition)
                .and_then(|caps| caps.get(1))
                .map(|m| decode_extended(m.as_str().trim()))
                .filter(|name| !name.is_empty())
        })
}

/// Picks the suggested name: disposition, then the document name, then [`PLACEHOLDER_FILENAME`].
pub fn suggested_filename(disposition: Option<&str>, document_name: &str) -> String {
    disposition
        .and_then(filename_from_disposition)
        .or_else(|| {
            let name = document_name.trim();
            (!name.is_empty()).then(|| name.to_owned())
        })
        .unwrap_or_else(|| PLACEHOLDER_FILENAME.to_owned())
}

fn decode_extended(value: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(value.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_filename() {
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="report 2024.pdf""#).as_deref(),
            Some("report 2024.pdf")
        );
    }

    #[test]
    fn test_unquoted_filename() {
        assert_eq!(
            filename_from_disposition("inline; filename=data.csv; size=10").as_deref(),
            Some("data.csv")
        );
    }

    #[test]
    fn test_extended_filename() {
        assert_eq!(
            filename_from_disposition("attachment; filename*=UTF-8''na%C3%AFve.txt").as_deref(),
            Some("naïve.txt")
        );
    }

    #[test]
    fn test_extended_filename_malformed_escape() {
        assert_eq!(
            filename_from_disposition("attachment; filename*=UTF-8''50%25%zz.txt").as_deref(),
            Some("50%%zz.txt")
        );
    }

    #[test]
    fn test_missing_filename() {
        assert!(filename_from_disposition("inline").is_none());
        assert!(filename_from_disposition("attachment; filename=\"\"").is_none());
    }

    #[test]
    fn test_suggested_filename_fallbacks() {
        assert_eq!(
            suggested_filename(Some("attachment; filename=a.png"), "doc"),
            "a.png"
        );
        assert_eq!(suggested_filename(Some("inline"), "My Doc"), "My Doc");
        assert_eq!(suggested_filename(None, "  "), PLACEHOLDER_FILENAME);
    }
}
