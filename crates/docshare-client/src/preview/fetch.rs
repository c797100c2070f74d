//! Secondary fetchers that read content back through an access URL.

use bytes::Bytes;
use docshare_core::preview::{CsvTable, ObjectUrlStore};
use docshare_core::{Error, Result};
use reqwest::Client;

use super::TRACING_TARGET;
use crate::error::transport;

/// Reads the bytes behind access URLs.
///
/// Process-local object URLs are resolved from the [`ObjectUrlStore`];
/// anything else is fetched over HTTP.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    http: Client,
    objects: ObjectUrlStore,
}

impl ContentFetcher {
    /// Creates a fetcher over the given HTTP client and object registry.
    pub fn new(http: Client, objects: ObjectUrlStore) -> Self {
        Self { http, objects }
    }

    /// Fetches the raw bytes behind `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::FetchError`] carrying the status on a non-success
    /// response. A revoked object URL reports status 404.
    ///
    /// [`ErrorKind::FetchError`]: docshare_core::ErrorKind::FetchError
    pub async fn fetch_bytes(&self, url: &str) -> Result<Bytes> {
        if ObjectUrlStore::is_object_url(url) {
            return self
                .objects
                .resolve(url)
                .map(|object| object.bytes)
                .ok_or_else(|| Error::fetch_error(404));
        }

        tracing::debug!(target: TRACING_TARGET, %url, "Fetching content");

        let response = self.http.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch_error(status.as_u16()));
        }

        response.bytes().await.map_err(transport)
    }

    /// Fetches `url` and decodes it as UTF-8 text.
    ///
    /// Invalid UTF-8 fails with a decode error rather than being replaced.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let bytes = self.fetch_bytes(url).await?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    /// Fetches `url` and parses it as CSV, keeping at most `max_rows` data rows.
    pub async fn fetch_csv(&self, url: &str, max_rows: usize) -> Result<CsvTable> {
        let text = self.fetch_text(url).await?;
        Ok(CsvTable::parse(&text, max_rows))
    }
}

#[cfg(test)]
mod tests {
    use docshare_core::ErrorKind;
    use docshare_core::preview::PreviewResource;

    use super::*;

    fn fetcher() -> (ContentFetcher, ObjectUrlStore) {
        let objects = ObjectUrlStore::new();
        (ContentFetcher::new(Client::new(), objects.clone()), objects)
    }

    #[tokio::test]
    async fn test_fetch_text_from_object_url() {
        let (fetcher, objects) = fetcher();
        let resource =
            PreviewResource::new(&objects, Bytes::from_static(b"hello"), "text/plain", "a.txt");

        let text = fetcher.fetch_text(resource.access_url()).await.unwrap();
        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn test_revoked_url_is_not_found() {
        let (fetcher, objects) = fetcher();
        let resource =
            PreviewResource::new(&objects, Bytes::from_static(b"x"), "text/plain", "a.txt");
        let url = resource.access_url().to_owned();
        resource.release();

        let err = fetcher.fetch_bytes(&url).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FetchError);
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_decode_error() {
        let (fetcher, objects) = fetcher();
        let resource = PreviewResource::new(
            &objects,
            Bytes::from_static(&[0xff, 0xfe, 0x00]),
            "text/plain",
            "a.txt",
        );

        let err = fetcher.fetch_text(resource.access_url()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeError);
    }

    #[tokio::test]
    async fn test_fetch_csv_truncates() {
        let (fetcher, objects) = fetcher();
        let mut csv = String::from("id,name\n");
        for i in 0..80 {
            csv.push_str(&format!("{i},row{i}\n"));
        }
        let resource = PreviewResource::new(&objects, Bytes::from(csv), "text/csv", "data.csv");

        let table = fetcher.fetch_csv(resource.access_url(), 50).await.unwrap();
        assert_eq!(table.rows.len(), 50);
        assert_eq!(table.remaining(), 30);
    }
}
