//! Preview acquisition, scoped release and the view state machine.

mod common;

use std::time::Duration;

use docshare_client::{ApiClient, ClientConfig, PreviewContent, PreviewView, Session, ViewStatus};
use docshare_core::preview::RenderStrategy;
use docshare_core::types::DocumentRef;
use docshare_core::{Error, ErrorKind};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{request_count, setup};

fn shared(id: u64, name: &str, handle: &str) -> DocumentRef {
    DocumentRef::new(id, name)
        .with_sharing_handle(&format!("http://localhost:8080/api/documents/share/{handle}"))
}

async fn mount_share(server: &MockServer, handle: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/api/documents/share/{handle}")))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_acquire_requires_sharing_handle() {
    let (server, client) = setup().await;
    let doc = DocumentRef::new(1u64, "private.pdf");

    let err = client.acquire(&doc).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotShareable);
    assert_eq!(request_count(&server).await, 0);
    assert!(client.object_urls().is_empty());
}

#[tokio::test]
async fn test_acquire_fetches_once_without_credentials() {
    let (server, client) = setup().await;
    let doc = shared(1, "Photo", "abc");

    Mock::given(method("GET"))
        .and(path("/api/documents/share/abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .insert_header("content-disposition", "inline; filename=\"holiday.png\"")
                .set_body_bytes(b"\x89PNG".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resource = client.acquire(&doc).await.unwrap();

    assert_eq!(resource.content_type(), "image/png");
    assert_eq!(resource.suggested_filename(), "holiday.png");
    assert!(client.object_urls().contains(resource.access_url()));

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());

    assert!(resource.release());
    assert!(!resource.release());
    assert!(client.object_urls().is_empty());
}

#[tokio::test]
async fn test_filename_falls_back_to_document_name() {
    let (server, client) = setup().await;
    mount_share(
        &server,
        "h1",
        ResponseTemplate::new(200).set_body_bytes(b"data".to_vec()),
    )
    .await;

    let resource = client.acquire(&shared(1, "notes", "h1")).await.unwrap();
    assert_eq!(resource.suggested_filename(), "notes");
    assert_eq!(resource.content_type(), "application/octet-stream");
}

#[tokio::test]
async fn test_empty_text_body() {
    let (server, client) = setup().await;
    mount_share(
        &server,
        "empty",
        ResponseTemplate::new(200).insert_header("content-type", "text/csv"),
    )
    .await;

    let err = client
        .acquire(&shared(1, "data.csv", "empty"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EmptyBody);
    assert!(client.object_urls().is_empty());
}

#[tokio::test]
async fn test_failed_fetch_is_network_error() {
    let (server, client) = setup().await;
    mount_share(&server, "gone", ResponseTemplate::new(404)).await;

    let err = client
        .acquire(&shared(1, "x.txt", "gone"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NetworkError);
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_timed_out_fetch_is_network_error() {
    let server = MockServer::start().await;
    let config = ClientConfig::new(format!("{}/api", server.uri())).with_timeout(1);
    let client = ApiClient::new(config, Session::in_memory()).unwrap();
    mount_share(
        &server,
        "slow",
        ResponseTemplate::new(200)
            .set_body_string("late")
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let err = client
        .acquire(&shared(1, "slow.txt", "slow"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NetworkError);
    assert_eq!(err.message.as_deref(), Some("Request timed out"));
    assert!(client.object_urls().is_empty());
}

#[tokio::test]
async fn test_with_preview_renders_csv_and_releases() {
    let (server, client) = setup().await;
    mount_share(
        &server,
        "csv",
        ResponseTemplate::new(200)
            .insert_header("content-type", "text/plain")
            .insert_header("content-disposition", "attachment; filename=data.csv")
            .set_body_string("a,b\n\"c,d\",e\n"),
    )
    .await;

    let doc = shared(1, "Data", "csv");
    let content = client
        .with_preview(&doc, async |resource| client.render(resource, &doc).await)
        .await
        .unwrap();

    assert_eq!(content.strategy(), RenderStrategy::Csv);
    let PreviewContent::Csv { file_name, table } = content else {
        panic!("expected csv content");
    };
    assert_eq!(file_name, "data.csv");
    assert_eq!(table.headers, ["a", "b"]);
    assert_eq!(table.rows, [["c,d", "e"]]);
    assert!(client.object_urls().is_empty());
}

#[tokio::test]
async fn test_with_preview_releases_on_error() {
    let (server, client) = setup().await;
    mount_share(
        &server,
        "img",
        ResponseTemplate::new(200)
            .insert_header("content-type", "image/jpeg")
            .set_body_bytes(b"jpeg".to_vec()),
    )
    .await;

    let doc = shared(1, "pic.jpg", "img");
    let result: Result<(), Error> = client
        .with_preview(&doc, async |resource| {
            assert!(!resource.is_released());
            Err(Error::decode_error().with_message("viewer failed"))
        })
        .await;

    assert_eq!(result.unwrap_err().kind(), ErrorKind::DecodeError);
    assert!(client.object_urls().is_empty());
}

#[tokio::test]
async fn test_view_replaces_and_releases() {
    let (server, client) = setup().await;
    mount_share(
        &server,
        "one",
        ResponseTemplate::new(200).set_body_bytes(b"1".to_vec()),
    )
    .await;
    mount_share(
        &server,
        "two",
        ResponseTemplate::new(200).set_body_bytes(b"2".to_vec()),
    )
    .await;

    let view = PreviewView::new(client.clone());
    let first = shared(1, "one.bin", "one");
    let second = shared(2, "two.bin", "two");

    view.open(&first).await.unwrap();
    let first_url = view
        .with_ready(|_, resource| resource.access_url().to_owned())
        .await
        .unwrap();

    view.open(&second).await.unwrap();
    assert_eq!(view.status().await, ViewStatus::Ready(second.id.clone()));
    assert!(!client.object_urls().contains(&first_url));
    assert_eq!(client.object_urls().len(), 1);

    view.close().await;
    assert_eq!(view.status().await, ViewStatus::Idle);
    assert!(client.object_urls().is_empty());
}

#[tokio::test]
async fn test_superseded_request_is_released() {
    let (server, client) = setup().await;
    mount_share(
        &server,
        "slow",
        ResponseTemplate::new(200)
            .set_body_bytes(b"A".to_vec())
            .set_delay(Duration::from_millis(400)),
    )
    .await;
    mount_share(
        &server,
        "fast",
        ResponseTemplate::new(200).set_body_bytes(b"B".to_vec()),
    )
    .await;

    let view = PreviewView::new(client.clone());
    let a = shared(1, "a.bin", "slow");
    let b = shared(2, "b.bin", "fast");

    let (first, second) = tokio::join!(view.open(&a), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        view.open(&b).await
    });

    assert_eq!(first.unwrap_err().kind(), ErrorKind::Superseded);
    second.unwrap();

    assert_eq!(view.status().await, ViewStatus::Ready(b.id.clone()));
    assert_eq!(client.object_urls().len(), 1);

    let shown = view
        .with_ready(|document, resource| (document.id.clone(), resource.bytes()))
        .await
        .unwrap();
    assert_eq!(shown.0, b.id);
    assert_eq!(shown.1.as_deref(), Some(&b"B"[..]));
}

#[tokio::test]
async fn test_dropping_view_releases() {
    let (server, client) = setup().await;
    mount_share(
        &server,
        "one",
        ResponseTemplate::new(200).set_body_bytes(b"1".to_vec()),
    )
    .await;

    {
        let view = PreviewView::new(client.clone());
        view.open(&shared(1, "one.bin", "one")).await.unwrap();
        assert_eq!(client.object_urls().len(), 1);
    }

    assert!(client.object_urls().is_empty());
}
