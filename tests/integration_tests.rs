//! Integration tests using mock HTTP server
//!
//! Tests the full flow: credential lookup → HTTP list calls → decoded
//! documents handed out by the cursor

use partdocs::http::{HttpClient, HttpClientConfig};
use partdocs::{
    CursorItem, CursorState, DocumentsClient, FetchError, PaginatedCursor, StaticTokenProvider,
    TokenResult,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCS_PATH: &str = "/dbs/db/colls/appcenter/docs";

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Note {
    text: String,
}

fn payload(docs: &[(&str, &str)]) -> Value {
    let count = docs.len();
    let documents: Vec<Value> = docs
        .iter()
        .map(|(id, text)| {
            json!({
                "id": id,
                "PartitionKey": "readonly",
                "_etag": format!("\"etag-{id}\""),
                "_ts": 1_550_000_000,
                "document": {"text": text}
            })
        })
        .collect();
    json!({"Documents": documents, "_count": count})
}

fn client_for(server: &MockServer, tokens: StaticTokenProvider) -> DocumentsClient {
    let config = HttpClientConfig::builder().base_url(server.uri()).build();
    let http = HttpClient::with_config(config).unwrap();
    DocumentsClient::new(Arc::new(http), Arc::new(tokens))
}

fn readonly_tokens() -> StaticTokenProvider {
    StaticTokenProvider::new().with_token(
        "readonly",
        TokenResult::new("readonly", "acct", "db", "appcenter", "type=resource&sig=abc"),
    )
}

/// Mount a two page listing: A, B then C
async fn mount_two_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .and(header("x-ms-continuation", "T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload(&[("c", "third")])))
        .with_priority(1)
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(payload(&[("a", "first"), ("b", "second")]))
                .insert_header("x-ms-continuation", "T1"),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Drain a cursor on a blocking thread, the way synchronous callers use it
async fn drain_blocking<T: Send + 'static>(
    cursor: PaginatedCursor<T>,
) -> (Vec<CursorItem<T>>, PaginatedCursor<T>) {
    tokio::task::spawn_blocking(move || {
        let mut cursor = cursor;
        let mut items = Vec::new();
        while cursor.has_more() {
            items.push(cursor.next());
        }
        (items, cursor)
    })
    .await
    .unwrap()
}

fn ids<T>(items: &[CursorItem<T>]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            CursorItem::Item(doc) => doc.id().map(str::to_string),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Cursor over HTTP
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_two_pages_in_order() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let client = client_for(&server, readonly_tokens());
    let cursor = client.list::<Note>("readonly").await;
    assert_eq!(cursor.state(), CursorState::Buffered);
    assert_eq!(cursor.remaining().len(), 2);

    let (items, mut cursor) = drain_blocking(cursor).await;
    assert_eq!(ids(&items), vec!["a", "b", "c"]);
    assert_eq!(cursor.pages_fetched(), 2);

    if let CursorItem::Item(doc) = &items[2] {
        assert_eq!(doc.value(), Some(&Note { text: "third".to_string() }));
        assert_eq!(doc.partition(), Some("readonly"));
    } else {
        panic!("expected a document");
    }

    let tail = tokio::task::spawn_blocking(move || cursor.next())
        .await
        .unwrap();
    assert!(tail.is_exhausted());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_lazy_list_sends_first_request_on_first_read() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let client = client_for(&server, readonly_tokens());
    let cursor = client.list_lazy::<Note>("readonly").await;
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(cursor.has_more());

    let (items, _) = drain_blocking(cursor).await;
    assert_eq!(ids(&items), vec!["a", "b", "c"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_request_carries_partition_and_authorization() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .and(header("x-ms-documentdb-partitionkey", "[\"readonly\"]"))
        .and(header("authorization", "type=resource&sig=abc"))
        .and(header_exists("x-ms-date"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload(&[("a", "only")])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, readonly_tokens());
    let cursor = client.list::<Note>("readonly").await;
    assert_eq!(cursor.state(), CursorState::Buffered);
    assert!(!cursor.has_next_page());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failure_on_second_page_is_permanent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .and(header("x-ms-continuation", "T1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(payload(&[("a", "first"), ("b", "second")]))
                .insert_header("x-ms-continuation", "T1"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, readonly_tokens());
    let cursor = client.list::<Note>("readonly").await;

    let (items, mut cursor) = drain_blocking(cursor).await;
    assert_eq!(ids(&items), vec!["a", "b"]);
    match items.last() {
        Some(CursorItem::Failed(FetchError::Transport { status, .. })) => {
            assert_eq!(*status, Some(500));
        }
        other => panic!("expected a transport failure, got {other:?}"),
    }
    assert_eq!(cursor.state(), CursorState::Failed);

    // Repeated reads return the same failure without another request
    let again = tokio::task::spawn_blocking(move || cursor.next())
        .await
        .unwrap();
    assert!(matches!(again, CursorItem::Failed(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_resume_from_saved_token() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let client = client_for(&server, readonly_tokens());

    let mut first = client.list_lazy::<Note>("readonly").await;
    let page = first.next_page().await.unwrap();
    assert_eq!(page.len(), 2);
    let token = first.continuation_token().unwrap().to_string();
    assert_eq!(token, "T1");

    let mut resumed = client.resume::<Note>("readonly", &token).await;
    let page = resumed.next_page().await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id(), Some("c"));
    assert!(matches!(resumed.next_page().await, Err(FetchError::Exhausted)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_malformed_body_fails_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server, readonly_tokens());
    let cursor = client.list::<Note>("readonly").await;
    assert!(!cursor.has_more());
    assert!(matches!(cursor.error(), Some(FetchError::Decode { .. })));
}

#[tokio::test]
async fn test_missing_credential_gives_failed_cursor() {
    let server = MockServer::start().await;

    let client = client_for(&server, StaticTokenProvider::new());
    let cursor = client.list::<Value>("user").await;

    assert_eq!(cursor.state(), CursorState::Failed);
    assert!(!cursor.has_more());
    assert!(matches!(cursor.error(), Some(FetchError::Transport { .. })));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_into_stream_over_http() {
    use futures::StreamExt;

    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let client = client_for(&server, readonly_tokens());
    let cursor = client.list::<Note>("readonly").await;

    let texts: Vec<String> = cursor
        .into_stream()
        .map(|item| item.unwrap().value().unwrap().text.clone())
        .collect()
        .await;
    assert_eq!(texts, vec!["first", "second", "third"]);
}
