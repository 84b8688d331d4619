mod common;

use bookstore::session::SessionManager;
use bookstore::types::{ContactMessage, Id, NewOrder};
use bookstore::{BookstoreClient, Error};
use common::mock_server::{body_json, header, BookstoreMock, TOKEN};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_connection_refused_is_normalized() {
    // Nothing listens on port 1.
    let client =
        BookstoreClient::new(SessionManager::in_memory()).with_base_url("http://127.0.0.1:1/api");

    let err = client.get_books().await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.message(), Some("connection failed"));
    assert_eq!(err.to_string(), "connection failed");
}

#[tokio::test]
async fn test_non_json_body_is_connection_failure() {
    let mock = BookstoreMock::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock.server)
        .await;

    let err = mock.client().get_books().await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
    assert_eq!(err.message(), Some(Error::CONNECTION_FAILED));
}

#[tokio::test]
async fn test_payload_shape_mismatch_is_connection_failure() {
    let mock = BookstoreMock::start().await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&mock.server)
        .await;

    let order = NewOrder::single(Id::from(42), Id::from(1));
    let err = mock.logged_in_client().create_order(&order).await.unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
    assert_eq!(err.message(), Some(Error::CONNECTION_FAILED));
}

#[tokio::test]
async fn test_backend_error_passes_through_regardless_of_status() {
    let mock = BookstoreMock::start().await;
    mock.mount_fixture("orders/create_order_rejected.json").await;

    let order = NewOrder::single(Id::from(42), Id::from(1));
    let err = mock.logged_in_client().create_order(&order).await.unwrap_err();
    match err {
        Error::Rejected { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message.as_deref(), Some("Out of stock"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_ok_false_with_success_status_is_rejected() {
    let mock = BookstoreMock::start().await;
    Mock::given(method("POST"))
        .and(path("/api/contact"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": false })))
        .mount(&mock.server)
        .await;

    let msg = ContactMessage::new("Ana", "ana@example.com", "Hola");
    let err = mock.client().send_contact(&msg).await.unwrap_err();
    assert!(!err.is_transport());
    assert_eq!(err.message(), None);
}

#[tokio::test]
async fn test_authenticated_call_sends_bearer_token() {
    let mock = BookstoreMock::start().await;
    mock.mount_fixture("orders/create_order_valid.json").await;

    let order = NewOrder::single(Id::from(42), Id::from(1));
    mock.logged_in_client().create_order(&order).await.unwrap();

    let requests = mock.requests().await;
    assert_eq!(requests.len(), 1);
    let expected = format!("Bearer {TOKEN}");
    assert_eq!(header(&requests[0], "authorization"), Some(expected.as_str()));
    assert_eq!(
        header(&requests[0], "content-type"),
        Some("application/json")
    );
}

#[tokio::test]
async fn test_authenticated_call_without_session_sends_no_token() {
    let mock = BookstoreMock::start().await;
    mock.mount_fixture("orders/create_order_valid.json").await;

    let order = NewOrder::single(Id::from(42), Id::from(1));
    mock.client().create_order(&order).await.unwrap();

    let requests = mock.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(header(&requests[0], "authorization"), None);
}

#[tokio::test]
async fn test_unauthenticated_call_never_sends_token() {
    let mock = BookstoreMock::start().await;
    mock.mount_fixture("contact/send_contact_valid.json").await;

    let msg = ContactMessage::new("Ana", "ana@example.com", "Hola");
    mock.logged_in_client().send_contact(&msg).await.unwrap();

    let requests = mock.requests().await;
    assert_eq!(header(&requests[0], "authorization"), None);
    assert_eq!(
        body_json(&requests[0]),
        json!({ "nombre": "Ana", "correo": "ana@example.com", "mensaje": "Hola" })
    );
}

#[tokio::test]
async fn test_get_sends_no_body() {
    let mock = BookstoreMock::start().await;
    mock.mount_fixture("books/list_books.json").await;

    mock.client().get_books().await.unwrap();

    let requests = mock.requests().await;
    assert!(requests[0].body.is_empty());
    assert_eq!(header(&requests[0], "content-type"), None);
}
