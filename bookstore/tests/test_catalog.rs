mod common;

use bookstore::types::Id;
use common::mock_server::BookstoreMock;
use serde_json::json;

#[tokio::test]
async fn test_get_books_valid() {
    let mock = BookstoreMock::start().await;
    mock.mount_fixture("books/list_books.json").await;

    let books = mock.client().get_books().await.unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0].id, Id::from(1));
    assert_eq!(books[0].title.as_deref(), Some("Rayuela"));
    assert_eq!(books[1].price, Some(12.0));
    assert_eq!(books[1].extra.get("stock"), Some(&json!(3)));
}

#[tokio::test]
async fn test_get_book_valid() {
    let mock = BookstoreMock::start().await;
    mock.mount_fixture("books/get_book.json").await;

    let book = mock.client().get_book(&Id::from(2)).await.unwrap();
    assert_eq!(book.author.as_deref(), Some("Juan Rulfo"));
}

#[tokio::test]
async fn test_get_book_missing() {
    let mock = BookstoreMock::start().await;
    mock.mount_fixture("books/get_book_missing.json").await;

    let err = mock.client().get_book(&Id::from(999)).await.unwrap_err();
    assert_eq!(err.message(), Some("Book not found"));
}

#[tokio::test]
async fn test_every_listing_is_a_fresh_round_trip() {
    let mock = BookstoreMock::start().await;
    mock.mount_fixture("books/list_books.json").await;

    let client = mock.client();
    client.get_books().await.unwrap();
    client.get_books().await.unwrap();
    assert_eq!(mock.request_count().await, 2);
}

#[tokio::test]
async fn test_get_book_keeps_text_id_verbatim() {
    let mock = BookstoreMock::start().await;
    mock.mount_fixture("books/get_book_text_id.json").await;

    let book = mock.client().get_book(&Id::from("007")).await.unwrap();
    assert_eq!(book.id, Id::from("007"));
    assert_eq!(book.price, Some(9.9));

    let requests = mock.requests().await;
    assert_eq!(requests[0].url.path(), "/api/books/007");
}

#[tokio::test]
async fn test_get_books_tolerates_loose_field_types() {
    let mock = BookstoreMock::start().await;
    mock.mount_fixture("books/list_books_loose_types.json").await;

    let books = mock.client().get_books().await.unwrap();
    assert_eq!(books.len(), 3);
    assert_eq!(books[0].price, Some(18.5));
    assert_eq!(books[1].id.to_string(), "-2");
    assert_eq!(books[1].price, None);
    assert_eq!(books[1].extra.get("price"), Some(&json!("a consultar")));
    assert_eq!(books[2].id.to_string(), "1.5");
    assert_eq!(books[2].author, None);
}
