#![allow(dead_code)]

use bookstore::session::{MemoryStore, Session, SessionManager};
use bookstore::types::Id;
use bookstore::BookstoreClient;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const TOKEN: &str = "tok-42";

#[derive(Deserialize)]
pub struct Fixture {
    pub request: FixtureRequest,
    pub response: FixtureResponse,
}

#[derive(Deserialize)]
pub struct FixtureRequest {
    pub method: String,
    pub path: String,
}

#[derive(Deserialize)]
pub struct FixtureResponse {
    pub status_code: u16,
    pub body: serde_json::Value,
}

pub struct BookstoreMock {
    pub server: MockServer,
}

impl BookstoreMock {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
    }

    pub fn load_fixture(fixture_path: &str) -> Fixture {
        let full_path = Self::fixtures_dir().join(fixture_path);

        let content = fs::read_to_string(&full_path)
            .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", full_path.display(), e));

        serde_json::from_str(&content)
            .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", full_path.display(), e))
    }

    pub async fn mount_fixture(&self, fixture_path: &str) {
        let fixture = Self::load_fixture(fixture_path);

        Mock::given(method(fixture.request.method.as_str()))
            .and(path(fixture.request.path.as_str()))
            .respond_with(
                ResponseTemplate::new(fixture.response.status_code)
                    .set_body_json(&fixture.response.body),
            )
            .mount(&self.server)
            .await;
    }

    pub fn base_url(&self) -> String {
        format!("{}/api", self.server.uri())
    }

    /// A client with no stored session.
    pub fn client(&self) -> BookstoreClient {
        BookstoreClient::new(SessionManager::in_memory()).with_base_url(self.base_url())
    }

    /// A client already logged in as user 42.
    pub fn logged_in_client(&self) -> BookstoreClient {
        let session = Session::new(Id::from(42), TOKEN);
        BookstoreClient::new(SessionManager::new(MemoryStore::with_session(session)))
            .with_base_url(self.base_url())
    }

    pub async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    pub async fn request_count(&self) -> usize {
        self.requests().await.len()
    }
}

pub fn body_json(request: &Request) -> serde_json::Value {
    serde_json::from_slice(&request.body).expect("request body is JSON")
}

pub fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}
