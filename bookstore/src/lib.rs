pub mod notify;
pub mod session;
pub mod storefront;
pub mod types;

use crate::session::SessionManager;
use crate::types::{
    Ack, Book, BookDetail, BookList, ContactMessage, Credentials, Id, Login, NewOrder,
    NewPayment, NewUser, OrderCreated, PaymentRecorded,
};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:4000/api";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never produced a usable response: the network call failed
    /// or the body was not the JSON we expected.
    #[error("{}", Error::CONNECTION_FAILED)]
    Http(#[from] reqwest::Error),
    #[error("{}", Error::CONNECTION_FAILED)]
    Decode(#[from] serde_json::Error),
    /// The backend answered with `ok: false`.
    #[error("{}", .message.as_deref().unwrap_or("request rejected"))]
    Rejected { status: u16, message: Option<String> },
}

impl Error {
    pub const CONNECTION_FAILED: &'static str = "connection failed";

    /// Text suitable for showing to the user, if the failure carries any.
    ///
    /// Transport failures always read "connection failed"; rejections carry
    /// whatever the backend put in `error`.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Http(_) | Self::Decode(_) => Some(Self::CONNECTION_FAILED),
            Self::Rejected { message, .. } => message.as_deref(),
        }
    }

    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Decode(_))
    }
}

/// Every backend response: an `ok` flag, an optional `error`, and the payload
/// fields alongside them.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    payload: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct BookstoreClient {
    client: Client,
    base_url: String,
    session: SessionManager,
}

impl BookstoreClient {
    /// Sends one request and normalizes the outcome.
    ///
    /// With `auth` set, the session token (if any) goes out as a bearer
    /// credential. The status code is not inspected: the body decides.
    async fn request<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        auth: bool,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let result = self.send(method.clone(), endpoint, body, auth).await;
        if let Err(err) = &result {
            if err.is_transport() {
                tracing::error!(%method, endpoint, error = ?err, "request to bookstore API failed");
            } else {
                tracing::debug!(%method, endpoint, error = %err, "bookstore API rejected request");
            }
        }
        result
    }

    async fn send<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        auth: bool,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = self
            .client
            .request(method, format!("{}{}", self.base_url, endpoint));

        if auth {
            if let Some(token) = self.session.token() {
                request = request.bearer_auth(token);
            }
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let envelope: Envelope = response.json().await?;

        if !envelope.ok {
            return Err(Error::Rejected {
                status,
                message: envelope.error,
            });
        }
        serde_json::from_value(serde_json::Value::Object(envelope.payload)).map_err(Error::from)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, Error> {
        self.request::<T, ()>(Method::GET, endpoint, None, false).await
    }

    async fn post<T, B>(&self, endpoint: &str, body: &B, auth: bool) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, endpoint, Some(body), auth).await
    }

    /// Creates a client that reads its bearer token from `session`.
    #[must_use]
    pub fn new(session: SessionManager) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            session,
        }
    }

    /// Points the client at another API origin, e.g. `https://shop.example/api`.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Uses a preconfigured `reqwest` client (proxies, timeouts, ...).
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Creates an account.
    ///
    /// # Errors
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn register_user(&self, user: &NewUser) -> Result<Ack, Error> {
        self.post("/users/register", user, false).await
    }

    /// Exchanges credentials for a user id and token.
    /// The session is left untouched; storing it is up to the caller.
    ///
    /// # Errors
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn login_user(&self, credentials: &Credentials) -> Result<Login, Error> {
        self.post("/users/login", credentials, false).await
    }

    /// Retrieves the whole catalogue.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn get_books(&self) -> Result<Vec<Book>, Error> {
        let list: BookList = self.get("/books").await?;
        Ok(list.books)
    }

    /// Retrieves a single book.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn get_book(&self, id: &Id) -> Result<Book, Error> {
        let detail: BookDetail = self.get(&format!("/books/{id}")).await?;
        Ok(detail.book)
    }

    /// Places an order on behalf of the session user.
    ///
    /// # Errors
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn create_order(&self, order: &NewOrder) -> Result<OrderCreated, Error> {
        self.post("/orders", order, true).await
    }

    /// Records a payment against an existing order.
    ///
    /// # Errors
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn register_payment(&self, payment: &NewPayment) -> Result<PaymentRecorded, Error> {
        self.post("/payments", payment, true).await
    }

    /// Cancels an order that could not be paid.
    ///
    /// # Errors
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn cancel_order(&self, order_id: &Id) -> Result<Ack, Error> {
        let endpoint = format!("/orders/{order_id}");
        self.request::<Ack, ()>(Method::DELETE, &endpoint, None, true).await
    }

    /// Submits the contact form.
    ///
    /// # Errors
    /// Returns an error if the request fails or the backend rejects it.
    pub async fn send_contact(&self, message: &ContactMessage) -> Result<Ack, Error> {
        self.post("/contact", message, false).await
    }
}
