use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Opaque identifier issued by the backend.
///
/// The API is not consistent about sending ids as numbers or strings, so both
/// are accepted and written back in the shape they arrived in. Text is never
/// reinterpreted: `"007"` stays `"007"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// =============================================================================
// USERS
// =============================================================================

/// Body of `POST /users/register`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Returns a copy with surrounding whitespace removed from every field.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self::new(self.name.trim(), self.email.trim(), self.password.trim())
    }

    /// True when any field is empty.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.name.is_empty() || self.email.is_empty() || self.password.is_empty()
    }
}

/// Body of `POST /users/login`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self::new(self.email.trim(), self.password.trim())
    }

    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.email.is_empty() || self.password.is_empty()
    }
}

/// The user object embedded in a login response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Successful login payload: the user and a bearer token for later calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Login {
    pub user: User,
    pub token: String,
}

/// Payload of a response that carries nothing beyond `ok: true`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// BOOKS
// =============================================================================

/// A book as listed by the catalogue.
///
/// Only the fields the client looks at are typed. Everything else the backend
/// sends, including typed fields whose value does not fit, is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Book {
    pub id: Id,
    pub title: Option<String>,
    pub author: Option<String>,
    /// Accepts `18.5` as well as `"18.50"`.
    pub price: Option<f64>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl TryFrom<Map<String, Value>> for Book {
    type Error = String;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = fields
            .remove("id")
            .ok_or_else(|| "book has no id".to_string())?;
        let id = serde_json::from_value(id.clone())
            .map_err(|_| format!("book id {id} is neither a number nor a string"))?;
        let title = take_string(&mut fields, "title");
        let author = take_string(&mut fields, "author");
        let price = take_price(&mut fields);
        Ok(Self {
            id,
            title,
            author,
            price,
            extra: fields.into_iter().collect(),
        })
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => {
            fields.insert(key.to_string(), other);
            None
        }
    }
}

fn take_price(fields: &mut Map<String, Value>) -> Option<f64> {
    let value = fields.remove("price")?;
    let price = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if price.is_none() && !value.is_null() {
        fields.insert("price".to_string(), value);
    }
    price
}

#[derive(Debug, Deserialize)]
pub(crate) struct BookList {
    pub books: Vec<Book>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BookDetail {
    pub book: Book,
}

// =============================================================================
// ORDERS & PAYMENTS
// =============================================================================

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub book_id: Id,
    pub quantity: u32,
}

/// Body of `POST /orders`: always exactly one line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub user_id: Id,
    pub items: Vec<OrderItem>,
}

impl NewOrder {
    /// Creates an order for a single copy of `book_id`.
    #[must_use]
    pub fn single(user_id: Id, book_id: Id) -> Self {
        Self {
            user_id,
            items: vec![OrderItem {
                book_id,
                quantity: 1,
            }],
        }
    }

    /// Sets the quantity of the order's line item.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        for item in &mut self.items {
            item.quantity = quantity;
        }
        self
    }
}

/// Successful `POST /orders` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreated {
    pub order_id: Id,
}

/// Body of `POST /payments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPayment {
    pub order_id: Id,
    pub method: String,
    pub amount: f64,
}

impl NewPayment {
    #[must_use]
    pub fn new(order_id: Id, method: impl Into<String>, amount: f64) -> Self {
        Self {
            order_id,
            method: method.into(),
            amount,
        }
    }
}

/// Successful `POST /payments` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecorded {
    #[serde(default)]
    pub payment_id: Option<Id>,
}

// =============================================================================
// CONTACT
// =============================================================================

/// The contact form, serialized with the field names the backend expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "correo")]
    pub email: String,
    #[serde(rename = "mensaje")]
    pub message: String,
}

impl ContactMessage {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self::new(self.name.trim(), self.email.trim(), self.message.trim())
    }

    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.name.is_empty() || self.email.is_empty() || self.message.is_empty()
    }

    /// Clears every field, like resetting the form after a successful send.
    pub fn reset(&mut self) {
        self.name.clear();
        self.email.clear();
        self.message.clear();
    }
}
