//! One handler per user-facing action. Each validates its input, makes its
//! calls through [`BookstoreClient`], and reports the result on a [`Ui`].

use crate::notify::{Modal, Notice, NoticeSettings, Presentation, Ui};
use crate::session::Session;
use crate::types::{Book, ContactMessage, Credentials, Id, NewOrder, NewPayment, NewUser};
use crate::{BookstoreClient, Error};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAYMENT_METHOD: &str = "transferencia";

const FILL_ALL_FIELDS: &str = "Please fill in all fields.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Payment method sent with every purchase.
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    /// Cancel the order when its payment is rejected. Off unless the backend
    /// exposes `DELETE /orders/:id`.
    #[serde(default)]
    pub cancel_unpaid_orders: bool,
    #[serde(default)]
    pub notices: NoticeSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            payment_method: default_payment_method(),
            cancel_unpaid_orders: false,
            notices: NoticeSettings::default(),
        }
    }
}

fn default_payment_method() -> String {
    DEFAULT_PAYMENT_METHOD.to_string()
}

/// Result of a single-call form handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Input failed validation; nothing was sent.
    Invalid,
    /// The call was made and failed.
    Failed,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// No session user; nothing was sent.
    NotLoggedIn,
    OrderFailed,
    /// The order exists but its payment was rejected. `cancelled` tells
    /// whether the compensating cancellation went through.
    PaymentFailed { order_id: Id, cancelled: bool },
    Completed { order_id: Id },
}

pub struct Storefront<U> {
    client: BookstoreClient,
    ui: U,
    settings: Settings,
}

impl<U: Ui> Storefront<U> {
    pub fn new(client: BookstoreClient, ui: U) -> Self {
        Self {
            client,
            ui,
            settings: Settings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn client(&self) -> &BookstoreClient {
        &self.client
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn report(&self, presentation: Presentation, notice: Notice) {
        self.ui.notify(presentation, notice);
    }

    fn report_failure(&self, presentation: Presentation, err: &Error, fallback: &str) {
        self.report(presentation, Notice::error(err.message().unwrap_or(fallback)));
    }

    pub async fn on_register(&self, form: &NewUser) -> Outcome {
        let presentation = self.settings.notices.register;
        let user = form.trimmed();
        if user.is_incomplete() {
            self.report(presentation, Notice::error(FILL_ALL_FIELDS));
            return Outcome::Invalid;
        }

        match self.client.register_user(&user).await {
            Ok(_) => {
                self.report(presentation, Notice::success("Account created."));
                self.ui.close(Modal::Register);
                Outcome::Done
            }
            Err(err) => {
                self.report_failure(presentation, &err, "Could not register.");
                Outcome::Failed
            }
        }
    }

    /// Logs in and stores the returned session over whatever was there.
    pub async fn on_login(&self, form: &Credentials) -> Outcome {
        let presentation = self.settings.notices.login;
        let credentials = form.trimmed();
        if credentials.is_incomplete() {
            self.report(presentation, Notice::error(FILL_ALL_FIELDS));
            return Outcome::Invalid;
        }

        let login = match self.client.login_user(&credentials).await {
            Ok(login) => login,
            Err(err) => {
                self.report_failure(presentation, &err, "Incorrect credentials.");
                return Outcome::Failed;
            }
        };

        let session = Session::new(login.user.id, login.token);
        if let Err(err) = self.client.session().replace(session) {
            tracing::error!(error = %err, "login succeeded but the session could not be saved");
            self.report(
                presentation,
                Notice::error(format!("Could not save the session: {err}")),
            );
            return Outcome::Failed;
        }

        self.report(presentation, Notice::success("Welcome!"));
        self.ui.close(Modal::Login);
        Outcome::Done
    }

    /// # Errors
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn list_books(&self) -> Result<Vec<Book>, Error> {
        self.client.get_books().await
    }

    /// # Errors
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn show_book(&self, id: &Id) -> Result<Book, Error> {
        self.client.get_book(id).await
    }

    /// Buys one copy of `book_id` at `price`: order first, then payment.
    pub async fn on_buy(&self, book_id: &Id, price: f64) -> PurchaseOutcome {
        let presentation = self.settings.notices.purchase;
        let Some(user_id) = self.client.session().user_id() else {
            self.report(presentation, Notice::error("You must log in to buy."));
            return PurchaseOutcome::NotLoggedIn;
        };

        let order = NewOrder::single(user_id, book_id.clone());
        let order_id = match self.client.create_order(&order).await {
            Ok(created) => created.order_id,
            Err(err) => {
                tracing::error!(?err, ?order, "order creation failed");
                self.report(presentation, Notice::error("Could not create the order."));
                return PurchaseOutcome::OrderFailed;
            }
        };

        let payment = NewPayment::new(order_id.clone(), &self.settings.payment_method, price);
        match self.client.register_payment(&payment).await {
            Ok(_) => {
                self.report(presentation, Notice::success("Thank you for your purchase!"));
                self.ui.close(Modal::Purchase);
                PurchaseOutcome::Completed { order_id }
            }
            Err(err) => {
                let cancelled = self.settings.cancel_unpaid_orders && self.cancel(&order_id).await;
                self.report_failure(presentation, &err, "Error processing the payment.");
                PurchaseOutcome::PaymentFailed {
                    order_id,
                    cancelled,
                }
            }
        }
    }

    async fn cancel(&self, order_id: &Id) -> bool {
        match self.client.cancel_order(order_id).await {
            Ok(_) => {
                tracing::info!(%order_id, "cancelled unpaid order");
                true
            }
            Err(err) => {
                tracing::warn!(%order_id, error = %err, "unpaid order could not be cancelled");
                false
            }
        }
    }

    /// Sends the contact form and clears it once the backend accepts it.
    pub async fn on_contact(&self, form: &mut ContactMessage) -> Outcome {
        let presentation = self.settings.notices.contact;
        let message = form.trimmed();
        if message.is_incomplete() {
            self.report(presentation, Notice::error(FILL_ALL_FIELDS));
            return Outcome::Invalid;
        }

        match self.client.send_contact(&message).await {
            Ok(_) => {
                self.report(presentation, Notice::success("Message sent."));
                form.reset();
                Outcome::Done
            }
            Err(err) => {
                self.report_failure(presentation, &err, "Error sending the message.");
                Outcome::Failed
            }
        }
    }
}
