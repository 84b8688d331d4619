#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use bookconfig::BookConfig;
use bookstore::session::{FileStore, SessionManager};
use bookstore::storefront::{Outcome, PurchaseOutcome, Storefront};
use bookstore::types::{ContactMessage, Credentials, Id, NewOrder, NewPayment, NewUser};
use bookstore::BookstoreClient;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
mod terminal;

use terminal::{format_book, TerminalUi};

#[derive(Parser)]
#[command(name = "bookline", about = "A CLI for the bookstore")]
struct Cli {
    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account
    Register {
        name: String,
        email: String,
        password: String,
    },
    /// Log in and remember the session
    Login { email: String, password: String },
    /// List all books
    Books,
    /// Show one book
    Book {
        /// Book identifier
        id: String,
        /// Print the raw JSON the API returned
        #[arg(long)]
        json: bool,
    },
    /// Place an order without paying for it
    Order {
        /// Book identifier
        book_id: String,
        /// Number of copies
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Record a payment for an existing order
    Pay {
        order_id: String,
        amount: f64,
        /// Payment method; defaults to the configured one
        #[arg(long)]
        method: Option<String>,
    },
    /// Buy one copy of a book: create the order, then pay for it
    Buy {
        /// Book identifier
        book_id: String,
        /// Price to pay
        price: f64,
    },
    /// Send a message through the contact form
    Contact {
        name: String,
        email: String,
        message: String,
    },
    /// Show the stored session
    Session,
    /// Generate shell completions
    #[command(hide = true)]
    Completions {
        /// The shell to generate completions for
        shell: Shell,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<BookConfig> {
    match path {
        Some(path) => BookConfig::load_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => BookConfig::load().with_context(|| "Failed to load bookstore config"),
    }
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn get_client(config: &BookConfig) -> Result<BookstoreClient> {
    let session_path = config
        .session_path()
        .with_context(|| "Failed to locate the session file")?;
    let api_url = config.api_url()?;
    tracing::debug!(%api_url, session = %session_path.display(), "client configured");
    let session = SessionManager::new(FileStore::new(session_path));
    Ok(BookstoreClient::new(session).with_base_url(api_url))
}

fn get_storefront(config: &BookConfig) -> Result<Storefront<TerminalUi>> {
    Ok(Storefront::new(get_client(config)?, TerminalUi).with_settings(config.checkout.clone()))
}

fn require_done(outcome: Outcome) {
    if outcome != Outcome::Done {
        process::exit(1);
    }
}

fn handle_error(err: &anyhow::Error) -> ! {
    if let Some(api_err) = err.downcast_ref::<bookstore::Error>() {
        tracing::debug!(error = ?api_err, "command failed");
    }
    eprintln!("{err:#}");
    process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(err) => {
            init_tracing("info");
            handle_error(&err);
        }
    };
    init_tracing(&config.log_filter);

    if let Err(err) = run(cli.command, &config).await {
        handle_error(&err);
    }

    Ok(())
}

async fn run(command: Command, config: &BookConfig) -> Result<()> {
    match command {
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "bookline", &mut std::io::stdout());
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            let shop = get_storefront(config)?;
            require_done(shop.on_register(&NewUser::new(name, email, password)).await);
        }
        Command::Login { email, password } => {
            let shop = get_storefront(config)?;
            require_done(shop.on_login(&Credentials::new(email, password)).await);
        }
        Command::Books => {
            let shop = get_storefront(config)?;
            let books = shop.list_books().await?;
            for book in books {
                println!("{}", format_book(&book));
            }
        }
        Command::Book { id, json } => {
            let shop = get_storefront(config)?;
            let book = shop.show_book(&Id::from(id)).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&book)?);
            } else {
                println!("{}", format_book(&book));
            }
        }
        Command::Order { book_id, quantity } => {
            let client = get_client(config)?;
            let user_id = client
                .session()
                .user_id()
                .ok_or_else(|| anyhow::anyhow!("Not logged in; run `bookline login` first"))?;
            let order = NewOrder::single(user_id, Id::from(book_id)).with_quantity(quantity);
            let created = client.create_order(&order).await?;
            println!("{}", created.order_id);
        }
        Command::Pay {
            order_id,
            amount,
            method,
        } => {
            let client = get_client(config)?;
            let method = method.unwrap_or_else(|| config.checkout.payment_method.clone());
            let payment = NewPayment::new(Id::from(order_id), method, amount);
            let recorded = client.register_payment(&payment).await?;
            if let Some(payment_id) = recorded.payment_id {
                println!("{payment_id}");
            }
        }
        Command::Buy { book_id, price } => {
            let shop = get_storefront(config)?;
            match shop.on_buy(&Id::from(book_id), price).await {
                PurchaseOutcome::Completed { order_id } => {
                    tracing::info!(%order_id, "purchase completed");
                }
                PurchaseOutcome::PaymentFailed {
                    order_id,
                    cancelled,
                } => {
                    if !cancelled {
                        eprintln!("Order {order_id} was created but remains unpaid.");
                    }
                    process::exit(1);
                }
                PurchaseOutcome::NotLoggedIn | PurchaseOutcome::OrderFailed => process::exit(1),
            }
        }
        Command::Contact {
            name,
            email,
            message,
        } => {
            let shop = get_storefront(config)?;
            let mut form = ContactMessage::new(name, email, message);
            require_done(shop.on_contact(&mut form).await);
        }
        Command::Session => {
            let client = get_client(config)?;
            match client.session().current() {
                Some(session) => println!("Logged in as user {}", session.user_id),
                None => println!("Not logged in"),
            }
        }
    }

    Ok(())
}
