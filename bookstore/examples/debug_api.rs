use bookstore::types::Book;
use reqwest::Client;
use serde_json::Value;
use std::env;

/// Attempts to parse JSON and shows error info on failure
fn try_parse<T: serde::de::DeserializeOwned>(value: Value, type_name: &str) {
    println!("\n>>> Attempting to parse as {type_name} <<<");
    match serde_json::from_value::<T>(value) {
        Ok(_) => println!("SUCCESS: Parsed {type_name} correctly"),
        Err(e) => println!("FAILED: {e}"),
    }
}

async fn fetch(client: &Client, url: &str) -> Option<Value> {
    println!("\n{}", "=".repeat(60));
    println!("GET {url}");
    println!("{}", "=".repeat(60));

    let resp = match client.get(url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            println!("Request failed: {e}");
            return None;
        }
    };
    println!("Status: {}", resp.status());
    let text = match resp.text().await {
        Ok(text) => text,
        Err(e) => {
            println!("Reading body failed: {e}");
            return None;
        }
    };
    println!("Response length: {} bytes", text.len());
    match serde_json::from_str::<Value>(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            println!("Body is not JSON: {e}");
            None
        }
    }
}

#[tokio::main]
async fn main() {
    let base_url =
        env::var("BOOKSTORE_API_URL").unwrap_or_else(|_| bookstore::DEFAULT_BASE_URL.to_string());
    let client = Client::new();

    if let Some(value) = fetch(&client, &format!("{base_url}/books")).await {
        println!("ok = {}", value["ok"]);
        if let Some(books) = value.get("books").and_then(Value::as_array) {
            println!("{} books", books.len());
            for book in books {
                try_parse::<Book>(book.clone(), "Book");
            }
        }
    }

    if let Some(book_id) = env::args().nth(1) {
        if let Some(value) = fetch(&client, &format!("{base_url}/books/{book_id}")).await {
            try_parse::<Book>(value["book"].clone(), "Book");
        }
    }
}
