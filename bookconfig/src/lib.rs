#![allow(clippy::multiple_crate_versions)]

use bookstore::storefront::Settings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "bookstore";
pub const API_URL_ENV: &str = "BOOKSTORE_API_URL";

const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookConfig {
    /// Origin of the REST API, including the `/api` prefix.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Where the login session is kept. Defaults to `session.json` next to
    /// the config file.
    #[serde(default)]
    pub session_file: Option<PathBuf>,
    /// `tracing` filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub checkout: Settings,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            session_file: None,
            log_filter: default_log_filter(),
            checkout: Settings::default(),
        }
    }
}

fn default_api_url() -> String {
    bookstore::DEFAULT_BASE_URL.to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum BookConfigError {
    #[error("config error: {0}")]
    Confy(#[from] confy::ConfyError),
    #[error("api url is empty; set `api_url` in the bookstore config file or BOOKSTORE_API_URL")]
    MissingApiUrl,
    #[error("config file {path} has no parent directory", path = .path.display())]
    NoConfigDir { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, BookConfigError>;

impl BookConfig {
    /// Loads the config file from the standard OS location, creating it with
    /// defaults on first use.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read or deserialized.
    pub fn load() -> Result<Self> {
        Ok(confy::load(APP_NAME, None)?)
    }

    /// Loads the config from an explicit path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or deserialized.
    pub fn load_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(confy::load_path(path)?)
    }

    /// Stores the config to the standard OS location.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn store(&self) -> Result<()> {
        confy::store(APP_NAME, None, self)?;
        Ok(())
    }

    /// Path of the config file in the standard OS location.
    ///
    /// # Errors
    /// Returns an error if the OS config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf> {
        Ok(confy::get_configuration_file_path(APP_NAME, None)?)
    }

    /// The API origin, with `BOOKSTORE_API_URL` taking precedence over the
    /// file.
    ///
    /// # Errors
    /// Returns an error if the resolved URL is empty.
    pub fn api_url(&self) -> Result<String> {
        let from_env = std::env::var(API_URL_ENV).ok();
        let value = from_env
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.api_url.trim());
        if value.is_empty() {
            return Err(BookConfigError::MissingApiUrl);
        }
        Ok(value.to_string())
    }

    /// Resolves where the session file lives.
    ///
    /// # Errors
    /// Returns an error if no explicit path is configured and the config
    /// directory cannot be determined.
    pub fn session_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.session_file {
            return Ok(path.clone());
        }
        let config_path = Self::config_path()?;
        session_path_beside(&config_path)
    }
}

fn session_path_beside(config_path: &Path) -> Result<PathBuf> {
    config_path
        .parent()
        .map(|dir| dir.join(SESSION_FILE_NAME))
        .ok_or_else(|| BookConfigError::NoConfigDir {
            path: config_path.to_path_buf(),
        })
}
