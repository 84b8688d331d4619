//! How handlers talk back to the person using the store.

use serde::{Deserialize, Serialize};

/// Where a notice shows up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presentation {
    /// Interrupts the user until acknowledged, like an alert box.
    Blocking,
    /// Rendered next to the form that produced it.
    Inline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            text: text.into(),
        }
    }
}

/// Dialogs a handler may dismiss once its action succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Register,
    Login,
    Purchase,
}

/// The surface handlers report to.
pub trait Ui {
    fn notify(&self, presentation: Presentation, notice: Notice);

    /// Dismisses `modal`; a no-op if it is not open.
    fn close(&self, modal: Modal);
}

/// Which presentation each call site uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeSettings {
    #[serde(default = "blocking")]
    pub register: Presentation,
    #[serde(default = "blocking")]
    pub login: Presentation,
    #[serde(default = "blocking")]
    pub purchase: Presentation,
    #[serde(default = "inline")]
    pub contact: Presentation,
}

impl Default for NoticeSettings {
    fn default() -> Self {
        Self {
            register: Presentation::Blocking,
            login: Presentation::Blocking,
            purchase: Presentation::Blocking,
            contact: Presentation::Inline,
        }
    }
}

const fn blocking() -> Presentation {
    Presentation::Blocking
}

const fn inline() -> Presentation {
    Presentation::Inline
}
