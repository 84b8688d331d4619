use bookstore::notify::{Level, Modal, Notice, Presentation, Ui};
use bookstore::types::Book;
use colored::{Color, Colorize};

/// Renders notices on the terminal. Blocking notices get a banner, inline
/// ones a single coloured line.
pub struct TerminalUi;

const fn level_color(level: Level) -> Color {
    match level {
        Level::Success => Color::Green,
        Level::Error => Color::Red,
    }
}

pub fn format_notice(presentation: Presentation, notice: &Notice) -> String {
    let color = level_color(notice.level);
    match presentation {
        Presentation::Blocking => {
            let rule = "─".repeat(notice.text.chars().count() + 4);
            format!("┌{rule}┐\n│  {}  │\n└{rule}┘", notice.text)
                .as_str()
                .color(color)
                .bold()
                .to_string()
        }
        Presentation::Inline => notice.text.as_str().color(color).to_string(),
    }
}

impl Ui for TerminalUi {
    fn notify(&self, presentation: Presentation, notice: Notice) {
        let rendered = format_notice(presentation, &notice);
        match notice.level {
            Level::Success => println!("{rendered}"),
            Level::Error => eprintln!("{rendered}"),
        }
    }

    fn close(&self, modal: Modal) {
        tracing::debug!(?modal, "dialog closed");
    }
}

pub fn format_book(book: &Book) -> String {
    let title = book.title.as_deref().unwrap_or("(untitled)");
    let author = book.author.as_deref().unwrap_or("");
    let price = book
        .price
        .map_or_else(|| "-".to_string(), |p| format!("{p:.2}"));
    format!(
        "{:>6}  {:40} {:25} {:>8}",
        book.id.to_string(),
        title,
        author,
        price
    )
}
