#![allow(dead_code)]

use bookstore::notify::{Level, Modal, Notice, Presentation, Ui};
use std::cell::RefCell;

/// Remembers everything handlers tell the user.
#[derive(Default)]
pub struct RecordingUi {
    pub notices: RefCell<Vec<(Presentation, Notice)>>,
    pub closed: RefCell<Vec<Modal>>,
}

impl RecordingUi {
    pub fn last(&self) -> (Presentation, Notice) {
        self.notices
            .borrow()
            .last()
            .cloned()
            .expect("at least one notice")
    }

    pub fn last_text(&self) -> String {
        self.last().1.text
    }

    pub fn last_level(&self) -> Level {
        self.last().1.level
    }

    pub fn closed(&self) -> Vec<Modal> {
        self.closed.borrow().clone()
    }
}

impl Ui for RecordingUi {
    fn notify(&self, presentation: Presentation, notice: Notice) {
        self.notices.borrow_mut().push((presentation, notice));
    }

    fn close(&self, modal: Modal) {
        self.closed.borrow_mut().push(modal);
    }
}
