//! Nullable notifier — record notices instead of showing them.

use daovote_provider::Notifier;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct NullNotifier {
    notices: Arc<Mutex<Vec<String>>>,
}

impl NullNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices shown so far (for assertions).
    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for NullNotifier {
    fn notify(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }
}
