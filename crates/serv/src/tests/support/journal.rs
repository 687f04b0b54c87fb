//! Shared, ordered record of lifecycle calls.

use std::sync::{Arc, Mutex};

/// Ordered trace of the hooks and service operations a run invoked.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn record(&self, entry: impl Into<String>) {
        self.entries
            .lock()
            .expect("journal mutex poisoned")
            .push(entry.into());
    }

    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().expect("journal mutex poisoned").clone()
    }

    #[must_use]
    pub fn count(&self, entry: &str) -> usize {
        self.entries
            .lock()
            .expect("journal mutex poisoned")
            .iter()
            .filter(|recorded| recorded.as_str() == entry)
            .count()
    }
}
