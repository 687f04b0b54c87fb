//! Logger double that keeps every report for assertions.

use std::fmt;
use std::sync::Mutex;

use crate::Logger;

/// Records reports instead of writing them anywhere.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    messages: Mutex<Vec<String>>,
}

impl RecordingLogger {
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .expect("logger mutex poisoned")
            .clone()
    }
}

impl Logger for RecordingLogger {
    fn error(&self, args: fmt::Arguments<'_>) {
        self.messages
            .lock()
            .expect("logger mutex poisoned")
            .push(args.to_string());
    }
}
