//! In-memory sink for formatted tracing output.

use std::io;
use std::sync::{Arc, Mutex};

/// Cloneable writer whose clones append to one shared buffer.
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CapturedOutput {
    /// Everything written so far, decoded lossily.
    #[must_use]
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().expect("capture buffer poisoned");
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .expect("capture buffer poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
