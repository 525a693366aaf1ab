//! Shared response sink.
//!
//! The command thread and the search thread both write responses, so the
//! writer sits behind a mutex and every line is flushed as it is written.

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

/// Cloneable handle to the protocol's output stream
#[derive(Clone)]
pub struct Output(Arc<Mutex<Box<dyn Write + Send>>>);

impl Output {
    #[must_use]
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Output(Arc::new(Mutex::new(Box::new(writer))))
    }

    #[must_use]
    pub fn stdout() -> Self {
        Output::new(io::stdout())
    }

    /// Write one response line. Multi-line text is written under a single
    /// lock so it never interleaves with the search thread.
    pub fn line(&self, text: impl Display) {
        let mut writer = self.0.lock();
        if let Err(e) = writeln!(writer, "{text}").and_then(|()| writer.flush()) {
            log::warn!("failed to write response: {e}");
        }
    }

    pub fn warning(&self, text: impl Display) {
        self.line(format_args!("WARNING: {text}"));
    }
}

/// In-memory writer whose contents stay readable after it is handed to an
/// [`Output`]
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    /// Output lines written so far
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
