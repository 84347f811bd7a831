// SPDX-License-Identifier: MIT
//
// System clipboard sink.
//
// The arboard handle is opened on the first copy and then kept for the
// lifetime of the process. On X11 and Wayland the owning process serves
// the clipboard contents, so dropping the handle right after `set_text`
// would lose them. If opening fails, the next copy tries again.

use chroma_core::ClipboardSink;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(arboard::Error),
    #[error("copy failed: {0}")]
    Write(arboard::Error),
}

/// Reports whether the last copy reached the clipboard.
pub trait CopyStatus {
    /// The error from the most recent copy, if it failed. Cleared on read.
    fn take_error(&mut self) -> Option<ClipboardError>;
}

/// The native clipboard.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<arboard::Clipboard>,
    last_error: Option<ClipboardError>,
}

impl SystemClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `text` on the clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard cannot be opened or written.
    pub fn try_copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut handle = match self.handle.take() {
            Some(handle) => handle,
            None => {
                let handle = arboard::Clipboard::new().map_err(ClipboardError::Unavailable)?;
                debug!("clipboard opened");
                handle
            }
        };

        // A failed write drops the handle so the next copy reconnects.
        handle.set_text(text.to_owned()).map_err(ClipboardError::Write)?;
        self.handle = Some(handle);
        Ok(())
    }
}

impl ClipboardSink for SystemClipboard {
    fn copy_to_clipboard(&mut self, text: &str) {
        self.last_error = self.try_copy(text).err();
        if let Some(err) = &self.last_error {
            warn!(error = %err, "clipboard copy failed");
        }
    }
}

impl CopyStatus for SystemClipboard {
    fn take_error(&mut self) -> Option<ClipboardError> {
        self.last_error.take()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = ClipboardError::Unavailable(arboard::Error::ClipboardNotSupported);
        assert!(err.to_string().starts_with("clipboard unavailable: "));
        let err = ClipboardError::Write(arboard::Error::ContentNotAvailable);
        assert!(err.to_string().starts_with("copy failed: "));
    }

    #[test]
    fn new_has_no_error() {
        let mut clipboard = SystemClipboard::new();
        assert!(clipboard.take_error().is_none());
    }

    #[test]
    fn error_is_cleared_on_read() {
        let mut clipboard = SystemClipboard {
            handle: None,
            last_error: Some(ClipboardError::Write(arboard::Error::ContentNotAvailable)),
        };
        assert!(clipboard.take_error().is_some());
        assert!(clipboard.take_error().is_none());
    }
}
