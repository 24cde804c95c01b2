//! System clipboard access for copying replies

use arboard::Clipboard;

use crate::error::ReplyError;

pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<(), ReplyError>;
}

pub struct ArboardClipboard {
    clipboard: Clipboard,
}

impl ArboardClipboard {
    pub fn new() -> Result<Self, ReplyError> {
        let clipboard = Clipboard::new().map_err(|e| ReplyError::Clipboard(e.to_string()))?;
        Ok(Self { clipboard })
    }
}

impl ClipboardWriter for ArboardClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ReplyError> {
        self.clipboard
            .set_text(text)
            .map_err(|e| ReplyError::Clipboard(e.to_string()))
    }
}
