//! System clipboard adapter backed by `clipboard-rs`.

use anyhow::{anyhow, Context, Result};
use clipboard_rs::{Clipboard, ClipboardContext, ContentFormat};

use cg_core::ports::LocalClipboardPort;

fn map_clipboard_err<T>(
    result: std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>,
) -> Result<T> {
    result.map_err(|e| anyhow!(e))
}

/// Text-only view of the single system copy buffer.
///
/// Non-text clipboard content (images, file lists) reads as an empty
/// string, which the watcher treats as "nothing to process".
pub struct SystemClipboard {
    ctx: ClipboardContext,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let ctx = ClipboardContext::new()
            .map_err(|e| anyhow!(e))
            .context("failed to open system clipboard context")?;
        Ok(Self { ctx })
    }
}

impl LocalClipboardPort for SystemClipboard {
    fn read_text(&self) -> Result<String> {
        if !self.ctx.has(ContentFormat::Text) {
            tracing::trace!("clipboard holds no text representation");
            return Ok(String::new());
        }
        map_clipboard_err(self.ctx.get_text()).context("clipboard text read failed")
    }

    fn write_text(&self, text: &str) -> Result<()> {
        map_clipboard_err(self.ctx.set_text(text.to_string()))
            .context("clipboard text write failed")
    }
}
