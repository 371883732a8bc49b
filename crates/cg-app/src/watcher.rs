//! Clipboard change detection with self-write suppression.
//!
//! The watcher reads the clipboard through [`LocalClipboardPort`], hashes
//! the content and compares it to the previously observed hash. Identical
//! consecutive contents are ignored, and a one-shot marker suppresses the
//! change caused by the guard's own write — without it, masking a text
//! would be observed as a new external change and masked again, forever.
//!
//! The marker MUST be armed *before* the corresponding clipboard write;
//! arming it afterwards races with the next poll tick.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tracing::warn;

use cg_core::clipboard::{ClipboardSnapshot, ContentHash};
use cg_core::ports::LocalClipboardPort;

pub struct ClipboardWatcher {
    clipboard: Arc<dyn LocalClipboardPort>,
    io_timeout: Duration,
    last_hash: Option<ContentHash>,
    ignore_next_hash: Option<ContentHash>,
}

impl ClipboardWatcher {
    pub fn new(clipboard: Arc<dyn LocalClipboardPort>, io_timeout: Duration) -> Self {
        Self {
            clipboard,
            io_timeout,
            last_hash: None,
            ignore_next_hash: None,
        }
    }

    /// Poll the clipboard once.
    ///
    /// Returns the new text when an *external* change is observed, `None`
    /// otherwise. Read failures and timeouts are logged and treated as
    /// "no change this tick"; the next tick retries naturally.
    pub async fn check_once(&mut self) -> Option<String> {
        let snapshot = match self.read_text().await {
            Ok(text) => ClipboardSnapshot::new(text),
            Err(err) => {
                warn!("clipboard read failed, retrying next tick: {err:#}");
                return None;
            }
        };

        if self.ignore_next_hash == Some(snapshot.hash) {
            // Our own write coming back around; absorb it silently.
            self.ignore_next_hash = None;
            self.last_hash = Some(snapshot.hash);
            return None;
        }

        if self.last_hash == Some(snapshot.hash) {
            return None;
        }
        self.last_hash = Some(snapshot.hash);

        if snapshot.is_empty() {
            // Cleared clipboard, or content with no text representation.
            return None;
        }

        Some(snapshot.text)
    }

    /// Arm the one-shot self-write marker for the given content hash.
    /// Call this *before* writing that content to the clipboard.
    pub fn mark_self_write(&mut self, hash: ContentHash) {
        self.ignore_next_hash = Some(hash);
    }

    /// Disarm a previously armed marker after a failed write, so a later
    /// external copy of the same text is not swallowed.
    pub fn clear_self_write(&mut self, hash: &ContentHash) {
        if self.ignore_next_hash.as_ref() == Some(hash) {
            self.ignore_next_hash = None;
        }
    }

    /// Re-baseline to whatever the clipboard holds right now without
    /// processing it. Used on resume: changes missed while paused are
    /// deliberately dropped.
    pub async fn sync_to_current(&mut self) {
        match self.read_text().await {
            Ok(text) => {
                self.last_hash = Some(ContentHash::of_text(&text));
                self.ignore_next_hash = None;
            }
            Err(err) => {
                warn!("clipboard re-baseline failed: {err:#}");
            }
        }
    }

    /// Read the clipboard through the port, off the async runtime and
    /// bounded by the per-tick timeout.
    pub async fn read_text(&self) -> Result<String> {
        let clipboard = Arc::clone(&self.clipboard);
        let read = tokio::task::spawn_blocking(move || clipboard.read_text());

        match tokio::time::timeout(self.io_timeout, read).await {
            Ok(joined) => joined.context("clipboard read task panicked")?,
            Err(_) => Err(anyhow!(
                "clipboard read exceeded {}ms, abandoning this tick",
                self.io_timeout.as_millis()
            )),
        }
    }

    /// Write to the clipboard with the same blocking/timeout discipline as
    /// reads. The caller is responsible for arming the self-write marker
    /// first.
    pub async fn write_text(&self, text: String) -> Result<()> {
        let clipboard = Arc::clone(&self.clipboard);
        let write = tokio::task::spawn_blocking(move || clipboard.write_text(&text));

        match tokio::time::timeout(self.io_timeout, write).await {
            Ok(joined) => joined.context("clipboard write task panicked")?,
            Err(_) => Err(anyhow!(
                "clipboard write exceeded {}ms",
                self.io_timeout.as_millis()
            )),
        }
    }
}
