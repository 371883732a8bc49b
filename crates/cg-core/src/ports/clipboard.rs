//! Clipboard port - abstracts local clipboard access.

use anyhow::Result;

/// Platform-agnostic access to the single system copy buffer, text only.
///
/// Calls are synchronous and may block on the OS clipboard; the watcher
/// wraps them in a blocking task with a per-tick timeout. Transient
/// failures are expected and are surfaced as errors for the caller to
/// retry on the next tick.
pub trait LocalClipboardPort: Send + Sync {
    /// Read the current clipboard text. An empty clipboard (or one holding
    /// no text representation) reads as an empty string.
    fn read_text(&self) -> Result<String>;

    /// Replace the clipboard text.
    fn write_text(&self, text: &str) -> Result<()>;
}
