use super::ContentHash;

/// Ephemeral view of the system clipboard at one poll tick.
///
/// Only used to detect change and to suppress reacting to the watcher's
/// own writes; never persisted.
#[derive(Debug, Clone)]
pub struct ClipboardSnapshot {
    pub text: String,
    pub hash: ContentHash,
}

impl ClipboardSnapshot {
    pub fn new(text: String) -> Self {
        let hash = ContentHash::of_text(&text);
        Self { text, hash }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
