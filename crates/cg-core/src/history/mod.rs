//! One-step restore buffers.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("no restorable content recorded yet")]
    Empty,
}

/// The most recent automatic masking event: what the user originally copied
/// and what the watcher wrote back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskRecord {
    pub original: String,
    pub masked: String,
    pub at: DateTime<Utc>,
}

/// The most recent link-clean action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCleanRecord {
    pub original: String,
    pub cleaned: String,
    pub at: DateTime<Utc>,
}

/// Two independent single-slot buffers. A new transform unconditionally
/// overwrites the previous entry; restore reads without clearing, so it is
/// repeatable. Written only by the watcher task.
#[derive(Debug, Default)]
pub struct HistoryBuffer {
    last_mask: Option<MaskRecord>,
    last_link_clean: Option<LinkCleanRecord>,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_mask(&mut self, original: String, masked: String) {
        self.last_mask = Some(MaskRecord {
            original,
            masked,
            at: Utc::now(),
        });
    }

    pub fn record_link_clean(&mut self, original: String, cleaned: String) {
        self.last_link_clean = Some(LinkCleanRecord {
            original,
            cleaned,
            at: Utc::now(),
        });
    }

    pub fn last_mask(&self) -> Option<&MaskRecord> {
        self.last_mask.as_ref()
    }

    pub fn last_link_clean(&self) -> Option<&LinkCleanRecord> {
        self.last_link_clean.as_ref()
    }

    /// The record a restore would use, or [`HistoryError::Empty`] when no
    /// masking has happened yet.
    pub fn restorable_mask(&self) -> Result<&MaskRecord, HistoryError> {
        self.last_mask.as_ref().ok_or(HistoryError::Empty)
    }

    pub fn has_restorable_content(&self) -> bool {
        self.last_mask.is_some()
    }

    pub fn has_restorable_link(&self) -> bool {
        self.last_link_clean.is_some()
    }
}
