//! Facts emitted by the guard for external surfaces.
//!
//! Events describe what happened, never what should happen next, and they
//! carry everything a notification surface needs to render them. The guard
//! never waits on a consumer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::MonitorState;

/// Truncation length for notification previews.
const PREVIEW_LEN: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuardEvent {
    /// An external clipboard change was masked and written back.
    Masked {
        /// Names of the rules that fired, in name order.
        rules: Vec<String>,
        /// Short preview of the masked text.
        preview: String,
        at: DateTime<Utc>,
    },

    /// The last original content was restored to the clipboard.
    Restored { preview: String, at: DateTime<Utc> },

    /// The current clipboard link was cleaned and written back.
    LinkCleaned { cleaned: String, at: DateTime<Utc> },

    /// Clean-link ran but found nothing to remove.
    LinkUnchanged,

    /// Monitoring state changed (pause/resume/stop).
    MonitorStateChanged { state: MonitorState },

    /// Recoverable problem; diagnostic only, never fatal.
    Warning { message: String },
}

/// Shorten text for a notification line.
pub fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_LEN {
        return text.to_string();
    }
    let cut: String = text.chars().take(PREVIEW_LEN).collect();
    format!("{cut}...")
}
