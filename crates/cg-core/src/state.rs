use serde::{Deserialize, Serialize};

/// Lifecycle of the clipboard monitor. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorState {
    Running,
    Paused,
    Stopped,
}

impl MonitorState {
    pub fn is_running(&self) -> bool {
        matches!(self, MonitorState::Running)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, MonitorState::Stopped)
    }
}
