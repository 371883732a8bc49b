//! Command/status surface for external collaborators.
//!
//! The controller sends lifecycle commands through the service's channel
//! and reads status from a watch feed written only by the service task, so
//! observers always see a fully-formed snapshot.

use thiserror::Error;
use tokio::sync::{mpsc, watch};

use cg_core::settings::RuleConfig;
use cg_core::state::MonitorState;

use crate::command::GuardCommand;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("guard service is no longer running")]
    ChannelClosed,
}

/// Point-in-time view of the guard, for tray/menu display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardStatus {
    pub state: MonitorState,
    pub has_restorable_content: bool,
    pub has_restorable_link: bool,
}

impl GuardStatus {
    pub(crate) fn initial(state: MonitorState) -> Self {
        Self {
            state,
            has_restorable_content: false,
            has_restorable_link: false,
        }
    }
}

#[derive(Clone)]
pub struct GuardController {
    cmd_tx: mpsc::Sender<GuardCommand>,
    status_rx: watch::Receiver<GuardStatus>,
}

impl GuardController {
    pub(crate) fn new(
        cmd_tx: mpsc::Sender<GuardCommand>,
        status_rx: watch::Receiver<GuardStatus>,
    ) -> Self {
        Self { cmd_tx, status_rx }
    }

    pub async fn pause(&self) -> Result<(), ControlError> {
        self.send(GuardCommand::Pause).await
    }

    pub async fn resume(&self) -> Result<(), ControlError> {
        self.send(GuardCommand::Resume).await
    }

    pub async fn restore_last(&self) -> Result<(), ControlError> {
        self.send(GuardCommand::RestoreLast).await
    }

    pub async fn clean_last_link(&self) -> Result<(), ControlError> {
        self.send(GuardCommand::CleanLastLink).await
    }

    pub async fn update_rules(&self, rules: Vec<RuleConfig>) -> Result<(), ControlError> {
        self.send(GuardCommand::UpdateRules(rules)).await
    }

    pub async fn shutdown(&self) -> Result<(), ControlError> {
        self.send(GuardCommand::Shutdown).await
    }

    pub fn status(&self) -> GuardStatus {
        *self.status_rx.borrow()
    }

    pub fn state(&self) -> MonitorState {
        self.status().state
    }

    pub fn has_restorable_content(&self) -> bool {
        self.status().has_restorable_content
    }

    pub fn has_restorable_link(&self) -> bool {
        self.status().has_restorable_link
    }

    /// Wait until the service publishes a status for which `predicate`
    /// holds. Returns the matching status, or an error once the service
    /// is gone.
    pub async fn wait_for_status(
        &mut self,
        predicate: impl Fn(&GuardStatus) -> bool,
    ) -> Result<GuardStatus, ControlError> {
        loop {
            {
                let status = self.status_rx.borrow_and_update();
                if predicate(&status) {
                    return Ok(*status);
                }
            }
            self.status_rx
                .changed()
                .await
                .map_err(|_| ControlError::ChannelClosed)?;
        }
    }

    async fn send(&self, command: GuardCommand) -> Result<(), ControlError> {
        self.cmd_tx
            .send(command)
            .await
            .map_err(|_| ControlError::ChannelClosed)
    }
}
