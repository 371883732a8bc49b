//! The guard service: a single task owning all clipboard I/O.
//!
//! One `tokio::select!` loop multiplexes the poll ticker and the command
//! channel. Because the task is the sole reader and writer of the
//! clipboard, of the history buffer, and of the live rule set, the
//! self-write guard is race-free and rule-set swaps are atomic from the
//! watcher's point of view — there is no moment where a half-mutated set
//! is observable.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use cg_core::clipboard::ContentHash;
use cg_core::event::{preview, GuardEvent};
use cg_core::ports::LocalClipboardPort;
use cg_core::settings::RuleConfig;
use cg_core::state::MonitorState;
use cg_core::{HistoryBuffer, LinkCleaner, MaskingEngine, RuleSet};

use crate::command::GuardCommand;
use crate::control::{GuardController, GuardStatus};
use crate::watcher::ClipboardWatcher;

const COMMAND_CHANNEL_CAPACITY: usize = 32;
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Poll cadence for clipboard change detection.
    pub poll_interval: Duration,
    /// Upper bound for one clipboard read or write; a call that hangs past
    /// it is abandoned for the tick instead of stalling the loop.
    pub io_timeout: Duration,
    /// Start in `Paused` instead of `Running`.
    pub start_paused: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
            io_timeout: Duration::from_millis(1000),
            start_paused: false,
        }
    }
}

pub struct GuardService {
    watcher: ClipboardWatcher,
    engine: MaskingEngine,
    cleaner: LinkCleaner,
    history: HistoryBuffer,
    rules: Arc<RuleSet>,
    state: MonitorState,
    poll_interval: Duration,
    cmd_rx: mpsc::Receiver<GuardCommand>,
    event_tx: mpsc::Sender<GuardEvent>,
    status_tx: watch::Sender<GuardStatus>,
}

impl GuardService {
    /// Build the service plus its external handles: the controller for
    /// commands/status and the event feed for the notification surface.
    pub fn new(
        clipboard: Arc<dyn LocalClipboardPort>,
        rules: RuleSet,
        config: GuardConfig,
    ) -> (Self, GuardController, mpsc::Receiver<GuardEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let state = if config.start_paused {
            MonitorState::Paused
        } else {
            MonitorState::Running
        };
        let (status_tx, status_rx) = watch::channel(GuardStatus::initial(state));

        let service = Self {
            watcher: ClipboardWatcher::new(clipboard, config.io_timeout),
            engine: MaskingEngine::new(),
            cleaner: LinkCleaner::new(),
            history: HistoryBuffer::new(),
            rules: Arc::new(rules),
            state,
            poll_interval: config.poll_interval,
            cmd_rx,
            event_tx,
            status_tx,
        };
        let controller = GuardController::new(cmd_tx, status_rx);

        (service, controller, event_rx)
    }

    /// Run until `Shutdown` (or until every controller is dropped).
    pub async fn run(mut self) {
        info!(state = ?self.state, "clipboard guard started");

        if self.state.is_running() {
            // Do not reprocess whatever was copied before we started.
            self.watcher.sync_to_current().await;
        }

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                command = self.cmd_rx.recv() => {
                    match command {
                        Some(command) => {
                            if self.handle_command(command).await {
                                break;
                            }
                        }
                        // All controllers dropped; nothing can reach us.
                        None => break,
                    }
                }
                _ = ticker.tick(), if self.state.is_running() => {
                    self.poll_once().await;
                }
            }
        }

        self.state = MonitorState::Stopped;
        self.publish_status();
        self.emit(GuardEvent::MonitorStateChanged {
            state: MonitorState::Stopped,
        });
        info!("clipboard guard stopped");
    }

    /// One poll tick: detect an external change, mask it, write back.
    async fn poll_once(&mut self) {
        let Some(text) = self.watcher.check_once().await else {
            return;
        };

        let outcome = self.engine.mask(&text, &self.rules);
        if !outcome.changed {
            // Nothing sensitive (or an intentionally copied single token);
            // the watcher already re-baselined.
            return;
        }

        let masked_hash = ContentHash::of_text(&outcome.masked);
        self.watcher.mark_self_write(masked_hash);

        if let Err(err) = self.watcher.write_text(outcome.masked.clone()).await {
            self.watcher.clear_self_write(&masked_hash);
            warn!("failed to write masked text: {err:#}");
            self.emit(GuardEvent::Warning {
                message: format!("clipboard write failed: {err}"),
            });
            return;
        }

        self.history.record_mask(text, outcome.masked.clone());
        self.publish_status();

        let rules: Vec<String> = outcome.matched.into_iter().collect();
        debug!(?rules, "clipboard content masked");
        self.emit(GuardEvent::Masked {
            rules,
            preview: preview(&outcome.masked),
            at: Utc::now(),
        });
    }

    /// Returns `true` when the loop should exit.
    async fn handle_command(&mut self, command: GuardCommand) -> bool {
        match command {
            GuardCommand::Pause => self.pause(),
            GuardCommand::Resume => self.resume().await,
            GuardCommand::RestoreLast => self.restore_last().await,
            GuardCommand::CleanLastLink => self.clean_last_link().await,
            GuardCommand::UpdateRules(configs) => self.update_rules(&configs),
            GuardCommand::Shutdown => return true,
        }
        false
    }

    fn pause(&mut self) {
        if !self.state.is_running() {
            return;
        }
        self.state = MonitorState::Paused;
        self.publish_status();
        self.emit(GuardEvent::MonitorStateChanged {
            state: MonitorState::Paused,
        });
        info!("monitoring paused");
    }

    async fn resume(&mut self) {
        if self.state != MonitorState::Paused {
            return;
        }
        // Only the clipboard state at resume time counts; external changes
        // made while paused are dropped, not replayed.
        self.watcher.sync_to_current().await;
        self.state = MonitorState::Running;
        self.publish_status();
        self.emit(GuardEvent::MonitorStateChanged {
            state: MonitorState::Running,
        });
        info!("monitoring resumed");
    }

    async fn restore_last(&mut self) {
        let original = match self.history.restorable_mask() {
            Ok(record) => record.original.clone(),
            Err(err) => {
                self.emit(GuardEvent::Warning {
                    message: err.to_string(),
                });
                return;
            }
        };

        let hash = ContentHash::of_text(&original);
        self.watcher.mark_self_write(hash);

        if let Err(err) = self.watcher.write_text(original.clone()).await {
            self.watcher.clear_self_write(&hash);
            warn!("restore failed: {err:#}");
            self.emit(GuardEvent::Warning {
                message: format!("restore failed: {err}"),
            });
            return;
        }

        // The slot is kept, so restore stays repeatable.
        info!("restored last original content");
        self.emit(GuardEvent::Restored {
            preview: preview(&original),
            at: Utc::now(),
        });
    }

    async fn clean_last_link(&mut self) {
        // Operates on whatever is on the clipboard right now, not on the
        // mask history; see the design notes.
        let text = match self.watcher.read_text().await {
            Ok(text) => text,
            Err(err) => {
                warn!("clean-link read failed: {err:#}");
                self.emit(GuardEvent::Warning {
                    message: format!("clipboard read failed: {err}"),
                });
                return;
            }
        };

        if text.trim().is_empty() {
            self.emit(GuardEvent::Warning {
                message: "clipboard is empty".to_string(),
            });
            return;
        }

        let outcome = self.cleaner.clean(&text);
        if !outcome.changed {
            self.emit(GuardEvent::LinkUnchanged);
            return;
        }

        let hash = ContentHash::of_text(&outcome.cleaned);
        self.watcher.mark_self_write(hash);

        if let Err(err) = self.watcher.write_text(outcome.cleaned.clone()).await {
            self.watcher.clear_self_write(&hash);
            warn!("clean-link write failed: {err:#}");
            self.emit(GuardEvent::Warning {
                message: format!("clipboard write failed: {err}"),
            });
            return;
        }

        self.history.record_link_clean(text, outcome.cleaned.clone());
        self.publish_status();

        info!("cleaned link on clipboard");
        self.emit(GuardEvent::LinkCleaned {
            cleaned: outcome.cleaned,
            at: Utc::now(),
        });
    }

    fn update_rules(&mut self, configs: &[RuleConfig]) {
        let (rules, rejected) = RuleSet::from_configs(configs);
        for err in rejected {
            warn!("rule rejected during update: {err}");
            self.emit(GuardEvent::Warning {
                message: format!("rule rejected: {err}"),
            });
        }
        // Whole-set swap: the next tick sees either the old set or the new
        // one, never something in between.
        self.rules = Arc::new(rules);
        debug!(rules = self.rules.len(), "rule set updated");
    }

    fn publish_status(&self) {
        let status = GuardStatus {
            state: self.state,
            has_restorable_content: self.history.has_restorable_content(),
            has_restorable_link: self.history.has_restorable_link(),
        };
        // Receivers may all be gone during shutdown; that is fine.
        let _ = self.status_tx.send(status);
    }

    /// One-way notification feed: never blocks the loop, drops when the
    /// consumer cannot keep up.
    fn emit(&self, event: GuardEvent) {
        if let Err(err) = self.event_tx.try_send(event) {
            debug!("event dropped: {err}");
        }
    }
}
