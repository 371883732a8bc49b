//! ClipGuard daemon entry point.
//!
//! Wires the guard service to the system clipboard and the settings file,
//! renders guard events as log lines (the notification surface stand-in),
//! and shuts down cleanly on Ctrl-C.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cg_app::{GuardConfig, GuardService};
use cg_core::ports::SettingsPort;
use cg_core::settings::Settings;
use cg_core::state::MonitorState;
use cg_core::{GuardEvent, RuleSet};
use cg_infra::FileSettingsRepository;
use cg_platform::SystemClipboard;

#[derive(Parser, Debug)]
#[command(name = "clipguard", version, about = "Local-only clipboard privacy guard")]
struct Args {
    /// Settings file path (defaults to the user config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Clipboard poll interval in milliseconds.
    #[arg(long, default_value_t = 250)]
    poll_interval_ms: u64,

    /// Start with monitoring paused.
    #[arg(long)]
    paused: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let path = match args.config {
        Some(path) => path,
        None => FileSettingsRepository::default_path()?,
    };
    let repo = Arc::new(FileSettingsRepository::new(path));
    let settings = repo.load().await?;

    let (rules, rejected) = RuleSet::from_configs(&settings.rules);
    for err in rejected {
        warn!("ignoring persisted rule: {err}");
    }

    let clipboard = Arc::new(SystemClipboard::new()?);
    let config = GuardConfig {
        poll_interval: Duration::from_millis(args.poll_interval_ms),
        start_paused: args.paused || !settings.monitoring_active,
        ..GuardConfig::default()
    };

    let (service, controller, events) = GuardService::new(clipboard, rules, config);
    let service_task = tokio::spawn(service.run());
    let notifier = tokio::spawn(render_events(events, Arc::clone(&repo), settings));

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    let _ = controller.shutdown().await;

    service_task.await?;
    notifier.await?;
    Ok(())
}

/// Render guard events for a human and keep the persisted monitoring flag
/// in sync with pause/resume transitions.
async fn render_events(
    mut events: mpsc::Receiver<GuardEvent>,
    repo: Arc<FileSettingsRepository>,
    mut settings: Settings,
) {
    while let Some(event) = events.recv().await {
        match event {
            GuardEvent::Masked { rules, preview, .. } => {
                info!(rules = ?rules, "masked clipboard content: {preview}");
            }
            GuardEvent::Restored { preview, .. } => {
                info!("original content restored: {preview}");
            }
            GuardEvent::LinkCleaned { cleaned, .. } => {
                info!("link cleaned: {cleaned}");
            }
            GuardEvent::LinkUnchanged => {
                info!("no tracking parameters found in the current link");
            }
            GuardEvent::MonitorStateChanged { state } => {
                info!(?state, "monitoring state changed");
                if state != MonitorState::Stopped {
                    settings.monitoring_active = state.is_running();
                    if let Err(err) = repo.save(&settings).await {
                        warn!("failed to persist monitoring flag: {err:#}");
                    }
                }
            }
            GuardEvent::Warning { message } => {
                warn!("{message}");
            }
        }
    }

    // Channel closed means the service stopped; persist the final settings.
    if let Err(err) = repo.save(&settings).await {
        warn!("failed to persist settings at shutdown: {err:#}");
    }
}
