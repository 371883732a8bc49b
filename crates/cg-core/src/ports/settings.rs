use anyhow::Result;
use async_trait::async_trait;

use crate::settings::Settings;

/// Settings persistence; owned by the settings collaborator, consumed by
/// the core only at startup and shutdown.
#[async_trait]
pub trait SettingsPort: Send + Sync {
    /// Load persisted settings, falling back to defaults when nothing
    /// usable is on disk.
    async fn load(&self) -> Result<Settings>;

    async fn save(&self, settings: &Settings) -> Result<()>;
}
