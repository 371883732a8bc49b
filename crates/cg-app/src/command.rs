use cg_core::settings::RuleConfig;

/// Commands handed to the guard service over its channel.
///
/// External surfaces never mutate watcher state directly; everything goes
/// through this hand-off so the single service task stays the only writer.
#[derive(Debug)]
pub enum GuardCommand {
    /// Stop polling; buffers stay intact.
    Pause,
    /// Resume polling from the clipboard state at resume time. Changes
    /// that happened while paused are not reprocessed.
    Resume,
    /// Write the last pre-mask original back to the clipboard.
    RestoreLast,
    /// Clean the link currently on the clipboard.
    CleanLastLink,
    /// Swap in a rule set rebuilt from the given configs.
    UpdateRules(Vec<RuleConfig>),
    /// Terminal: leave the loop and transition to `Stopped`.
    Shutdown,
}
