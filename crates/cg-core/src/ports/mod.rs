//! Port traits decoupling the domain from infrastructure.
mod clipboard;
mod settings;

pub use clipboard::LocalClipboardPort;
pub use settings::SettingsPort;
