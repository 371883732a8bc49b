//! # cg-infra
//!
//! Infrastructure adapters for ClipGuard: settings persistence.

pub mod settings;

pub use settings::FileSettingsRepository;
