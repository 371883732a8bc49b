//! # cg-core
//!
//! Core domain models and business logic for ClipGuard.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod clipboard;
pub mod event;
pub mod history;
pub mod link;
pub mod mask;
pub mod ports;
pub mod rules;
pub mod settings;
pub mod state;

// Re-export commonly used types at the crate root
pub use clipboard::{ClipboardSnapshot, ContentHash};
pub use event::GuardEvent;
pub use history::{HistoryBuffer, HistoryError, LinkCleanRecord, MaskRecord};
pub use link::{CleanOutcome, LinkCleaner};
pub use mask::{MaskOutcome, MaskingEngine};
pub use rules::{PatternRule, RuleError, RuleOrigin, RuleSet};
pub use settings::{RuleConfig, Settings};
pub use state::MonitorState;
