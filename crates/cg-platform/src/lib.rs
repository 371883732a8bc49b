//! # cg-platform
//!
//! Platform-specific clipboard access for ClipGuard.

mod clipboard;

pub use clipboard::SystemClipboard;
