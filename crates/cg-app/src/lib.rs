//! # cg-app
//!
//! Application layer of ClipGuard: the clipboard watcher, the guard
//! service control loop, and the command/status surface consumed by
//! external collaborators (tray, CLI).

pub mod command;
pub mod control;
pub mod service;
pub mod watcher;

pub use command::GuardCommand;
pub use control::{ControlError, GuardController, GuardStatus};
pub use service::{GuardConfig, GuardService};
pub use watcher::ClipboardWatcher;
