//! Clipboard snapshot model.
mod hash;
mod snapshot;

pub use hash::ContentHash;
pub use snapshot::ClipboardSnapshot;
