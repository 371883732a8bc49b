//! Persisted configuration model.
mod model;

pub use model::{RuleConfig, Settings, CURRENT_SCHEMA_VERSION};
