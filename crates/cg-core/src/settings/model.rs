use serde::{Deserialize, Serialize};

use crate::rules::{RuleOrigin, RuleSet};

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// One persisted masking rule: name → pattern, replacement, enabled, origin.
///
/// This is the storage shape; the live [`RuleSet`](crate::rules::RuleSet)
/// is rebuilt from it at startup and after every settings push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub name: String,
    pub pattern: String,
    pub replacement: String,
    pub enabled: bool,
    pub origin: RuleOrigin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "current_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_monitoring_active")]
    pub monitoring_active: bool,

    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            monitoring_active: true,
            rules: RuleSet::builtin().to_configs(),
        }
    }
}

fn current_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

fn default_monitoring_active() -> bool {
    true
}
