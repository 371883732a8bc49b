use regex::Regex;
use serde::{Deserialize, Serialize};

use super::RuleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOrigin {
    Builtin,
    Custom,
}

/// A named masking rule: a compiled pattern plus the literal replacement
/// substituted for each match.
///
/// The pattern is compiled once at construction and immutable afterwards.
/// Invalid or empty patterns are rejected here and never reach the engine.
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: String,
    pattern: Regex,
    replacement: String,
    enabled: bool,
    origin: RuleOrigin,
}

impl PatternRule {
    pub fn custom(
        name: impl Into<String>,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self, RuleError> {
        Self::compile(name.into(), pattern, replacement.into(), RuleOrigin::Custom)
    }

    pub(crate) fn builtin(name: &str, pattern: &str, replacement: &str) -> Self {
        // Built-in patterns come from a fixed table and are verified by tests.
        Self::compile(
            name.to_string(),
            pattern,
            replacement.to_string(),
            RuleOrigin::Builtin,
        )
        .unwrap_or_else(|e| panic!("built-in rule table is broken: {e}"))
    }

    pub(crate) fn compile(
        name: String,
        pattern: &str,
        replacement: String,
        origin: RuleOrigin,
    ) -> Result<Self, RuleError> {
        if pattern.trim().is_empty() {
            return Err(RuleError::EmptyPattern);
        }

        let pattern = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
            name: name.clone(),
            source,
        })?;

        Ok(Self {
            name,
            pattern,
            replacement,
            enabled: true,
            origin,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn origin(&self) -> RuleOrigin {
        self.origin
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
