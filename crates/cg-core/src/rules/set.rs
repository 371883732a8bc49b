use crate::settings::RuleConfig;

use super::builtin::builtin_rules;
use super::rule::{PatternRule, RuleOrigin};
use super::RuleError;

/// An ordered, mutable collection of masking rules.
///
/// Insertion order is evaluation order: built-ins first in their fixed
/// order, then custom rules in creation order. Order is stable across
/// mutation; new custom rules are appended at the end and enable/disable
/// happens in place.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<PatternRule>,
}

impl RuleSet {
    /// Rule set containing only the built-in rules.
    pub fn builtin() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    /// Rebuild a rule set from persisted configs.
    ///
    /// Built-ins keep their fixed table order and patterns; the configs only
    /// contribute their enabled flags. Custom configs are appended in the
    /// order given. Customs that fail to compile are skipped and reported
    /// back so startup never fails on one bad pattern.
    pub fn from_configs(configs: &[RuleConfig]) -> (Self, Vec<RuleError>) {
        let mut set = Self::builtin();
        let mut rejected = Vec::new();

        for config in configs {
            match config.origin {
                RuleOrigin::Builtin => {
                    // Unknown built-in names in a stale settings file are ignored.
                    let _ = set.set_enabled(&config.name, config.enabled);
                }
                RuleOrigin::Custom => {
                    match PatternRule::custom(
                        config.name.clone(),
                        &config.pattern,
                        config.replacement.clone(),
                    ) {
                        Ok(mut rule) => {
                            rule.set_enabled(config.enabled);
                            if let Err(e) = set.push_custom(rule) {
                                rejected.push(e);
                            }
                        }
                        Err(e) => rejected.push(e),
                    }
                }
            }
        }

        (set, rejected)
    }

    /// Serialize the set back to persistable configs, preserving order.
    pub fn to_configs(&self) -> Vec<RuleConfig> {
        self.rules
            .iter()
            .map(|rule| RuleConfig {
                name: rule.name().to_string(),
                pattern: rule.pattern().as_str().to_string(),
                replacement: rule.replacement().to_string(),
                enabled: rule.is_enabled(),
                origin: rule.origin(),
            })
            .collect()
    }

    pub fn add_custom(
        &mut self,
        name: impl Into<String>,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<(), RuleError> {
        let rule = PatternRule::custom(name, pattern, replacement)?;
        self.push_custom(rule)
    }

    fn push_custom(&mut self, rule: PatternRule) -> Result<(), RuleError> {
        if self.get(rule.name()).is_some() {
            return Err(RuleError::DuplicateName(rule.name().to_string()));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Remove a custom rule. Built-ins can only be disabled.
    pub fn remove_custom(&mut self, name: &str) -> Result<(), RuleError> {
        let idx = self
            .rules
            .iter()
            .position(|r| r.name() == name)
            .ok_or_else(|| RuleError::UnknownRule(name.to_string()))?;

        if self.rules[idx].origin() == RuleOrigin::Builtin {
            return Err(RuleError::BuiltinImmutable(name.to_string()));
        }

        self.rules.remove(idx);
        Ok(())
    }

    /// Toggle a rule in place, leaving evaluation order untouched.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<(), RuleError> {
        let rule = self
            .rules
            .iter_mut()
            .find(|r| r.name() == name)
            .ok_or_else(|| RuleError::UnknownRule(name.to_string()))?;
        rule.set_enabled(enabled);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PatternRule> {
        self.rules.iter().find(|r| r.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternRule> {
        self.rules.iter()
    }

    /// Enabled rules in evaluation order.
    pub fn enabled_rules(&self) -> impl Iterator<Item = &PatternRule> {
        self.rules.iter().filter(|r| r.is_enabled())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}
