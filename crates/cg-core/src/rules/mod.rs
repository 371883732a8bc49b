//! Masking rule domain models.
mod builtin;
mod error;
mod rule;
mod set;

pub use builtin::builtin_rules;
pub use error::RuleError;
pub use rule::{PatternRule, RuleOrigin};
pub use set::RuleSet;
