use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule pattern is empty")]
    EmptyPattern,

    #[error("invalid pattern for rule '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("a rule named '{0}' already exists")]
    DuplicateName(String),

    #[error("no rule named '{0}'")]
    UnknownRule(String),

    #[error("built-in rule '{0}' cannot be removed, only disabled")]
    BuiltinImmutable(String),
}
