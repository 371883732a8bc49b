//! Fixed table of built-in masking rules.
//!
//! Order matters: it is the evaluation order of the engine and the
//! presentation order for settings surfaces. Built-ins can be disabled
//! but never removed.

use super::rule::PatternRule;

const BUILTIN_TABLE: &[(&str, &str, &str)] = &[
    (
        "Email",
        r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
        "[REDACTED_EMAIL]",
    ),
    (
        "Phone",
        r"\b(?:\+?1[-.\s]?)?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})\b",
        "[REDACTED_PHONE]",
    ),
    (
        "IPv4",
        r"\b(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\b",
        "[REDACTED_IP]",
    ),
    (
        "CreditCard",
        r"\b(?:\d{4}[-\s]?){3}\d{4}\b",
        "[REDACTED_CC]",
    ),
    ("SSN", r"\b\d{3}-\d{2}-\d{4}\b", "[REDACTED_SSN]"),
];

/// Build the built-in rules in their fixed evaluation order.
pub fn builtin_rules() -> Vec<PatternRule> {
    BUILTIN_TABLE
        .iter()
        .map(|(name, pattern, replacement)| PatternRule::builtin(name, pattern, replacement))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_compiles_in_fixed_order() {
        let names: Vec<String> = builtin_rules()
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, ["Email", "Phone", "IPv4", "CreditCard", "SSN"]);
    }

    #[test]
    fn builtin_patterns_match_representative_samples() {
        let rules = builtin_rules();
        let samples = [
            ("Email", "alice@example.com"),
            ("Phone", "(555) 123-4567"),
            ("IPv4", "192.168.0.1"),
            ("CreditCard", "4111-1111-1111-1111"),
            ("SSN", "123-45-6789"),
        ];
        for (name, sample) in samples {
            let rule = rules.iter().find(|r| r.name() == name).unwrap();
            assert!(rule.pattern().is_match(sample), "{name} should match {sample}");
        }
    }
}
