//! Detection and masking of sensitive substrings.
//!
//! The engine applies an ordered [`RuleSet`] to a text. Two properties are
//! deliberate and load-bearing:
//!
//! - **Smart detection**: when the entire trimmed text is itself exactly one
//!   sensitive token, it was almost certainly copied on purpose and is left
//!   alone. This is a whole-input check, evaluated once before any partial
//!   masking.
//! - **Order precedence**: rules claim spans of the original text in
//!   evaluation order; a span claimed by an earlier rule is not eligible for
//!   a later rule, so overlapping matches resolve deterministically.

use std::collections::BTreeSet;

use crate::rules::RuleSet;

#[derive(Debug, Clone)]
pub struct MaskOutcome {
    pub masked: String,
    pub changed: bool,
    /// Names of the rules that produced at least one replacement.
    pub matched: BTreeSet<String>,
}

impl MaskOutcome {
    fn unchanged(text: &str) -> Self {
        Self {
            masked: text.to_string(),
            changed: false,
            matched: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MaskingEngine;

impl MaskingEngine {
    pub fn new() -> Self {
        Self
    }

    /// Apply the rule set to `text`.
    ///
    /// Replacements are inserted verbatim; capture groups in the matched
    /// text are never expanded into the output.
    pub fn mask(&self, text: &str, rules: &RuleSet) -> MaskOutcome {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return MaskOutcome::unchanged(text);
        }

        if is_single_sensitive_item(trimmed, rules) {
            return MaskOutcome::unchanged(text);
        }

        // Earlier rules claim their spans first; later rules only match
        // regions left unclaimed.
        let mut claims: Vec<(usize, usize, &str)> = Vec::new();
        let mut matched = BTreeSet::new();

        for rule in rules.enabled_rules() {
            for m in rule.pattern().find_iter(text) {
                if m.start() == m.end() {
                    continue;
                }
                let overlaps = claims
                    .iter()
                    .any(|&(start, end, _)| m.start() < end && start < m.end());
                if !overlaps {
                    claims.push((m.start(), m.end(), rule.replacement()));
                    matched.insert(rule.name().to_string());
                }
            }
        }

        if claims.is_empty() {
            return MaskOutcome::unchanged(text);
        }

        claims.sort_unstable_by_key(|&(start, _, _)| start);

        let mut masked = String::with_capacity(text.len());
        let mut cursor = 0;
        for (start, end, replacement) in claims {
            masked.push_str(&text[cursor..start]);
            masked.push_str(replacement);
            cursor = end;
        }
        masked.push_str(&text[cursor..]);

        let changed = masked != text;

        #[cfg(feature = "tracing")]
        if changed {
            tracing::debug!(rules = ?matched, "masked sensitive spans");
        }

        MaskOutcome {
            masked,
            changed,
            matched,
        }
    }
}

/// True when the trimmed text is, in full, a match of exactly one enabled
/// rule — the signature of an intentionally copied single token.
fn is_single_sensitive_item(trimmed: &str, rules: &RuleSet) -> bool {
    let fully_matching = rules
        .enabled_rules()
        .filter(|rule| {
            let mut matches = rule.pattern().find_iter(trimmed);
            match (matches.next(), matches.next()) {
                (Some(m), None) => m.start() == 0 && m.end() == trimmed.len(),
                _ => false,
            }
        })
        .count();

    fully_matching == 1
}
