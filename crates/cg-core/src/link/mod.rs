//! Tracking-link normalization.
//!
//! Three stages, applied in order: unwrap known redirectors, canonicalize
//! AMP variants, strip tracking query parameters. Everything runs locally;
//! no network request is ever made to resolve a link.
//!
//! The redirector/AMP host tables and the parameter denylist are data, not
//! architecture: [`LinkCleaner::with_tables`] swaps them wholesale.

mod tables;

use url::{form_urlencoded, Url};

pub use tables::{AmpRule, RedirectorRule, TrackingParams};

/// A redirector can point at another redirector; bound the unwrap depth so
/// malformed chains cannot loop.
const MAX_REDIRECT_HOPS: usize = 3;

#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub cleaned: String,
    pub changed: bool,
}

#[derive(Debug, Clone)]
pub struct LinkCleaner {
    redirectors: Vec<RedirectorRule>,
    amp_rules: Vec<AmpRule>,
    tracking: TrackingParams,
}

impl LinkCleaner {
    pub fn new() -> Self {
        Self {
            redirectors: tables::default_redirectors(),
            amp_rules: tables::default_amp_rules(),
            tracking: TrackingParams::default(),
        }
    }

    pub fn with_tables(
        redirectors: Vec<RedirectorRule>,
        amp_rules: Vec<AmpRule>,
        tracking: TrackingParams,
    ) -> Self {
        Self {
            redirectors,
            amp_rules,
            tracking,
        }
    }

    /// Clean a single URL. Non-URL input passes through unchanged.
    pub fn clean(&self, url: &str) -> CleanOutcome {
        let original = url.trim();
        if original.is_empty() {
            return CleanOutcome {
                cleaned: url.to_string(),
                changed: false,
            };
        }

        let mut current = original.to_string();

        for _ in 0..MAX_REDIRECT_HOPS {
            match self.unwrap_redirector(&current) {
                Some(destination) => current = destination,
                None => break,
            }
        }

        if let Some(canonical) = self.canonicalize_amp(&current) {
            current = canonical;
        }

        if let Some(stripped) = self.strip_tracking(&current) {
            current = stripped;
        }

        CleanOutcome {
            changed: current != original,
            cleaned: current,
        }
    }

    /// Extract the destination parameter of a known redirector, already
    /// percent-decoded. `None` when the URL is not a redirector.
    fn unwrap_redirector(&self, url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?;

        for rule in &self.redirectors {
            if host.contains(rule.host_marker.as_str())
                && parsed.path().starts_with(rule.path_prefix.as_str())
            {
                if let Some((_, destination)) = parsed
                    .query_pairs()
                    .find(|(key, _)| key == rule.param.as_str())
                {
                    if !destination.is_empty() {
                        return Some(destination.into_owned());
                    }
                }
            }
        }
        None
    }

    /// Rewrite an AMP cache URL to the canonical page it mirrors.
    fn canonicalize_amp(&self, url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?;

        for rule in &self.amp_rules {
            if host.contains(rule.host_marker.as_str()) {
                if let Some(rest) = parsed.path().strip_prefix(rule.path_prefix.as_str()) {
                    let mut canonical = format!("https://{rest}");
                    if let Some(query) = parsed.query() {
                        canonical.push('?');
                        canonical.push_str(query);
                    }
                    return Some(canonical);
                }
            }
        }
        None
    }

    /// Drop denylisted query parameters, keeping the rest in their original
    /// order. `None` when nothing had to be removed, so an already-clean URL
    /// is not re-serialized (and thus not cosmetically altered).
    fn strip_tracking(&self, url: &str) -> Option<String> {
        let mut parsed = Url::parse(url).ok()?;
        parsed.query()?;

        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let kept: Vec<&(String, String)> = pairs
            .iter()
            .filter(|(key, _)| !self.tracking.is_denied(key))
            .collect();

        if kept.len() == pairs.len() {
            return None;
        }

        if kept.is_empty() {
            parsed.set_query(None);
        } else {
            let mut serializer = form_urlencoded::Serializer::new(String::new());
            for (key, value) in kept {
                serializer.append_pair(key, value);
            }
            let query = serializer.finish();
            parsed.set_query(Some(&query));
        }

        Some(parsed.to_string())
    }
}

impl Default for LinkCleaner {
    fn default() -> Self {
        Self::new()
    }
}
