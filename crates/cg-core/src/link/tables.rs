//! Default data tables for the link cleaner.
//!
//! Membership of these tables is configuration, not algorithm: callers can
//! replace any of them without touching the pipeline.

/// A known redirector host: URLs under it forward to a destination carried
/// in a query parameter.
#[derive(Debug, Clone)]
pub struct RedirectorRule {
    /// Substring matched against the URL host, e.g. `google.`.
    pub host_marker: String,
    /// Path prefix of the redirect endpoint, e.g. `/url`.
    pub path_prefix: String,
    /// Name of the query parameter holding the destination URL.
    pub param: String,
}

impl RedirectorRule {
    pub fn new(
        host_marker: impl Into<String>,
        path_prefix: impl Into<String>,
        param: impl Into<String>,
    ) -> Self {
        Self {
            host_marker: host_marker.into(),
            path_prefix: path_prefix.into(),
            param: param.into(),
        }
    }
}

/// An AMP cache pattern: the canonical page is embedded in the path after
/// a fixed prefix, e.g. `google.com/amp/s/example.com/page`.
#[derive(Debug, Clone)]
pub struct AmpRule {
    pub host_marker: String,
    pub path_prefix: String,
}

impl AmpRule {
    pub fn new(host_marker: impl Into<String>, path_prefix: impl Into<String>) -> Self {
        Self {
            host_marker: host_marker.into(),
            path_prefix: path_prefix.into(),
        }
    }
}

/// Denylist of tracking query parameters.
#[derive(Debug, Clone)]
pub struct TrackingParams {
    /// Exact parameter names to drop.
    pub names: Vec<String>,
    /// Prefix families to drop, e.g. `utm_` covers the whole UTM family.
    pub prefixes: Vec<String>,
}

impl TrackingParams {
    pub fn is_denied(&self, key: &str) -> bool {
        self.names.iter().any(|n| n == key) || self.prefixes.iter().any(|p| key.starts_with(p))
    }
}

impl Default for TrackingParams {
    fn default() -> Self {
        Self {
            names: ["fbclid", "gclid", "mc_eid", "igshid", "_ga", "ref", "source"]
                .into_iter()
                .map(String::from)
                .collect(),
            prefixes: vec!["utm_".to_string()],
        }
    }
}

pub(super) fn default_redirectors() -> Vec<RedirectorRule> {
    vec![
        RedirectorRule::new("google.", "/url", "q"),
        RedirectorRule::new("facebook.", "/l.php", "u"),
    ]
}

pub(super) fn default_amp_rules() -> Vec<AmpRule> {
    vec![AmpRule::new("google.", "/amp/s/")]
}
