//! Application identity

use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Identity stamped into every variant of the application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationIdentity {
    /// Package identifier, e.g. "com.example.app"
    pub application_id: String,

    /// Code namespace for generated sources (R class, BuildConfig).
    /// Falls back to `application_id` when not configured.
    pub namespace: String,

    /// Monotonic integer version used by stores for upgrade ordering
    pub version_code: u32,

    /// User-visible version string
    pub version_name: String,
}

fn reverse_domain_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)+$")
            .expect("reverse-domain pattern is valid")
    })
}

/// Check that `id` is a reverse-domain token.
///
/// At least two dot-separated segments; each segment starts with an ASCII
/// letter and contains only ASCII letters, digits and underscores.
pub fn is_reverse_domain(id: &str) -> bool {
    reverse_domain_pattern().is_match(id)
}

impl ApplicationIdentity {
    /// Application id with a build-type suffix appended
    pub fn application_id_with_suffix(&self, suffix: &str) -> String {
        format!("{}{}", self.application_id, suffix)
    }

    /// Version name with a build-type suffix appended
    pub fn version_name_with_suffix(&self, suffix: &str) -> String {
        format!("{}{}", self.version_name, suffix)
    }
}
