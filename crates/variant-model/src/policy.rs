//! Signing, multidex and toolchain policies

use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Signing reference used when nothing else is configured.
///
/// Mirrors the stock behaviour of signing every variant with the debug
/// identity until a project registers its own.
pub const DEFAULT_SIGNING_REF: &str = "debug";

/// Alias of the keystore entry the Android SDK generates for debug builds.
pub const ANDROID_DEBUG_KEY_ALIAS: &str = "androiddebugkey";

/// How signing references are assigned and classified.
///
/// Only reference names are carried; key material stays with the build host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningPolicy {
    /// Reference used by build types that do not name one
    pub default_ref: String,

    /// References known to point at a debug-tier identity
    #[serde(default)]
    pub debug_refs: Vec<String>,
}

impl Default for SigningPolicy {
    fn default() -> Self {
        Self {
            default_ref: DEFAULT_SIGNING_REF.to_string(),
            debug_refs: vec![
                DEFAULT_SIGNING_REF.to_string(),
                ANDROID_DEBUG_KEY_ALIAS.to_string(),
            ],
        }
    }
}

fn debug_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^debug([-_.].*)?$").expect("debug-name pattern is valid")
    })
}

impl SigningPolicy {
    /// Whether `signing_ref` points at a debug-tier identity.
    ///
    /// True when listed in `debug_refs`, or when the name is `debug`
    /// optionally followed by `-`, `_` or `.` and anything else
    /// (`debug-key`, `DEBUG_keystore`).
    pub fn is_debug_tier(&self, signing_ref: &str) -> bool {
        self.debug_refs.iter().any(|r| r == signing_ref)
            || debug_name_pattern().is_match(signing_ref)
    }
}

/// Whether secondary-dex linking should be enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum MultidexPolicy {
    /// Always enable. Undercounting methods breaks linking outright while
    /// overcounting costs one small runtime library.
    #[default]
    Always,
    /// Explicit opt-out
    Never,
    /// Decide from a method-reference count estimated by the build host
    Estimate { method_count: u64 },
}

/// Toolchain versions pinned by the project
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolchainPins {
    /// Java source/target compatibility and Kotlin JVM target
    pub java_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndk_version: Option<String>,
}

impl Default for ToolchainPins {
    fn default() -> Self {
        Self {
            java_version: "11".to_string(),
            ndk_version: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_signing_policy() {
        let policy = SigningPolicy::default();
        assert_eq!(policy.default_ref, "debug");
        assert_eq!(policy.debug_refs, vec!["debug", "androiddebugkey"]);
        assert!(policy.is_debug_tier("debug"));
        assert!(policy.is_debug_tier("androiddebugkey"));
        assert!(!policy.is_debug_tier("upload"));
    }

    #[test]
    fn test_debug_tier_by_name() {
        let policy = SigningPolicy {
            default_ref: "upload".to_string(),
            debug_refs: Vec::new(),
        };
        assert!(policy.is_debug_tier("debug"));
        assert!(policy.is_debug_tier("debug-key"));
        assert!(policy.is_debug_tier("DEBUG_keystore"));
        assert!(policy.is_debug_tier("debug.jks"));
        assert!(!policy.is_debug_tier("debugger"));
        assert!(!policy.is_debug_tier("release"));
        assert!(!policy.is_debug_tier("upload"));
    }

    #[test]
    fn test_debug_tier_by_registry() {
        let policy = SigningPolicy {
            default_ref: "ci-shared".to_string(),
            debug_refs: vec!["ci-shared".to_string()],
        };
        assert!(policy.is_debug_tier("ci-shared"));
        assert!(!policy.is_debug_tier("play-upload"));
    }

    #[test]
    fn test_multidex_policy_serde() {
        let always: MultidexPolicy =
            serde_json::from_value(serde_json::json!({"policy": "always"})).unwrap();
        assert_eq!(always, MultidexPolicy::Always);

        let estimate: MultidexPolicy = serde_json::from_value(serde_json::json!({
            "policy": "estimate",
            "method_count": 70000
        }))
        .unwrap();
        assert_eq!(estimate, MultidexPolicy::Estimate { method_count: 70000 });

        assert_eq!(
            serde_json::to_value(MultidexPolicy::Never).unwrap(),
            serde_json::json!({"policy": "never"})
        );
    }

    #[test]
    fn test_toolchain_defaults() {
        let pins = ToolchainPins::default();
        assert_eq!(pins.java_version, "11");
        assert!(pins.ndk_version.is_none());
    }
}
