//! Build-type overrides and the configuration-level defaults they fall back to

use serde::{Deserialize, Serialize};

/// Name of the build type that is debuggable unless told otherwise
pub const DEBUG_BUILD_TYPE: &str = "debug";

/// A named build type. Every field is optional; unset fields inherit the
/// configuration-level value at resolve time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTypeOverride {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_ref: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minify_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shrink_resources: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub debuggable: Option<bool>,

    /// Appended to the application id, e.g. ".debug"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id_suffix: Option<String>,

    /// Appended to the version name, e.g. "-beta"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_name_suffix: Option<String>,
}

impl BuildTypeOverride {
    /// A build type with no overrides at all
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signing_ref: None,
            minify_enabled: None,
            shrink_resources: None,
            debuggable: None,
            application_id_suffix: None,
            version_name_suffix: None,
        }
    }

    /// Whether this is the build type named `debug`
    pub fn is_debug_build_type(&self) -> bool {
        self.name == DEBUG_BUILD_TYPE
    }

    /// Whether this build type is debuggable when it does not say so itself
    pub fn debuggable_by_default(&self) -> bool {
        self.is_debug_build_type()
    }

    /// Names of the fields this build type sets explicitly
    pub fn overridden_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.signing_ref.is_some() {
            fields.push("signing_ref");
        }
        if self.minify_enabled.is_some() {
            fields.push("minify_enabled");
        }
        if self.shrink_resources.is_some() {
            fields.push("shrink_resources");
        }
        if self.debuggable.is_some() {
            fields.push("debuggable");
        }
        if self.application_id_suffix.is_some() {
            fields.push("application_id_suffix");
        }
        if self.version_name_suffix.is_some() {
            fields.push("version_name_suffix");
        }
        fields
    }
}

/// Configuration-level values that build types inherit.
///
/// `Default` carries the host toolchain's stock values: code minification
/// and resource shrinking are off until a project turns them on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTypeDefaults {
    pub minify_enabled: bool,
    pub shrink_resources: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_has_no_overrides() {
        let bt = BuildTypeOverride::named("release");
        assert_eq!(bt.name, "release");
        assert!(bt.overridden_fields().is_empty());
    }

    #[test]
    fn test_overridden_fields() {
        let bt = BuildTypeOverride {
            signing_ref: Some("upload".to_string()),
            minify_enabled: Some(false),
            ..BuildTypeOverride::named("release")
        };
        assert_eq!(bt.overridden_fields(), vec!["signing_ref", "minify_enabled"]);
    }

    #[test]
    fn test_debuggable_by_default_only_for_debug() {
        assert!(BuildTypeOverride::named("debug").debuggable_by_default());
        assert!(!BuildTypeOverride::named("release").debuggable_by_default());
        assert!(!BuildTypeOverride::named("profile").debuggable_by_default());
    }

    #[test]
    fn test_debug_identity_ignores_debuggable_flag() {
        let bt = BuildTypeOverride {
            debuggable: Some(false),
            ..BuildTypeOverride::named("debug")
        };
        assert!(bt.is_debug_build_type());
        let bt = BuildTypeOverride {
            debuggable: Some(true),
            ..BuildTypeOverride::named("release")
        };
        assert!(!bt.is_debug_build_type());
    }

    #[test]
    fn test_serialization_skips_unset() {
        let json = serde_json::to_value(BuildTypeOverride::named("release")).unwrap();
        assert_eq!(json, serde_json::json!({"name": "release"}));
    }
}
