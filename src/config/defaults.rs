//! Built-in toolchain defaults (layer 1)
//!
//! The values a stock host toolchain supplies when a project does not set
//! them: SDK levels, version stamp, signing, multidex and Java pins.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use variant_model::{BuildTypeDefaults, MultidexPolicy, SigningPolicy, ToolchainPins};

/// Build types the host toolchain always provides, even when undeclared
pub const STOCK_BUILD_TYPES: &[&str] = &["debug", "release"];

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Minimum SDK (default: 21)
    pub min_sdk: u32,

    /// Target SDK (default: 34)
    pub target_sdk: u32,

    /// Compile SDK (default: 34)
    pub compile_sdk: u32,

    /// Version code (default: 1)
    pub version_code: u32,

    /// Version name (default: "1.0.0")
    pub version_name: String,

    pub build_type_defaults: BuildTypeDefaults,
    pub signing: SigningPolicy,
    pub multidex: MultidexPolicy,
    pub toolchain: ToolchainPins,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            min_sdk: 21,
            target_sdk: 34,
            compile_sdk: 34,
            version_code: 1,
            version_name: "1.0.0".to_string(),
            build_type_defaults: BuildTypeDefaults::default(),
            signing: SigningPolicy::default(),
            multidex: MultidexPolicy::default(),
            toolchain: ToolchainPins::default(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to a document layer for merging.
    ///
    /// No `app.application_id` and no `build_types`: the identity must come
    /// from the project, and stock build types are appended after merging.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "app": {
                "version_code": self.version_code,
                "version_name": self.version_name
            },
            "platform": {
                "min_sdk": self.min_sdk,
                "target_sdk": self.target_sdk,
                "compile_sdk": self.compile_sdk
            },
            "defaults": {
                "minify_enabled": self.build_type_defaults.minify_enabled,
                "shrink_resources": self.build_type_defaults.shrink_resources
            },
            "signing": {
                "default_ref": self.signing.default_ref,
                "debug_refs": self.signing.debug_refs
            },
            "multidex": self.multidex,
            "toolchain": self.toolchain
        })
    }
}
