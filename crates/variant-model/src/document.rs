//! Raw configuration document as written by the user.
//!
//! Every field is optional here so that `Configuration::load` can report
//! exactly which required field is missing instead of a generic parse error.
//! Build types are an array of tables (`[[build_types]]`) so that two
//! entries with the same name survive parsing and can be rejected.

use serde::{Deserialize, Serialize};

use crate::policy::{MultidexPolicy, ToolchainPins};

/// Top-level document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDocument {
    #[serde(default)]
    pub app: IdentitySection,

    #[serde(default)]
    pub platform: PlatformSection,

    #[serde(default)]
    pub defaults: DefaultsSection,

    #[serde(default)]
    pub signing: SigningSection,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multidex: Option<MultidexPolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolchain: Option<ToolchainPins>,

    #[serde(default)]
    pub build_types: Vec<BuildTypeEntry>,
}

/// `[app]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentitySection {
    pub application_id: Option<String>,
    pub namespace: Option<String>,
    pub version_code: Option<i64>,
    pub version_name: Option<String>,
}

/// `[platform]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformSection {
    pub min_sdk: Option<i64>,
    pub target_sdk: Option<i64>,
    pub compile_sdk: Option<i64>,
}

/// `[defaults]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsSection {
    pub minify_enabled: Option<bool>,
    pub shrink_resources: Option<bool>,
}

/// `[signing]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SigningSection {
    pub default_ref: Option<String>,
    pub debug_refs: Option<Vec<String>>,
}

/// One `[[build_types]]` entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildTypeEntry {
    pub name: Option<String>,
    pub signing_ref: Option<String>,
    pub minify_enabled: Option<bool>,
    pub shrink_resources: Option<bool>,
    pub debuggable: Option<bool>,
    pub application_id_suffix: Option<String>,
    pub version_name_suffix: Option<String>,
}
