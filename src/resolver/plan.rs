//! Resolved build plan

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use variant_model::{ApplicationIdentity, PlatformBounds, ToolchainPins};

/// Where the signing reference came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigningSource {
    /// The build type named it
    BuildType,
    /// Fell back to the configuration-level default
    Default,
}

/// Signing reference handed to the build host
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SigningAssignment {
    pub signing_ref: String,
    pub source: SigningSource,
    /// Whether the reference points at a debug-tier identity
    pub debug_tier: bool,
}

/// Advisory codes. Advisories never fail a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdvisoryCode {
    /// A build type other than `debug` is signed with a debug-tier identity
    DebugSigningOnRelease,
    /// Resource shrinking is on while code minification is off
    ShrinkWithoutMinify,
}

impl AdvisoryCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisoryCode::DebugSigningOnRelease => "DEBUG_SIGNING_ON_RELEASE",
            AdvisoryCode::ShrinkWithoutMinify => "SHRINK_WITHOUT_MINIFY",
        }
    }
}

impl std::fmt::Display for AdvisoryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A deployment risk the caller should be able to detect
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Advisory {
    pub code: AdvisoryCode,
    pub message: String,
}

/// Canonical encoding failure while digesting a plan
#[derive(Debug, thiserror::Error)]
#[error("Canonical JSON encoding failed: {0}")]
pub struct DigestError(String);

/// Fully merged configuration for one build type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedBuildPlan {
    pub build_type: String,

    /// Identity with build-type suffixes applied
    pub identity: ApplicationIdentity,

    pub bounds: PlatformBounds,
    pub minify_enabled: bool,
    pub shrink_resources: bool,
    pub debuggable: bool,
    pub signing: SigningAssignment,
    pub multidex_required: bool,

    /// Libraries the host must add to the runtime classpath
    pub runtime_dependencies: Vec<String>,

    pub toolchain: ToolchainPins,
    pub advisories: Vec<Advisory>,
}

impl ResolvedBuildPlan {
    /// Check whether an advisory with `code` was raised
    pub fn has_advisory(&self, code: AdvisoryCode) -> bool {
        self.advisories.iter().any(|a| a.code == code)
    }

    /// SHA-256 over the RFC 8785 canonical JSON of the plan
    pub fn digest(&self) -> Result<String, DigestError> {
        let jcs_bytes =
            serde_json_canonicalizer::to_vec(self).map_err(|e| DigestError(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&jcs_bytes);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Human-readable summary
    pub fn to_human(&self) -> String {
        let on_off = |b: bool| if b { "on" } else { "off" };
        let mut out = String::new();

        out.push_str(&format!("Build type: {}\n", self.build_type));
        out.push_str(&format!(
            "  Application id: {}\n",
            self.identity.application_id
        ));
        out.push_str(&format!("  Namespace: {}\n", self.identity.namespace));
        out.push_str(&format!(
            "  Version: {} ({})\n",
            self.identity.version_name, self.identity.version_code
        ));
        out.push_str(&format!(
            "  SDK: min {}, target {}, compile {}\n",
            self.bounds.min_sdk, self.bounds.target_sdk, self.bounds.compile_sdk
        ));
        out.push_str(&format!(
            "  Minify: {}, shrink resources: {}, debuggable: {}\n",
            on_off(self.minify_enabled),
            on_off(self.shrink_resources),
            if self.debuggable { "yes" } else { "no" }
        ));

        let source = match self.signing.source {
            SigningSource::BuildType => "build type",
            SigningSource::Default => "default",
        };
        let tier = if self.signing.debug_tier { ", debug tier" } else { "" };
        out.push_str(&format!(
            "  Signing: {} ({}{})\n",
            self.signing.signing_ref, source, tier
        ));

        out.push_str(&format!(
            "  Multidex: {}\n",
            if self.multidex_required { "required" } else { "not required" }
        ));
        if !self.runtime_dependencies.is_empty() {
            out.push_str(&format!(
                "  Runtime dependencies: {}\n",
                self.runtime_dependencies.join(", ")
            ));
        }

        out.push_str(&format!("  Java: {}", self.toolchain.java_version));
        if let Some(ref ndk) = self.toolchain.ndk_version {
            out.push_str(&format!(", NDK: {}", ndk));
        }
        out.push('\n');

        if !self.advisories.is_empty() {
            out.push_str("  Advisories:\n");
            for advisory in &self.advisories {
                out.push_str(&format!("    {}: {}\n", advisory.code, advisory.message));
            }
        }

        out
    }
}
