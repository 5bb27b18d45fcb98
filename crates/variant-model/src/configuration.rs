//! Validated configuration snapshot

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::bounds::PlatformBounds;
use crate::build_type::{BuildTypeDefaults, BuildTypeOverride};
use crate::document::{BuildTypeEntry, ConfigDocument, IdentitySection, PlatformSection};
use crate::error::ConfigError;
use crate::identity::{is_reverse_domain, ApplicationIdentity};
use crate::policy::{MultidexPolicy, SigningPolicy, ToolchainPins};

/// A loaded, validated configuration.
///
/// Read-only once `load` returns; resolutions only ever borrow it, so any
/// number of them may run against the same snapshot at once. Fields are
/// public so callers can inspect the model, which is also why the resolver
/// re-checks bounds instead of trusting this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub identity: ApplicationIdentity,
    pub bounds: PlatformBounds,
    pub defaults: BuildTypeDefaults,
    pub signing: SigningPolicy,
    pub multidex: MultidexPolicy,
    pub toolchain: ToolchainPins,

    /// Build types in declaration order
    pub build_types: Vec<BuildTypeOverride>,
}

impl Configuration {
    /// Validate a parsed document into a configuration.
    pub fn load(document: ConfigDocument) -> Result<Self, ConfigError> {
        let identity = load_identity(&document.app)?;
        let bounds = load_bounds(&document.platform)?;

        let fallback_defaults = BuildTypeDefaults::default();
        let defaults = BuildTypeDefaults {
            minify_enabled: document
                .defaults
                .minify_enabled
                .unwrap_or(fallback_defaults.minify_enabled),
            shrink_resources: document
                .defaults
                .shrink_resources
                .unwrap_or(fallback_defaults.shrink_resources),
        };

        let fallback_signing = SigningPolicy::default();
        let signing = SigningPolicy {
            default_ref: document
                .signing
                .default_ref
                .unwrap_or(fallback_signing.default_ref),
            debug_refs: document
                .signing
                .debug_refs
                .unwrap_or(fallback_signing.debug_refs),
        };
        if signing.default_ref.trim().is_empty() {
            return Err(ConfigError::malformed(
                "signing.default_ref",
                "must not be empty",
            ));
        }

        let build_types = load_build_types(document.build_types, &identity)?;

        debug!(
            application_id = %identity.application_id,
            build_types = build_types.len(),
            "loaded configuration"
        );

        Ok(Self {
            identity,
            bounds,
            defaults,
            signing,
            multidex: document.multidex.unwrap_or_default(),
            toolchain: document.toolchain.unwrap_or_default(),
            build_types,
        })
    }

    /// Load from an already merged JSON value
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let document: ConfigDocument =
            serde_path_to_error::deserialize(value).map_err(malformed_at_path)?;
        Self::load(document)
    }

    /// Load from a TOML string
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let document: ConfigDocument =
            serde_path_to_error::deserialize(toml::Deserializer::new(s))
                .map_err(malformed_at_path)?;
        Self::load(document)
    }

    /// Load from a JSON string
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(s);
        let document: ConfigDocument =
            serde_path_to_error::deserialize(&mut deserializer).map_err(malformed_at_path)?;
        deserializer
            .end()
            .map_err(|e| ConfigError::malformed("document", e.to_string()))?;
        Self::load(document)
    }

    /// Look up a build type by name
    pub fn build_type(&self, name: &str) -> Option<&BuildTypeOverride> {
        self.build_types.iter().find(|bt| bt.name == name)
    }

    /// Build type names in declaration order
    pub fn build_type_names(&self) -> Vec<&str> {
        self.build_types.iter().map(|bt| bt.name.as_str()).collect()
    }
}

/// Report a deserialization failure against the field it occurred at.
///
/// Errors with no path (syntax errors, a non-table root) are reported
/// against the whole document.
fn malformed_at_path<E: std::fmt::Display>(err: serde_path_to_error::Error<E>) -> ConfigError {
    let path = err.path().to_string();
    let field = if path.is_empty() || path == "." {
        "document".to_string()
    } else {
        path
    };
    ConfigError::malformed(field, err.inner().to_string())
}

fn required_text(value: &Option<String>, field: &str) -> Result<String, ConfigError> {
    match value {
        None => Err(ConfigError::malformed(field, "required field is missing")),
        Some(s) if s.trim().is_empty() => Err(ConfigError::malformed(field, "must not be empty")),
        Some(s) => Ok(s.clone()),
    }
}

fn load_identity(app: &IdentitySection) -> Result<ApplicationIdentity, ConfigError> {
    let application_id = required_text(&app.application_id, "app.application_id")?;
    if !is_reverse_domain(&application_id) {
        return Err(ConfigError::malformed(
            "app.application_id",
            format!("'{}' is not a reverse-domain identifier", application_id),
        ));
    }

    let namespace = match &app.namespace {
        Some(_) => {
            let ns = required_text(&app.namespace, "app.namespace")?;
            if !is_reverse_domain(&ns) {
                return Err(ConfigError::malformed(
                    "app.namespace",
                    format!("'{}' is not a reverse-domain identifier", ns),
                ));
            }
            ns
        }
        None => application_id.clone(),
    };

    let version_code = match app.version_code {
        None => {
            return Err(ConfigError::malformed(
                "app.version_code",
                "required field is missing",
            ))
        }
        Some(code) => u32::try_from(code).map_err(|_| {
            ConfigError::malformed(
                "app.version_code",
                format!("must be a non-negative 32-bit integer, got {}", code),
            )
        })?,
    };

    let version_name = required_text(&app.version_name, "app.version_name")?;

    Ok(ApplicationIdentity {
        application_id,
        namespace,
        version_code,
        version_name,
    })
}

fn load_bounds(platform: &PlatformSection) -> Result<PlatformBounds, ConfigError> {
    let require = |value: Option<i64>, field: &str| {
        value.ok_or_else(|| ConfigError::malformed(field, "required field is missing"))
    };
    let min_sdk = require(platform.min_sdk, "platform.min_sdk")?;
    let target_sdk = require(platform.target_sdk, "platform.target_sdk")?;
    let compile_sdk = require(platform.compile_sdk, "platform.compile_sdk")?;

    Ok(PlatformBounds::from_raw(min_sdk, target_sdk, compile_sdk)?)
}

fn load_build_types(
    entries: Vec<BuildTypeEntry>,
    identity: &ApplicationIdentity,
) -> Result<Vec<BuildTypeOverride>, ConfigError> {
    let mut seen = HashSet::new();
    let mut build_types = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let name = required_text(&entry.name, &format!("build_types[{}].name", index))?;
        if name.chars().any(char::is_whitespace) {
            return Err(ConfigError::malformed(
                format!("build_types[{}].name", index),
                format!("'{}' must not contain whitespace", name),
            ));
        }
        if !seen.insert(name.clone()) {
            return Err(ConfigError::DuplicateBuildType(name));
        }

        if let Some(signing_ref) = &entry.signing_ref {
            if signing_ref.trim().is_empty() {
                return Err(ConfigError::malformed(
                    format!("build_types.{}.signing_ref", name),
                    "must not be empty when set",
                ));
            }
        }

        if let Some(suffix) = &entry.application_id_suffix {
            let effective = identity.application_id_with_suffix(suffix);
            if !is_reverse_domain(&effective) {
                return Err(ConfigError::malformed(
                    format!("build_types.{}.application_id_suffix", name),
                    format!("'{}' is not a reverse-domain identifier", effective),
                ));
            }
        }

        build_types.push(BuildTypeOverride {
            name,
            signing_ref: entry.signing_ref,
            minify_enabled: entry.minify_enabled,
            shrink_resources: entry.shrink_resources,
            debuggable: entry.debuggable,
            application_id_suffix: entry.application_id_suffix,
            version_name_suffix: entry.version_name_suffix,
        });
    }

    Ok(build_types)
}
