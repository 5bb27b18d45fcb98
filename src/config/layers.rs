//! Layered document with provenance
//!
//! Captures the merged document plus where each layer came from, so a
//! resolved plan can be traced back to the exact bytes that produced it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::debug;
use variant_model::{ConfigError, Configuration};

use super::defaults::{BuiltinDefaults, STOCK_BUILD_TYPES};
use super::merge::merge_layers;

/// Origin of a document layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LayerOrigin {
    Builtin,
    Host,
    Project,
    Cli,
}

/// A contributing layer with provenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayerSource {
    pub origin: LayerOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Errors reading layers before a document exists
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid --set override '{0}': expected dotted.key=value")]
    InvalidAssignment(String),
}

/// Merged configuration document with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayeredDocument {
    /// The merged document
    pub document: Value,

    /// Contributing layers in precedence order
    pub sources: Vec<LayerSource>,
}

impl LayeredDocument {
    /// Build the document from layers.
    ///
    /// Paths passed here were asked for explicitly, so a missing file is an
    /// error rather than a skipped layer.
    pub fn build(
        host_config_path: Option<&Path>,
        project_config_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, LayerError> {
        let mut layers = Vec::new();
        let mut sources = Vec::new();

        // Layer 1: Built-in defaults
        layers.push(BuiltinDefaults::default().to_value());
        sources.push(LayerSource {
            origin: LayerOrigin::Builtin,
            path: None,
            digest: None,
        });

        // Layer 2: Host config
        if let Some(path) = host_config_path {
            let (value, digest) = Self::load_file(path)?;
            layers.push(value);
            sources.push(LayerSource {
                origin: LayerOrigin::Host,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        // Layer 3: Project config
        if let Some(path) = project_config_path {
            let (value, digest) = Self::load_file(path)?;
            layers.push(value);
            sources.push(LayerSource {
                origin: LayerOrigin::Project,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        // Layer 4: CLI overrides
        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(LayerSource {
                origin: LayerOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let mut document = merge_layers(layers);
        Self::append_stock_build_types(&mut document);

        debug!(layers = sources.len(), "merged configuration layers");

        Ok(Self { document, sources })
    }

    /// Validate the merged document into a configuration
    pub fn load(&self) -> Result<Configuration, ConfigError> {
        Configuration::from_value(self.document.clone())
    }

    /// Append stock build types that no layer declared.
    ///
    /// Leaves a malformed `build_types` value alone so that loading reports it.
    fn append_stock_build_types(document: &mut Value) {
        let Some(root) = document.as_object_mut() else {
            return;
        };
        let entry = root
            .entry("build_types")
            .or_insert_with(|| Value::Array(Vec::new()));
        let Some(build_types) = entry.as_array_mut() else {
            return;
        };

        for stock in STOCK_BUILD_TYPES {
            let declared = build_types
                .iter()
                .any(|bt| bt.get("name").and_then(Value::as_str) == Some(*stock));
            if !declared {
                build_types.push(serde_json::json!({ "name": stock }));
            }
        }
    }

    /// Load a TOML or JSON file, returning the value and digest
    fn load_file(path: &Path) -> Result<(Value, String), LayerError> {
        if !path.exists() {
            return Err(LayerError::NotFound(path.to_path_buf()));
        }

        let bytes = fs::read(path).map_err(|e| LayerError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let parse_error = |reason: String| LayerError::Parse {
            path: path.to_path_buf(),
            reason,
        };

        let contents =
            String::from_utf8(bytes).map_err(|e| parse_error(format!("Invalid UTF-8: {}", e)))?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let value = if is_json {
            serde_json::from_str(&contents).map_err(|e| parse_error(e.to_string()))?
        } else {
            let toml_value: toml::Value =
                toml::from_str(&contents).map_err(|e| parse_error(e.to_string()))?;
            Self::toml_to_json(toml_value)
        };

        debug!(path = %path.display(), digest = %digest, "loaded config layer");

        Ok((value, digest))
    }

    /// Convert TOML Value to JSON Value
    fn toml_to_json(toml: toml::Value) -> Value {
        match toml {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Number(i.into()),
            toml::Value::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Self::toml_to_json).collect())
            }
            toml::Value::Table(table) => {
                let map: Map<String, Value> = table
                    .into_iter()
                    .map(|(k, v)| (k, Self::toml_to_json(v)))
                    .collect();
                Value::Object(map)
            }
        }
    }
}

/// Parse one `dotted.key=value` assignment into a nested object.
///
/// A value wrapped in double quotes is always a string (`key="2"`).
/// Otherwise it is read as an integer, then a boolean, then a plain string.
pub fn parse_assignment(assignment: &str) -> Result<Value, LayerError> {
    let invalid = || LayerError::InvalidAssignment(assignment.to_string());

    let (key, raw) = assignment.split_once('=').ok_or_else(invalid)?;
    let segments: Vec<&str> = key.trim().split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(invalid());
    }

    let raw = raw.trim();
    let quoted = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'));
    let mut value = if let Some(text) = quoted {
        Value::String(text.to_string())
    } else if let Ok(i) = raw.parse::<i64>() {
        Value::Number(i.into())
    } else if let Ok(b) = raw.parse::<bool>() {
        Value::Bool(b)
    } else {
        Value::String(raw.to_string())
    };

    for segment in segments.iter().rev() {
        let mut map = Map::new();
        map.insert(segment.to_string(), value);
        value = Value::Object(map);
    }

    Ok(value)
}

/// Fold repeated `--set` assignments into one CLI layer.
///
/// Returns `None` when there are no assignments so no CLI layer is recorded.
pub fn overrides_from_assignments(assignments: &[String]) -> Result<Option<Value>, LayerError> {
    if assignments.is_empty() {
        return Ok(None);
    }

    let layers = assignments
        .iter()
        .map(|a| parse_assignment(a))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(merge_layers(layers)))
}
