//! Error code registry
//!
//! Every failure the CLI can report maps to one stable code plus a
//! structured payload carrying the offending field or name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;
use variant_model::{BoundsError, ConfigError};

use crate::config::LayerError;
use crate::resolver::{DigestError, ResolveError};

/// Stable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Missing/empty required fields or a structurally wrong document
    MalformedConfig,
    /// SDK ordering invariant violated
    InvalidBounds,
    /// Two build types share a name
    DuplicateBuildType,
    /// Requested build type is not configured
    UnknownBuildType,
    /// A config layer could not be read or parsed
    ConfigUnreadable,
    /// The plan could not be encoded for output
    OutputFailed,
}

impl ErrorCode {
    /// Returns the string representation of the error code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MalformedConfig => "MALFORMED_CONFIG",
            ErrorCode::InvalidBounds => "INVALID_BOUNDS",
            ErrorCode::DuplicateBuildType => "DUPLICATE_BUILD_TYPE",
            ErrorCode::UnknownBuildType => "UNKNOWN_BUILD_TYPE",
            ErrorCode::ConfigUnreadable => "CONFIG_UNREADABLE",
            ErrorCode::OutputFailed => "OUTPUT_FAILED",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured error written to stderr
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: String,

    /// Single-line human-readable message
    pub message: String,

    /// Machine-readable details, sorted by key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, serde_json::Value>>,
}

impl ErrorPayload {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.as_str().to_string(),
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value);
        self
    }
}

/// Crate-level error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Layer(#[from] LayerError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Digest(#[from] DigestError),

    #[error("Failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Layer(_) => ErrorCode::ConfigUnreadable,
            Error::Config(ConfigError::Malformed { .. }) => ErrorCode::MalformedConfig,
            Error::Config(ConfigError::InvalidBounds(_)) => ErrorCode::InvalidBounds,
            Error::Config(ConfigError::DuplicateBuildType(_)) => ErrorCode::DuplicateBuildType,
            Error::Resolve(ResolveError::UnknownBuildType { .. }) => ErrorCode::UnknownBuildType,
            Error::Resolve(ResolveError::InvalidBounds { .. }) => ErrorCode::InvalidBounds,
            Error::Digest(_) | Error::Output(_) => ErrorCode::OutputFailed,
        }
    }

    /// Convert to a structured payload
    pub fn to_payload(&self) -> ErrorPayload {
        let payload = ErrorPayload::new(self.code(), self.to_string());

        match self {
            Error::Layer(LayerError::NotFound(path))
            | Error::Layer(LayerError::Io { path, .. })
            | Error::Layer(LayerError::Parse { path, .. }) => {
                payload.with_data("path", json!(path.to_string_lossy()))
            }
            Error::Layer(LayerError::InvalidAssignment(assignment)) => {
                payload.with_data("assignment", json!(assignment))
            }
            Error::Config(ConfigError::Malformed { field, reason }) => payload
                .with_data("field", json!(field))
                .with_data("reason", json!(reason)),
            Error::Config(ConfigError::InvalidBounds(err)) => bounds_data(payload, err),
            Error::Config(ConfigError::DuplicateBuildType(name)) => {
                payload.with_data("build_type", json!(name))
            }
            Error::Resolve(ResolveError::UnknownBuildType { name, available }) => payload
                .with_data("build_type", json!(name))
                .with_data("available", json!(available)),
            Error::Resolve(ResolveError::InvalidBounds { build_type, source }) => {
                bounds_data(payload.with_data("build_type", json!(build_type)), source)
            }
            Error::Digest(_) | Error::Output(_) => payload,
        }
    }
}

fn bounds_data(payload: ErrorPayload, err: &BoundsError) -> ErrorPayload {
    let payload = payload.with_data("field", json!(err.field()));
    match err {
        BoundsError::NonPositive { value, .. } => payload.with_data("value", json!(value)),
        BoundsError::MinAboveTarget {
            min_sdk,
            target_sdk,
        } => payload
            .with_data("min_sdk", json!(min_sdk))
            .with_data("target_sdk", json!(target_sdk)),
        BoundsError::TargetAboveCompile {
            target_sdk,
            compile_sdk,
        } => payload
            .with_data("target_sdk", json!(target_sdk))
            .with_data("compile_sdk", json!(compile_sdk)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_str() {
        assert_eq!(ErrorCode::MalformedConfig.as_str(), "MALFORMED_CONFIG");
        assert_eq!(ErrorCode::UnknownBuildType.to_string(), "UNKNOWN_BUILD_TYPE");
    }

    #[test]
    fn test_unknown_build_type_payload() {
        let err = Error::from(ResolveError::UnknownBuildType {
            name: "staging".to_string(),
            available: vec!["debug".to_string(), "release".to_string()],
        });
        let payload = err.to_payload();

        assert_eq!(payload.code, "UNKNOWN_BUILD_TYPE");
        assert!(payload.message.contains("staging"));
        let data = payload.data.unwrap();
        assert_eq!(data["build_type"], json!("staging"));
        assert_eq!(data["available"], json!(["debug", "release"]));
    }

    #[test]
    fn test_duplicate_payload() {
        let err = Error::from(ConfigError::DuplicateBuildType("release".to_string()));
        let payload = err.to_payload();
        assert_eq!(payload.code, "DUPLICATE_BUILD_TYPE");
        assert_eq!(payload.data.unwrap()["build_type"], json!("release"));
    }

    #[test]
    fn test_bounds_payload() {
        let err = Error::from(ConfigError::InvalidBounds(BoundsError::MinAboveTarget {
            min_sdk: 35,
            target_sdk: 34,
        }));
        let payload = err.to_payload();

        assert_eq!(payload.code, "INVALID_BOUNDS");
        let data = payload.data.unwrap();
        assert_eq!(data["field"], json!("min_sdk"));
        assert_eq!(data["min_sdk"], json!(35));
        assert_eq!(data["target_sdk"], json!(34));
    }

    #[test]
    fn test_resolve_bounds_payload() {
        let err = Error::from(ResolveError::InvalidBounds {
            build_type: "release".to_string(),
            source: BoundsError::TargetAboveCompile {
                target_sdk: 35,
                compile_sdk: 34,
            },
        });
        assert_eq!(err.code(), ErrorCode::InvalidBounds);
        let payload = err.to_payload();

        assert_eq!(payload.code, "INVALID_BOUNDS");
        assert!(payload.message.contains("release"));
        let data = payload.data.unwrap();
        assert_eq!(data["build_type"], json!("release"));
        assert_eq!(data["field"], json!("target_sdk"));
        assert_eq!(data["target_sdk"], json!(35));
        assert_eq!(data["compile_sdk"], json!(34));
        assert!(!data.contains_key("min_sdk"));
    }

    #[test]
    fn test_malformed_payload() {
        let err = Error::from(ConfigError::Malformed {
            field: "app.application_id".to_string(),
            reason: "required field is missing".to_string(),
        });
        let payload = err.to_payload();
        assert_eq!(payload.code, "MALFORMED_CONFIG");
        assert_eq!(payload.data.unwrap()["field"], json!("app.application_id"));
    }

    #[test]
    fn test_layer_error_is_unreadable() {
        let err = Error::from(LayerError::NotFound("variant.toml".into()));
        assert_eq!(err.code(), ErrorCode::ConfigUnreadable);
        assert_eq!(err.to_payload().data.unwrap()["path"], json!("variant.toml"));
    }
}
