//! Load-time errors for the configuration model

use crate::bounds::BoundsError;

/// Errors raised while loading a configuration document.
///
/// All variants are terminal: they stem from caller-provided data and no
/// resolution may proceed from a configuration that failed to load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Malformed config at '{field}': {reason}")]
    Malformed { field: String, reason: String },

    #[error("Invalid platform bounds: {0}")]
    InvalidBounds(#[from] BoundsError),

    #[error("Duplicate build type: '{0}'")]
    DuplicateBuildType(String),
}

impl ConfigError {
    pub(crate) fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Malformed {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field or build type
    pub fn subject(&self) -> &str {
        match self {
            ConfigError::Malformed { field, .. } => field,
            ConfigError::InvalidBounds(err) => err.field(),
            ConfigError::DuplicateBuildType(name) => name,
        }
    }
}
