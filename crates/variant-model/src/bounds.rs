//! Platform SDK bounds

use serde::{Deserialize, Serialize};

/// SDK API levels the application is built against.
///
/// Invariant: `0 < min_sdk <= target_sdk <= compile_sdk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformBounds {
    pub min_sdk: u32,
    pub target_sdk: u32,
    pub compile_sdk: u32,
}

/// Violation of the SDK ordering invariant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundsError {
    #[error("{field} must be a positive integer, got {value}")]
    NonPositive { field: &'static str, value: i64 },

    #[error("min_sdk {min_sdk} exceeds target_sdk {target_sdk}")]
    MinAboveTarget { min_sdk: u32, target_sdk: u32 },

    #[error("target_sdk {target_sdk} exceeds compile_sdk {compile_sdk}")]
    TargetAboveCompile { target_sdk: u32, compile_sdk: u32 },
}

impl BoundsError {
    /// The field the violation is reported against
    pub fn field(&self) -> &'static str {
        match self {
            BoundsError::NonPositive { field, .. } => field,
            BoundsError::MinAboveTarget { .. } => "min_sdk",
            BoundsError::TargetAboveCompile { .. } => "target_sdk",
        }
    }
}

impl PlatformBounds {
    /// Build bounds from raw document integers, validating the invariant.
    pub fn from_raw(min_sdk: i64, target_sdk: i64, compile_sdk: i64) -> Result<Self, BoundsError> {
        let bounds = Self {
            min_sdk: positive("min_sdk", min_sdk)?,
            target_sdk: positive("target_sdk", target_sdk)?,
            compile_sdk: positive("compile_sdk", compile_sdk)?,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Check the ordering invariant.
    pub fn validate(&self) -> Result<(), BoundsError> {
        for (field, value) in [
            ("min_sdk", self.min_sdk),
            ("target_sdk", self.target_sdk),
            ("compile_sdk", self.compile_sdk),
        ] {
            if value == 0 {
                return Err(BoundsError::NonPositive { field, value: 0 });
            }
        }

        if self.min_sdk > self.target_sdk {
            return Err(BoundsError::MinAboveTarget {
                min_sdk: self.min_sdk,
                target_sdk: self.target_sdk,
            });
        }

        if self.target_sdk > self.compile_sdk {
            return Err(BoundsError::TargetAboveCompile {
                target_sdk: self.target_sdk,
                compile_sdk: self.compile_sdk,
            });
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: i64) -> Result<u32, BoundsError> {
    if value <= 0 {
        return Err(BoundsError::NonPositive { field, value });
    }
    // API levels beyond u32 are not positive integers we can represent
    u32::try_from(value).map_err(|_| BoundsError::NonPositive { field, value })
}
