//! Plan report envelope
//!
//! Wraps a resolved plan with schema identity, a content digest and the
//! configuration layers it was resolved from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::LayerSource;
use crate::resolver::{DigestError, ResolvedBuildPlan};

/// Schema version for plan reports
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "variant-plan/plan@1";

/// Resolved plan with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    pub schema_version: u32,
    pub schema_id: String,

    /// When the report was produced; not part of `plan_digest`
    pub created_at: DateTime<Utc>,

    pub build_type: String,

    /// SHA-256 of the canonical plan; equal inputs give equal digests
    pub plan_digest: String,

    pub plan: ResolvedBuildPlan,

    /// Contributing configuration layers in precedence order
    pub sources: Vec<LayerSource>,
}

impl PlanReport {
    pub fn new(plan: ResolvedBuildPlan, sources: Vec<LayerSource>) -> Result<Self, DigestError> {
        let plan_digest = plan.digest()?;
        Ok(Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            build_type: plan.build_type.clone(),
            plan_digest,
            plan,
            sources,
        })
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable rendering
    pub fn to_human(&self) -> String {
        let mut out = self.plan.to_human();
        out.push_str(&format!("  Plan digest: {}\n", self.plan_digest));
        out
    }
}
