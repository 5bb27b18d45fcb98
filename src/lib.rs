//! variant-plan - build-variant configuration resolver
//!
//! Resolves an Android application's declarative build configuration into a
//! per-build-type plan: effective SDK bounds, package identifier, version
//! stamp, multidex policy and signing assignment. Compiling, packaging and
//! signing are left to the build host that consumes the plan.

pub mod config;
pub mod error;
pub mod report;
pub mod resolver;

pub use variant_model as model;

pub use config::{LayerSource, LayeredDocument};
pub use error::{Error, ErrorCode, ErrorPayload};
pub use report::PlanReport;
pub use resolver::{resolve, resolve_with, ResolveError, ResolveOptions, ResolvedBuildPlan};
pub use variant_model::{ConfigError, Configuration};

use std::path::Path;

/// Merge all layers and load the resulting configuration.
pub fn load_layered(
    host_config_path: Option<&Path>,
    project_config_path: Option<&Path>,
    assignments: &[String],
) -> Result<(Configuration, Vec<LayerSource>), Error> {
    let cli = config::overrides_from_assignments(assignments)?;
    let layered = LayeredDocument::build(host_config_path, project_config_path, cli)?;
    let configuration = layered.load()?;
    Ok((configuration, layered.sources))
}
