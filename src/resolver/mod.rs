//! Variant resolver
//!
//! Merges the configuration-level defaults with one named build type and
//! derives the auxiliary decisions (multidex, signing, advisories) into a
//! `ResolvedBuildPlan`. Resolution is a pure function of its inputs: it only
//! borrows the configuration and allocates a fresh plan per call.

mod multidex;
mod plan;

pub use multidex::{multidex_required, DEX_METHOD_LIMIT, MULTIDEX_LIBRARY};
pub use plan::{
    Advisory, AdvisoryCode, DigestError, ResolvedBuildPlan, SigningAssignment, SigningSource,
};

use tracing::{debug, warn};
use variant_model::{
    ApplicationIdentity, BoundsError, BuildTypeOverride, Configuration, MultidexPolicy,
};

/// Caller-supplied knobs for a single resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Replaces the configuration's multidex policy when set, e.g. to opt
    /// out or to pass a method-count estimate from the build host
    pub multidex: Option<MultidexPolicy>,
}

/// Resolve-time errors. Only the requested build type is affected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Unknown build type '{name}'; available: {}", .available.join(", "))]
    UnknownBuildType { name: String, available: Vec<String> },

    #[error("Invalid platform bounds for build type '{build_type}': {source}")]
    InvalidBounds {
        build_type: String,
        source: BoundsError,
    },
}

/// Resolve `build_type_name` with default options.
pub fn resolve(
    config: &Configuration,
    build_type_name: &str,
) -> Result<ResolvedBuildPlan, ResolveError> {
    resolve_with(config, build_type_name, &ResolveOptions::default())
}

/// Resolve `build_type_name` against `config`.
pub fn resolve_with(
    config: &Configuration,
    build_type_name: &str,
    options: &ResolveOptions,
) -> Result<ResolvedBuildPlan, ResolveError> {
    let build_type = config
        .build_type(build_type_name)
        .ok_or_else(|| ResolveError::UnknownBuildType {
            name: build_type_name.to_string(),
            available: config
                .build_type_names()
                .into_iter()
                .map(String::from)
                .collect(),
        })?;

    // Fields are public, so a hand-built configuration may never have been
    // through load-time validation.
    let bounds = config.bounds;
    bounds
        .validate()
        .map_err(|source| ResolveError::InvalidBounds {
            build_type: build_type.name.clone(),
            source,
        })?;

    let minify_enabled = build_type
        .minify_enabled
        .unwrap_or(config.defaults.minify_enabled);
    let shrink_resources = build_type
        .shrink_resources
        .unwrap_or(config.defaults.shrink_resources);
    let debuggable = build_type
        .debuggable
        .unwrap_or_else(|| build_type.debuggable_by_default());

    let identity = effective_identity(&config.identity, build_type);
    let signing = assign_signing(config, build_type);

    let policy = options.multidex.unwrap_or(config.multidex);
    let multidex_required = multidex_required(policy);
    let runtime_dependencies = if multidex_required {
        vec![MULTIDEX_LIBRARY.to_string()]
    } else {
        Vec::new()
    };

    let mut advisories = Vec::new();
    if signing.debug_tier && !build_type.is_debug_build_type() {
        warn!(
            build_type = %build_type.name,
            signing_ref = %signing.signing_ref,
            "non-debug build type signed with a debug-tier identity"
        );
        advisories.push(Advisory {
            code: AdvisoryCode::DebugSigningOnRelease,
            message: format!(
                "build type '{}' is not the debug build type but is signed with \
                 debug-tier reference '{}'",
                build_type.name, signing.signing_ref
            ),
        });
    }
    if shrink_resources && !minify_enabled {
        warn!(
            build_type = %build_type.name,
            "resource shrinking enabled without code minification"
        );
        advisories.push(Advisory {
            code: AdvisoryCode::ShrinkWithoutMinify,
            message: format!(
                "build type '{}' shrinks resources but does not minify code; \
                 the host toolchain rejects this combination",
                build_type.name
            ),
        });
    }

    debug!(
        build_type = %build_type.name,
        application_id = %identity.application_id,
        multidex_required,
        advisories = advisories.len(),
        "resolved build plan"
    );

    Ok(ResolvedBuildPlan {
        build_type: build_type.name.clone(),
        identity,
        bounds,
        minify_enabled,
        shrink_resources,
        debuggable,
        signing,
        multidex_required,
        runtime_dependencies,
        toolchain: config.toolchain.clone(),
        advisories,
    })
}

/// Identity with the build type's suffixes applied
fn effective_identity(
    identity: &ApplicationIdentity,
    build_type: &BuildTypeOverride,
) -> ApplicationIdentity {
    let id_suffix = build_type.application_id_suffix.as_deref().unwrap_or("");
    let name_suffix = build_type.version_name_suffix.as_deref().unwrap_or("");

    ApplicationIdentity {
        application_id: identity.application_id_with_suffix(id_suffix),
        namespace: identity.namespace.clone(),
        version_code: identity.version_code,
        version_name: identity.version_name_with_suffix(name_suffix),
    }
}

fn assign_signing(config: &Configuration, build_type: &BuildTypeOverride) -> SigningAssignment {
    let (signing_ref, source) = match &build_type.signing_ref {
        Some(r) => (r.clone(), SigningSource::BuildType),
        None => (config.signing.default_ref.clone(), SigningSource::Default),
    };
    let debug_tier = config.signing.is_debug_tier(&signing_ref);

    SigningAssignment {
        signing_ref,
        source,
        debug_tier,
    }
}
