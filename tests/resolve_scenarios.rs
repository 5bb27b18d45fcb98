//! End-to-end resolution scenarios over layered fixture configs

mod fixtures;

use std::thread;

use variant_plan::model::{BoundsError, ConfigError, MultidexPolicy};
use variant_plan::resolver::{AdvisoryCode, SigningSource, MULTIDEX_LIBRARY};
use variant_plan::{
    load_layered, resolve, resolve_with, Configuration, Error, ErrorCode, ResolveError,
    ResolveOptions,
};

fn load(name: &str, assignments: &[&str]) -> Result<Configuration, Error> {
    let path = fixtures::config_path(name);
    let assignments: Vec<String> = assignments.iter().map(|s| s.to_string()).collect();
    load_layered(None, Some(path.as_path()), &assignments).map(|(config, _)| config)
}

#[test]
fn test_release_falls_back_to_debug_key() {
    let config = load("scenario.json", &[]).unwrap();
    let plan = resolve(&config, "release").unwrap();

    assert_eq!(plan.identity.application_id, "com.example.app");
    assert_eq!(plan.bounds.min_sdk, 21);
    assert_eq!(plan.bounds.target_sdk, 34);
    assert_eq!(plan.bounds.compile_sdk, 34);
    assert_eq!(plan.signing.signing_ref, "debug-key");
    assert_eq!(plan.signing.source, SigningSource::Default);
    assert!(plan.signing.debug_tier);
    assert!(plan.multidex_required);
    assert!(plan.has_advisory(AdvisoryCode::DebugSigningOnRelease));
}

#[test]
fn test_min_sdk_override_above_compile_sdk_fails_load() {
    let err = load("scenario.json", &["platform.min_sdk=35"]).unwrap_err();

    assert_eq!(err.code(), ErrorCode::InvalidBounds);
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidBounds(BoundsError::MinAboveTarget {
            min_sdk: 35,
            target_sdk: 34
        }))
    ));
}

#[test]
fn test_duplicate_release_fails_load() {
    let err = load("duplicate_release.toml", &[]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::DuplicateBuildType);
    assert!(err.to_string().contains("release"));
}

#[test]
fn test_unknown_build_type_leaves_others_resolvable() {
    let config = load("store_release.toml", &[]).unwrap();

    let err = resolve(&config, "nonexistent").unwrap_err();
    assert!(matches!(
        err,
        ResolveError::UnknownBuildType { ref name, .. } if name == "nonexistent"
    ));

    assert!(resolve(&config, "release").is_ok());
    assert!(resolve(&config, "debug").is_ok());
}

#[test]
fn test_original_host_app_release() {
    let config = load("monitor_viveiro.toml", &[]).unwrap();

    // SDK levels and version stamp come from the built-in toolchain layer
    let plan = resolve(&config, "release").unwrap();
    assert_eq!(plan.identity.application_id, "com.example.monitor_viveiro");
    assert_eq!(plan.identity.namespace, "com.example.monitor_viveiro");
    assert_eq!(plan.identity.version_code, 1);
    assert_eq!(plan.identity.version_name, "1.0.0");
    assert_eq!(plan.toolchain.java_version, "11");
    assert_eq!(plan.signing.signing_ref, "debug");
    assert_eq!(plan.signing.source, SigningSource::BuildType);
    assert!(plan.has_advisory(AdvisoryCode::DebugSigningOnRelease));
    assert_eq!(plan.runtime_dependencies, vec![MULTIDEX_LIBRARY.to_string()]);

    // The stock debug build type exists without being declared
    let debug = resolve(&config, "debug").unwrap();
    assert!(debug.debuggable);
    assert!(debug.advisories.is_empty());
}

#[test]
fn test_store_release_merge() {
    let config = load("store_release.toml", &[]).unwrap();

    let release = resolve(&config, "release").unwrap();
    assert!(release.minify_enabled);
    assert!(release.shrink_resources);
    assert_eq!(release.signing.signing_ref, "play-upload");
    assert!(!release.signing.debug_tier);
    assert!(release.advisories.is_empty());
    assert_eq!(release.toolchain.ndk_version.as_deref(), Some("27.0.12077973"));

    let debug = resolve(&config, "debug").unwrap();
    assert_eq!(debug.identity.application_id, "com.example.store.debug");
    assert_eq!(debug.identity.version_name, "3.2.1-debug");
    assert!(!debug.minify_enabled);

    // registry-listed debug-tier reference on a build type other than debug
    let staging = resolve(&config, "staging").unwrap();
    assert!(staging.signing.debug_tier);
    assert!(staging.has_advisory(AdvisoryCode::DebugSigningOnRelease));
}

#[test]
fn test_merge_correctness_for_every_build_type() {
    let config = load("store_release.toml", &[]).unwrap();

    for bt in &config.build_types {
        let plan = resolve(&config, &bt.name).unwrap();
        assert_eq!(
            plan.minify_enabled,
            bt.minify_enabled.unwrap_or(config.defaults.minify_enabled)
        );
        assert_eq!(
            plan.shrink_resources,
            bt.shrink_resources.unwrap_or(config.defaults.shrink_resources)
        );
        let expected_ref = bt
            .signing_ref
            .clone()
            .unwrap_or_else(|| config.signing.default_ref.clone());
        assert_eq!(plan.signing.signing_ref, expected_ref);
    }
}

#[test]
fn test_plans_respect_bounds_invariant() {
    for name in ["scenario.json", "monitor_viveiro.toml", "store_release.toml"] {
        let config = load(name, &[]).unwrap();
        for build_type in config.build_type_names() {
            let plan = resolve(&config, build_type).unwrap();
            assert!(plan.bounds.min_sdk <= plan.bounds.target_sdk);
            assert!(plan.bounds.target_sdk <= plan.bounds.compile_sdk);
        }
    }
}

#[test]
fn test_resolution_is_idempotent() {
    let config = load("store_release.toml", &[]).unwrap();
    for build_type in config.build_type_names() {
        let first = resolve(&config, build_type).unwrap();
        let second = resolve(&config, build_type).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.digest().unwrap(), second.digest().unwrap());
    }
}

#[test]
fn test_concurrent_resolutions_share_config() {
    let config = load("store_release.toml", &[]).unwrap();
    let sequential: Vec<_> = config
        .build_type_names()
        .into_iter()
        .map(|name| resolve(&config, name).unwrap())
        .collect();

    let concurrent: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = config
            .build_type_names()
            .into_iter()
            .map(|name| {
                let config = &config;
                scope.spawn(move || resolve(config, name).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, concurrent);
}

#[test]
fn test_multidex_opt_out_and_estimate() {
    let config = load("store_release.toml", &[]).unwrap();

    let opted_out = resolve_with(
        &config,
        "release",
        &ResolveOptions {
            multidex: Some(MultidexPolicy::Never),
        },
    )
    .unwrap();
    assert!(!opted_out.multidex_required);
    assert!(opted_out.runtime_dependencies.is_empty());

    let estimated = resolve_with(
        &config,
        "release",
        &ResolveOptions {
            multidex: Some(MultidexPolicy::Estimate {
                method_count: 120_000,
            }),
        },
    )
    .unwrap();
    assert!(estimated.multidex_required);
}

#[test]
fn test_config_level_multidex_policy() {
    let config = load("scenario.json", &["multidex.policy=never"]).unwrap();
    assert!(!resolve(&config, "release").unwrap().multidex_required);
}

#[test]
fn test_missing_application_id_is_malformed() {
    let err = load("scenario.json", &["app.application_id="]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::MalformedConfig);
    assert_eq!(err.to_payload().data.unwrap()["field"], "app.application_id");
}

#[test]
fn test_quoted_override_keeps_string_value() {
    let config = load(
        "store_release.toml",
        &["app.version_name=\"2\"", "signing.default_ref=\"true\""],
    )
    .unwrap();
    let plan = resolve(&config, "debug").unwrap();

    assert_eq!(plan.identity.version_name, "2-debug");
    assert_eq!(plan.signing.signing_ref, "true");
    assert_eq!(plan.signing.source, SigningSource::Default);
}

#[test]
fn test_unquoted_numeric_override_names_field() {
    let err = load("store_release.toml", &["app.version_name=2"]).unwrap_err();

    assert_eq!(err.code(), ErrorCode::MalformedConfig);
    assert!(matches!(
        err,
        Error::Config(ConfigError::Malformed { ref field, .. }) if field == "app.version_name"
    ));
}
