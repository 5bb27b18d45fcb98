//! Configuration model for Android build variants.
//!
//! Immutable value objects describing an application's identity, its
//! platform SDK bounds and the named build-type overrides, plus the
//! `Configuration::load` entry point that parses and validates them.

mod bounds;
mod build_type;
mod configuration;
mod document;
mod error;
mod identity;
mod policy;

pub use bounds::{BoundsError, PlatformBounds};
pub use build_type::{BuildTypeDefaults, BuildTypeOverride};
pub use configuration::Configuration;
pub use document::{
    BuildTypeEntry, ConfigDocument, DefaultsSection, IdentitySection, PlatformSection,
    SigningSection,
};
pub use error::ConfigError;
pub use identity::{is_reverse_domain, ApplicationIdentity};
pub use policy::{MultidexPolicy, SigningPolicy, ToolchainPins};
