//! Configuration layering
//!
//! Assembles the document handed to `Configuration::load` from four layers,
//! lowest precedence first:
//! 1. Built-in toolchain defaults
//! 2. Host config (`--host-config`)
//! 3. Project config (`variant.toml`)
//! 4. CLI `--set` overrides

mod defaults;
mod layers;
mod merge;

pub use defaults::{BuiltinDefaults, STOCK_BUILD_TYPES};
pub use layers::{
    overrides_from_assignments, parse_assignment, LayerError, LayerOrigin, LayerSource,
    LayeredDocument,
};
pub use merge::{deep_merge, merge_layers};
