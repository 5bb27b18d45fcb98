//! Shared fixture paths for integration tests

use std::path::{Path, PathBuf};

/// Path to a config fixture by file name
pub fn config_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/configs")
        .join(name)
}
