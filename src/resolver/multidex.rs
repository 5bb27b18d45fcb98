//! Secondary-dex linking decision

use variant_model::MultidexPolicy;

/// Method references addressable by a single dex file (16-bit index)
pub const DEX_METHOD_LIMIT: u64 = 65_536;

/// Runtime library the host links in when multidex is enabled
pub const MULTIDEX_LIBRARY: &str = "androidx.multidex:multidex:2.0.1";

/// Decide whether secondary-dex linking is required under `policy`.
pub fn multidex_required(policy: MultidexPolicy) -> bool {
    match policy {
        MultidexPolicy::Always => true,
        MultidexPolicy::Never => false,
        MultidexPolicy::Estimate { method_count } => method_count > DEX_METHOD_LIMIT,
    }
}
