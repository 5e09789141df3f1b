//! Configuration for descriptor conversion.

use serde::{Deserialize, Serialize};

/// Options for descriptor conversion.
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g., `dedup-required`). This
/// naming convention is part of the public API contract for config files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConvertOptions {
    /// Deduplicate the `required` list produced by intersection merging
    /// (first occurrence wins, order otherwise preserved).
    ///
    /// Off by default: the merged list concatenates each operand's keys in
    /// encounter order, so a key required by two operands appears twice.
    pub dedup_required: bool,
}
