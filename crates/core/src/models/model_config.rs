//! Model run configuration and summary.

use serde::{Deserialize, Serialize};

use crate::classify::ClassifyMode;

/// Everything that distinguishes one tag model from another.
///
/// One configuration record per model, consumed by the single generic
/// driver; the rest of a model's shape (source location, columns, rules)
/// lives in the tag metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagModelConfig {
    /// Id of the level-4 tag this model computes.
    pub tag_id: i64,
    pub mode: ClassifyMode,
}

/// What one model run did. Zero pairs is a successful run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRunSummary {
    pub tag_id: i64,
    /// Classified (user, tag) pairs produced by this run.
    pub pairs: usize,
    /// Profile rows created for users seen for the first time.
    pub created: usize,
    /// Existing profile rows that gained this model's tag.
    pub appended: usize,
    /// Pairs skipped because the profile already carried the tag.
    pub skipped: usize,
    /// How many checked writes the merge needed (conflict retries included).
    pub write_attempts: u32,
}
