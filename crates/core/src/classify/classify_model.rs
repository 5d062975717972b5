//! Classification outcome types.

use serde::{Deserialize, Serialize};

/// How source rows map onto users for one model.
///
/// Model-specific behavior is data, not code: the same driver runs every
/// model, switching on this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClassifyMode {
    /// One row is one classification (e.g. a per-user attribute table).
    Direct,
    /// Many rows per user are reduced to the dominant classification
    /// (e.g. an order/event table).
    Aggregated,
}

impl ClassifyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifyMode::Direct => "direct",
            ClassifyMode::Aggregated => "aggregated",
        }
    }
}

/// One classification produced by a model run. Transient: consumed by the
/// merge engine, never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedPair {
    pub user_id: String,
    pub tag_id: i64,
}
