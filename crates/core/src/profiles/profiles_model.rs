//! Profile store domain models.

use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};

use crate::constants::{
    PROFILE_FAMILY, PROFILE_KEY_PREFIX, PROFILE_TABLE, TAG_IDS_QUALIFIER, TAG_IDS_SEPARATOR,
    USER_ID_QUALIFIER,
};

/// Where and how profiles live in the shared wide-column store.
///
/// Constructed once per process (or per run) and passed explicitly to the
/// driver; nothing here is global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStoreConfig {
    pub table: String,
    pub family: String,
    /// Row-key prefix disambiguating user profiles from other record kinds
    /// sharing the store's key space.
    pub key_prefix: String,
    pub user_id_qualifier: String,
    pub tag_ids_qualifier: String,
}

impl Default for ProfileStoreConfig {
    fn default() -> Self {
        ProfileStoreConfig {
            table: PROFILE_TABLE.to_string(),
            family: PROFILE_FAMILY.to_string(),
            key_prefix: PROFILE_KEY_PREFIX.to_string(),
            user_id_qualifier: USER_ID_QUALIFIER.to_string(),
            tag_ids_qualifier: TAG_IDS_QUALIFIER.to_string(),
        }
    }
}

impl ProfileStoreConfig {
    /// Defaults overridable through `TAGMILL_PROFILE_*` environment
    /// variables.
    pub fn from_env() -> Self {
        let defaults = ProfileStoreConfig::default();
        ProfileStoreConfig {
            table: env::var("TAGMILL_PROFILE_TABLE").unwrap_or(defaults.table),
            family: env::var("TAGMILL_PROFILE_FAMILY").unwrap_or(defaults.family),
            key_prefix: env::var("TAGMILL_PROFILE_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            user_id_qualifier: env::var("TAGMILL_PROFILE_USER_QUALIFIER")
                .unwrap_or(defaults.user_id_qualifier),
            tag_ids_qualifier: env::var("TAGMILL_PROFILE_TAGS_QUALIFIER")
                .unwrap_or(defaults.tag_ids_qualifier),
        }
    }

    pub fn row_key(&self, user_id: &str) -> String {
        format!("{}{}", self.key_prefix, user_id)
    }
}

/// One stored row with its optimistic-concurrency version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionedRow {
    pub version: i64,
    pub cells: HashMap<String, String>,
}

/// A staged cell-level upsert. Qualifiers not listed keep their stored
/// values, matching wide-column put semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePut {
    pub row_key: String,
    /// `None` means the row must not exist yet; `Some(v)` means the stored
    /// version must still be `v` for the put to apply.
    pub expected_version: Option<i64>,
    pub cells: HashMap<String, String>,
}

/// Result of a checked write: how many rows landed, and which row keys lost
/// their version check and need a re-merge.
#[derive(Debug, Clone, Default)]
pub struct WriteOutcome {
    pub written: usize,
    pub conflicts: Vec<String>,
}

/// The per-user accumulation of every tag id assigned across all models.
///
/// Tag ids are kept as stored strings: the merge must never drop an entry it
/// does not recognize, so no numeric round-trip happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    pub user_id: String,
    pub tag_ids: Vec<String>,
}

impl ProfileRecord {
    pub fn new(user_id: &str) -> Self {
        ProfileRecord {
            user_id: user_id.to_string(),
            tag_ids: Vec::new(),
        }
    }

    /// Rebuild a record from stored cells. A missing or empty tag-ids cell
    /// is an empty list.
    pub fn from_cells(
        user_id: &str,
        cells: &HashMap<String, String>,
        tag_ids_qualifier: &str,
    ) -> Self {
        let tag_ids = cells
            .get(tag_ids_qualifier)
            .map(|joined| {
                joined
                    .split(TAG_IDS_SEPARATOR)
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        ProfileRecord {
            user_id: user_id.to_string(),
            tag_ids,
        }
    }

    /// Exact membership on the parsed list. A substring check would
    /// false-positive when one tag id is a prefix of another.
    pub fn contains_tag(&self, tag_id: &str) -> bool {
        self.tag_ids.iter().any(|t| t == tag_id)
    }

    /// Append at the end, preserving order of appearance.
    pub fn append_tag(&mut self, tag_id: String) {
        self.tag_ids.push(tag_id);
    }

    pub fn joined_tag_ids(&self) -> String {
        self.tag_ids.join(TAG_IDS_SEPARATOR)
    }

    pub fn to_cells(&self, config: &ProfileStoreConfig) -> HashMap<String, String> {
        let mut cells = HashMap::with_capacity(2);
        cells.insert(config.user_id_qualifier.clone(), self.user_id.clone());
        cells.insert(config.tag_ids_qualifier.clone(), self.joined_tag_ids());
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_key_prepends_configured_prefix() {
        let config = ProfileStoreConfig::default();
        assert_eq!(config.row_key("U1"), "user:U1");
    }

    #[test]
    fn from_cells_parses_and_trims_tag_list() {
        let mut cells = HashMap::new();
        cells.insert("tagIds".to_string(), "90, 143 ,,144".to_string());

        let record = ProfileRecord::from_cells("U1", &cells, "tagIds");
        assert_eq!(record.tag_ids, vec!["90", "143", "144"]);
        assert!(record.contains_tag("143"));
        assert!(!record.contains_tag("14"));
        assert_eq!(record.joined_tag_ids(), "90,143,144");
    }

    #[test]
    fn missing_tag_cell_is_an_empty_record() {
        let record = ProfileRecord::from_cells("U1", &HashMap::new(), "tagIds");
        assert!(record.tag_ids.is_empty());
    }
}
