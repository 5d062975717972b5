//! Merge planning.
//!
//! The merge is a pure function over (existing snapshot, incoming pairs):
//! it stages writes for exactly the rows this run changes and nothing else.
//! Reading the whole snapshot first and writing only the changed subset
//! bounds a single model's blast radius while letting tags from independent
//! models accumulate on the same profile row.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use log::info;

use crate::classify::ClassifiedPair;

use super::{ProfilePut, ProfileRecord, ProfileStoreConfig, VersionedRow};

/// Staged writes plus counters for the run summary.
#[derive(Debug, Clone, Default)]
pub struct MergePlan {
    pub puts: Vec<ProfilePut>,
    pub created: usize,
    pub appended: usize,
    pub skipped: usize,
}

impl MergePlan {
    pub fn is_empty(&self) -> bool {
        self.puts.is_empty()
    }
}

struct PlannedRow {
    expected_version: Option<i64>,
    record: ProfileRecord,
    dirty: bool,
}

/// Combine freshly classified pairs with the existing snapshot.
///
/// Per pair: no existing row creates one with just this tag; a row already
/// holding the tag is skipped (re-running an unchanged model is a no-op);
/// otherwise the tag id is appended at the end. Only created or modified
/// rows are returned.
pub fn plan_merge(
    config: &ProfileStoreConfig,
    existing: &HashMap<String, VersionedRow>,
    incoming: &[ClassifiedPair],
) -> MergePlan {
    let mut order: Vec<String> = Vec::new();
    let mut planned: HashMap<String, PlannedRow> = HashMap::new();
    let mut plan = MergePlan::default();

    for pair in incoming {
        let row_key = config.row_key(&pair.user_id);
        let staged = match planned.entry(row_key.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                order.push(row_key.clone());
                let staged = match existing.get(&row_key) {
                    Some(row) => PlannedRow {
                        expected_version: Some(row.version),
                        record: ProfileRecord::from_cells(
                            &pair.user_id,
                            &row.cells,
                            &config.tag_ids_qualifier,
                        ),
                        dirty: false,
                    },
                    None => PlannedRow {
                        expected_version: None,
                        record: ProfileRecord::new(&pair.user_id),
                        dirty: false,
                    },
                };
                entry.insert(staged)
            }
        };

        let tag_id = pair.tag_id.to_string();
        if staged.record.contains_tag(&tag_id) {
            info!("user {} already carries tag {}", pair.user_id, tag_id);
            plan.skipped += 1;
            continue;
        }

        let creating = staged.expected_version.is_none() && staged.record.tag_ids.is_empty();
        staged.record.append_tag(tag_id);
        staged.dirty = true;
        if creating {
            plan.created += 1;
        } else {
            plan.appended += 1;
        }
    }

    for row_key in order {
        if let Some(staged) = planned.remove(&row_key) {
            if !staged.dirty {
                continue;
            }
            plan.puts.push(ProfilePut {
                row_key,
                expected_version: staged.expected_version,
                cells: staged.record.to_cells(config),
            });
        }
    }

    plan
}
