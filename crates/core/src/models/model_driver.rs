//! Model run orchestration.
//!
//! One invocation per tag model:
//! load metadata, parse the rule, read the source, classify, then merge into
//! the shared profile store. Every step is a hard precondition for the next;
//! the first failure ends the run.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::classify::{classify, ClassifiedPair};
use crate::constants::MAX_MERGE_ATTEMPTS;
use crate::errors::{ConfigurationError, StoreError};
use crate::profiles::{plan_merge, ProfileStoreConfig, ProfileStoreTrait};
use crate::rules::{parse_rule, RuleSet};
use crate::source::SourceReaderTrait;
use crate::tags::{TagMetadataRepositoryTrait, TagModel};
use crate::Result;

use super::{ModelRunSummary, TagModelConfig};

/// Drives tag model runs against injected collaborators.
///
/// All state for a run is built inside `run` and dropped on every exit
/// path; the driver itself holds only shared handles and can be reused
/// across runs.
pub struct ModelDriver {
    metadata: Arc<dyn TagMetadataRepositoryTrait>,
    reader: Arc<dyn SourceReaderTrait>,
    store: Arc<dyn ProfileStoreTrait>,
    profile_config: ProfileStoreConfig,
}

impl ModelDriver {
    pub fn new(
        metadata: Arc<dyn TagMetadataRepositoryTrait>,
        reader: Arc<dyn SourceReaderTrait>,
        store: Arc<dyn ProfileStoreTrait>,
        profile_config: ProfileStoreConfig,
    ) -> Self {
        ModelDriver {
            metadata,
            reader,
            store,
            profile_config,
        }
    }

    pub async fn run(&self, model: &TagModelConfig) -> Result<ModelRunSummary> {
        info!(
            "running {} model for tag {}",
            model.mode.as_str(),
            model.tag_id
        );

        // LoadMetadata
        let definitions = self.metadata.load_model(model.tag_id)?;
        let tag_model = TagModel::from_definitions(model.tag_id, definitions)?;

        // ParseRule
        let descriptor = parse_rule(tag_model.rule_text())?;
        let rules = RuleSet::from_leaves(&tag_model.leaves)?;
        debug!(
            "tag {}: {} rules against {}/{}",
            model.tag_id,
            rules.len(),
            descriptor.table,
            descriptor.family
        );
        let user_column = descriptor
            .user_id_column()
            .ok_or_else(|| ConfigurationError::MissingField("user id column".to_string()))?
            .to_string();
        let classify_column = descriptor
            .classify_column()
            .ok_or_else(|| {
                ConfigurationError::MissingField("classification column".to_string())
            })?
            .to_string();

        // ReadSource + Classify
        let rows = self.reader.read(&descriptor)?;
        let pairs = classify(model.mode, rows, &rules, &user_column, &classify_column);

        let mut summary = ModelRunSummary {
            tag_id: model.tag_id,
            pairs: pairs.len(),
            ..Default::default()
        };

        if pairs.is_empty() {
            info!("model for tag {} classified no users", model.tag_id);
            return Ok(summary);
        }

        self.merge(pairs, &mut summary).await?;

        info!(
            "model for tag {} done: {} pairs, {} created, {} appended, {} skipped",
            model.tag_id, summary.pairs, summary.created, summary.appended, summary.skipped
        );
        Ok(summary)
    }

    /// ScanExisting → Merge → Write, retrying contended rows.
    ///
    /// The full snapshot is read before any write; conflicted rows are
    /// re-scanned and re-planned so that a concurrent model's append is
    /// folded in rather than overwritten.
    async fn merge(
        &self,
        pairs: Vec<ClassifiedPair>,
        summary: &mut ModelRunSummary,
    ) -> Result<()> {
        let table = &self.profile_config.table;
        let family = &self.profile_config.family;
        let mut pending = pairs;

        for attempt in 1..=MAX_MERGE_ATTEMPTS {
            let existing = self.store.scan(table, family)?;
            let plan = plan_merge(&self.profile_config, &existing, &pending);
            summary.skipped += plan.skipped;

            if plan.is_empty() {
                return Ok(());
            }

            let puts = plan.puts;
            summary.write_attempts += 1;
            let outcome = self.store.write_checked(table, family, puts.clone()).await?;

            let conflicted: HashSet<&str> =
                outcome.conflicts.iter().map(String::as_str).collect();
            for put in &puts {
                if conflicted.contains(put.row_key.as_str()) {
                    continue;
                }
                if put.expected_version.is_none() {
                    summary.created += 1;
                } else {
                    summary.appended += 1;
                }
            }

            if conflicted.is_empty() {
                return Ok(());
            }

            warn!(
                "merge attempt {}/{} left {} contended rows",
                attempt,
                MAX_MERGE_ATTEMPTS,
                conflicted.len()
            );
            pending.retain(|pair| {
                conflicted.contains(self.profile_config.row_key(&pair.user_id).as_str())
            });
        }

        let conflicts = pending.len();
        Err(StoreError::ConflictRetriesExhausted {
            attempts: MAX_MERGE_ATTEMPTS,
            conflicts,
        }
        .into())
    }
}
