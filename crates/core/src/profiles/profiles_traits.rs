//! Traits for the shared profile store.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::Result;

use super::{ProfilePut, VersionedRow, WriteOutcome};

/// Access to the shared wide-column profile store.
///
/// The storage engine itself is an external collaborator; this trait is the
/// whole of the contract the engine relies on. Versions exist so that two
/// models merging overlapping users concurrently cannot silently lose each
/// other's appends: writes are conditional on the version observed at scan
/// time, and conflicts are reported back instead of applied.
#[async_trait]
pub trait ProfileStoreTrait: Send + Sync {
    /// Read the full current snapshot of the family. An empty store is a
    /// legal result (first run ever); a scan failure aborts the run before
    /// any write happens.
    fn scan(&self, table: &str, family: &str) -> Result<HashMap<String, VersionedRow>>;

    /// Apply cell-level upserts, each checked against its expected version.
    /// Conflicting puts are skipped and reported; the rest still land.
    async fn write_checked(
        &self,
        table: &str,
        family: &str,
        puts: Vec<ProfilePut>,
    ) -> Result<WriteOutcome>;
}
