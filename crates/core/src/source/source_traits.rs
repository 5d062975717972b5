//! Traits for source extraction.

use crate::rules::SourceDescriptor;
use crate::Result;

use super::SourceRow;

/// Lazy, restartable sequence of source rows. Row counts are unbounded; the
/// reader is expected to stream or spill rather than require the engine to
/// hold everything at once.
pub type SourceRows = Box<dyn Iterator<Item = SourceRow> + Send>;

/// Extraction against the source table described by a parsed rule.
pub trait SourceReaderTrait: Send + Sync {
    /// Execute the described extraction. Filter predicates are applied by
    /// the reader; re-reading an unchanged source yields the identical
    /// sequence, which is what makes re-runs idempotent.
    ///
    /// A descriptor naming a table or family that does not exist fails with
    /// `SourceError::TableMissing`. That is mis-configuration, not a
    /// transient fault, so the caller must not retry.
    fn read(&self, descriptor: &SourceDescriptor) -> Result<SourceRows>;
}
