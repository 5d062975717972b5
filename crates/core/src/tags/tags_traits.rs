//! Traits for tag metadata lookup.

use crate::Result;

use super::TagDefinition;

/// Repository trait for tag metadata lookup.
///
/// The backing store is owned by the administration layer; this engine only
/// reads from it.
pub trait TagMetadataRepositoryTrait: Send + Sync {
    /// Load a level-4 tag plus its direct level-5 children, ordered by level
    /// ascending so the level-4 parent comes first.
    fn load_model(&self, tag_id: i64) -> Result<Vec<TagDefinition>>;
}
