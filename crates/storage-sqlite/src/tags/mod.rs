//! Tag metadata repository backed by the `tags` table.

pub mod model;
pub mod repository;

pub use model::TagDefinitionDB;
pub use repository::TagMetadataRepository;
