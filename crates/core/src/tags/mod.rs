//! Tags module - taxonomy domain models and metadata traits.

mod tags_model;
mod tags_traits;

#[cfg(test)]
mod tags_model_tests;

pub use tags_model::{TagDefinition, TagModel};
pub use tags_traits::TagMetadataRepositoryTrait;
