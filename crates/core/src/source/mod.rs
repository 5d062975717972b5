//! Source module - extraction row model and reader trait.

mod source_model;
mod source_traits;

pub use source_model::SourceRow;
pub use source_traits::{SourceReaderTrait, SourceRows};
