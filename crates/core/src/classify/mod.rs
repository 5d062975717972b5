//! Classify module - row-to-tag classification policies.

mod classify_model;
mod classify_service;


pub use classify_model::{ClassifiedPair, ClassifyMode};
pub use classify_service::{classify, classify_aggregated, classify_direct};
