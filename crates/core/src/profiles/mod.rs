//! Profiles module - shared profile store contract and merge engine.

mod merge_engine;
mod profiles_model;
mod profiles_traits;


pub use merge_engine::{plan_merge, MergePlan};
pub use profiles_model::{
    ProfilePut, ProfileRecord, ProfileStoreConfig, VersionedRow, WriteOutcome,
};
pub use profiles_traits::ProfileStoreTrait;
