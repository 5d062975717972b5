//! Tagmill Core - Domain entities, services, and traits.
//!
//! This crate contains the tag computation and profile merge engine.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod classify;
pub mod constants;
pub mod errors;
pub mod models;
pub mod profiles;
pub mod rules;
pub mod source;
pub mod tags;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
