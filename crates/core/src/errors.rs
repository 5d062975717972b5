//! Core error types for the tagmill engine.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage
//! layer. None of these are recovered locally; a failed model run surfaces
//! its error to the caller instead of silently skipping.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the tag computation engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Model configuration invalid: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Rule parsing failed: {0}")]
    Rule(#[from] RuleError),

    #[error("Source extraction failed: {0}")]
    Source(#[from] SourceError),

    #[error("Profile store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Database-agnostic error type for metadata storage operations.
///
/// Uses `String` for all error details, allowing the storage layer to convert
/// storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Fatal metadata problems detected before any source row is read.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Tag {0} has no metadata")]
    TagNotFound(i64),

    #[error("Tag {0} carries no rule text")]
    MissingRule(i64),

    #[error("Tag {0} has no leaf tags to classify into")]
    NoChildren(i64),

    #[error("Tag {tag_id} is not a level-4 tag (level {level})")]
    NotAModelTag { tag_id: i64, level: i32 },

    #[error("Leaf tag {0} has an empty match value")]
    EmptyMatchValue(i64),

    #[error("Match value '{value}' is claimed by both tag {first} and tag {second}")]
    DuplicateMatchValue {
        value: String,
        first: i64,
        second: i64,
    },

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Malformed or unsupported level-4 rule text.
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Rule text is empty")]
    Empty,

    #[error("Rule segment '{0}' is not a key=value pair")]
    Malformed(String),

    #[error("Rule is missing required key '{0}'")]
    MissingKey(&'static str),

    #[error("Source kind '{0}' is not supported")]
    UnsupportedSourceKind(String),

    #[error("Filter '{0}' is not a column=value predicate")]
    InvalidFilter(String),
}

/// Source table extraction failures. Fatal: the source is assumed
/// mis-configured, not transiently down, so no retry is attempted.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Source table '{table}' (family '{family}') does not exist")]
    TableMissing { table: String, family: String },

    #[error("Source read failed: {0}")]
    ReadFailed(String),
}

/// Profile store scan/write failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Profile scan failed: {0}")]
    ScanFailed(String),

    #[error("Profile write failed: {0}")]
    WriteFailed(String),

    #[error("Merge gave up after {attempts} attempts; {conflicts} rows still contended")]
    ConflictRetriesExhausted { attempts: u32, conflicts: usize },
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
