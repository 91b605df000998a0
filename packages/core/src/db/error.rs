//! Errors raised while opening the tree database or running statements
//! against the `tree_data` table.

use std::path::PathBuf;
use thiserror::Error;

/// Database operation errors
///
/// Covers connection, initialization and statement failures. The one
/// store-level integrity failure callers need to tell apart,
/// a duplicate `full_position`, gets its own variant.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The database file could not be opened
    #[error("Failed to connect to database at {path}: {source}")]
    ConnectionFailed {
        path: PathBuf,
        source: libsql::Error,
    },

    /// Table or index creation, or a startup PRAGMA, failed
    #[error("Failed to initialize database schema: {0}")]
    InitializationFailed(String),

    /// The process may not write to the database file's directory
    #[error("Permission denied for database path: {path}")]
    PermissionDenied { path: PathBuf },

    /// The directory that should hold the database file could not be made
    #[error("Failed to create parent directory for database: {0}")]
    DirectoryCreationFailed(#[from] std::io::Error),

    /// Uncategorized libsql failure
    #[error("Database operation failed: {0}")]
    LibsqlError(#[from] libsql::Error),

    /// A prepared or executed statement failed; `context` names the statement
    #[error("SQL execution failed: {context}")]
    SqlExecutionError { context: String },

    /// Unique index on `full_position` rejected an insert
    #[error("A node already exists at position {full_position}")]
    ConstraintViolation { full_position: String },
}

impl DatabaseError {
    pub fn connection_failed(path: PathBuf, source: libsql::Error) -> Self {
        Self::ConnectionFailed { path, source }
    }

    pub fn initialization_failed(msg: impl Into<String>) -> Self {
        Self::InitializationFailed(msg.into())
    }

    pub fn permission_denied(path: PathBuf) -> Self {
        Self::PermissionDenied { path }
    }

    pub fn sql_execution(context: impl Into<String>) -> Self {
        Self::SqlExecutionError {
            context: context.into(),
        }
    }

    pub fn constraint_violation(full_position: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            full_position: full_position.into(),
        }
    }

    /// True when a write collided with an existing `full_position`
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }
}
