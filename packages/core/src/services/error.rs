//! Service Layer Error Types
//!
//! This module defines error types for tree operations. Every variant except
//! `Database` is a per-record failure: a batch loader reports it and moves on
//! to the next record.

use crate::db::DatabaseError;
use crate::models::PathError;
use thiserror::Error;

/// Tree operation errors
#[derive(Error, Debug)]
pub enum TreeError {
    /// Malformed path string
    #[error("Invalid path: {0}")]
    InvalidPath(#[from] PathError),

    /// A materialized node already occupies the target path
    #[error("Cannot add {full_position}: a non-empty element already exists at this position")]
    IncorrectData { full_position: String },

    /// Lost a race to promote the same placeholder
    #[error("Conflict promoting {full_position}: the placeholder was filled concurrently")]
    Conflict { full_position: String },

    /// Lost a race to insert the same full position
    #[error("Conflict inserting {full_position}: the position was created concurrently")]
    ConstraintViolation { full_position: String },

    /// Store failure (unavailable database, SQL error)
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),
}

impl TreeError {
    /// Create an incorrect data error
    pub fn incorrect_data(full_position: impl Into<String>) -> Self {
        Self::IncorrectData {
            full_position: full_position.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(full_position: impl Into<String>) -> Self {
        Self::Conflict {
            full_position: full_position.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint_violation(full_position: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            full_position: full_position.into(),
        }
    }

    /// True for concurrency losses the caller may retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::ConstraintViolation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(TreeError::conflict("1").is_retryable());
        assert!(TreeError::constraint_violation("1").is_retryable());
        assert!(!TreeError::incorrect_data("1").is_retryable());
        assert!(!TreeError::from(PathError::Empty).is_retryable());
    }

    #[test]
    fn test_messages_name_the_position() {
        let err = TreeError::incorrect_data("1.4.2");
        assert_eq!(
            err.to_string(),
            "Cannot add 1.4.2: a non-empty element already exists at this position"
        );
    }
}
