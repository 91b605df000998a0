//! Tree Builder
//!
//! Writes one `(path, title, value)` record into the tree table.
//!
//! Records may arrive in any order. Inserting `"1.4.2"` into an empty table
//! produces:
//!
//! | id | position | parent | full_position | title        |
//! |----|----------|--------|---------------|--------------|
//! | 1  | 1        | NULL   | `1`           | NULL         |
//! | 2  | 4        | 1      | `1.4`         | NULL         |
//! | 3  | 2        | 2      | `1.4.2`       | `"Chapter"`  |
//!
//! A later record for `"1"` fills in row 1 in place instead of adding a row.
//! Once a node has data it is never overwritten; a second record for the
//! same path is rejected with `TreeError::IncorrectData`.

use crate::db::{DatabaseError, NodeStore};
use crate::models::{decompose, NewNode, PathError, PathPolicy, PathSegment};
use crate::services::TreeError;
use std::sync::Arc;

/// Drives path decomposition and the per-prefix store writes
pub struct TreeBuilder {
    store: Arc<dyn NodeStore>,
    policy: PathPolicy,
}

impl TreeBuilder {
    /// Builder with the default (strict) path policy
    pub fn new(store: Arc<dyn NodeStore>) -> Self {
        Self::with_policy(store, PathPolicy::default())
    }

    pub fn with_policy(store: Arc<dyn NodeStore>, policy: PathPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> PathPolicy {
        self.policy
    }

    /// Insert the record and return the id of the node at `path`.
    ///
    /// Ancestors missing from the table are created as placeholders, in
    /// order from the root. Each prefix costs at most one read and one write.
    /// On error no further prefixes of this record are written.
    ///
    /// # Errors
    ///
    /// - `TreeError::InvalidPath` if the path does not decompose
    /// - `TreeError::IncorrectData` if the target already holds data
    /// - `TreeError::Conflict` if a concurrent writer promoted the target
    ///   placeholder between our read and our update
    /// - `TreeError::ConstraintViolation` if a concurrent writer inserted the
    ///   target path between our read and our insert
    /// - `TreeError::Database` for store failures
    pub async fn insert(&self, path: &str, title: &str, value: &str) -> Result<i64, TreeError> {
        let segments = decompose(path, self.policy)?;
        let (target, ancestors) = segments.split_last().ok_or(PathError::Empty)?;

        let mut parent = None;
        for segment in ancestors {
            parent = Some(self.ensure_placeholder(segment, parent).await?);
        }

        self.write_target(target, parent, title, value).await
    }

    /// Id of the node at `segment`, creating an empty one if absent
    async fn ensure_placeholder(
        &self,
        segment: &PathSegment,
        parent: Option<i64>,
    ) -> Result<i64, TreeError> {
        if let Some(existing) = self
            .store
            .find_by_full_position(&segment.full_position)
            .await?
        {
            return Ok(existing.id);
        }

        let node = NewNode::placeholder(segment.position, parent, &segment.full_position);
        match self.store.insert(node).await {
            Ok(id) => {
                tracing::debug!(full_position = %segment.full_position, id, "Created placeholder");
                Ok(id)
            }
            Err(e) if e.is_constraint_violation() => {
                // Someone else created this ancestor first; theirs is as good as ours
                tracing::debug!(
                    full_position = %segment.full_position,
                    "Placeholder created concurrently, reusing"
                );
                self.store
                    .find_by_full_position(&segment.full_position)
                    .await?
                    .map(|existing| existing.id)
                    .ok_or_else(|| TreeError::constraint_violation(&segment.full_position))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_target(
        &self,
        target: &PathSegment,
        parent: Option<i64>,
        title: &str,
        value: &str,
    ) -> Result<i64, TreeError> {
        let full_position = target.full_position.as_str();

        match self.store.find_by_full_position(full_position).await? {
            None => {
                let node =
                    NewNode::materialized(target.position, parent, full_position, title, value);
                match self.store.insert(node).await {
                    Ok(id) => {
                        tracing::debug!(full_position, id, "Inserted node");
                        Ok(id)
                    }
                    Err(DatabaseError::ConstraintViolation { full_position }) => {
                        Err(TreeError::ConstraintViolation { full_position })
                    }
                    Err(e) => Err(e.into()),
                }
            }
            Some(existing) if existing.is_placeholder() => {
                let affected = self
                    .store
                    .update_if_empty(existing.id, title, value)
                    .await?;
                if affected == 0 {
                    return Err(TreeError::conflict(full_position));
                }
                tracing::debug!(full_position, id = existing.id, "Promoted placeholder");
                Ok(existing.id)
            }
            Some(_) => Err(TreeError::incorrect_data(full_position)),
        }
    }
}
