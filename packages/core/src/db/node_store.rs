//! NodeStore Trait - Persistence Port for the Tree Table
//!
//! The tree builder and reader only ever talk to this trait, so the backing
//! store is injected by the composition root rather than reached through a
//! global connection.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: All methods are async; the libsql backend awaits I/O
//! 2. **One statement per write**: `insert` and `update_if_empty` are each a
//!    single atomic statement, so concurrent writers to the same path cannot
//!    both succeed
//! 3. **Typed errors**: `DatabaseError::ConstraintViolation` lets callers tell a
//!    duplicate `full_position` apart from other failures
//!
//! # Examples
//!
//! ```rust,no_run
//! use treedata_core::db::{DatabaseService, LibsqlStore, NodeStore};
//! use treedata_core::models::NewNode;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Arc::new(DatabaseService::new(PathBuf::from("./treedata.db")).await?);
//!     let store: Arc<dyn NodeStore> = Arc::new(LibsqlStore::new(db));
//!
//!     let id = store.insert(NewNode::placeholder(1, None, "1")).await?;
//!     let node = store.find_by_full_position("1").await?;
//!     assert_eq!(node.map(|n| n.id), Some(id));
//!     Ok(())
//! }
//! ```

use crate::db::DatabaseError;
use crate::models::{NewNode, NodeWithChildCount, TreeNode};
use async_trait::async_trait;

/// Persistence operations over the tree table
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow usage in async contexts where
/// futures may be moved between threads.
#[async_trait]
pub trait NodeStore: Send + Sync {
    /// Look up a node by its full position
    ///
    /// Returns `Ok(None)` when no row has that path.
    async fn find_by_full_position(
        &self,
        full_position: &str,
    ) -> Result<Option<TreeNode>, DatabaseError>;

    /// Insert one row and return its assigned id
    ///
    /// # Errors
    ///
    /// - `DatabaseError::ConstraintViolation` if `full_position` already exists
    /// - Other `DatabaseError`s for statement failures (including a `parent`
    ///   that does not reference an existing row)
    async fn insert(&self, node: NewNode<'_>) -> Result<i64, DatabaseError>;

    /// Set title and value only if both are currently `NULL`
    ///
    /// A single conditional update (compare-and-set on the two nullable
    /// columns). Returns the number of rows affected: `1` if the placeholder
    /// was promoted, `0` if it was already materialized or does not exist.
    async fn update_if_empty(&self, id: i64, title: &str, value: &str)
        -> Result<u64, DatabaseError>;

    /// Direct children of `parent` (roots when `None`), each with its own
    /// child count, in tree order
    async fn list_children(
        &self,
        parent: Option<i64>,
    ) -> Result<Vec<NodeWithChildCount>, DatabaseError>;

    /// Every node in tree order (segment-wise numeric order of `full_position`)
    async fn list_all(&self) -> Result<Vec<TreeNode>, DatabaseError>;
}
