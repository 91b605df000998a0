//! Tree Node Data Structures
//!
//! One row of the `tree_data` table is a [`TreeNode`]. A node whose title and
//! value are both `NULL` is a *placeholder*: it exists only because some
//! descendant path referenced it. The first write that supplies data for the
//! exact path promotes it; after that the node is never modified again.
//!
//! # Examples
//!
//! ```rust
//! use treedata_core::models::TreeNode;
//!
//! let node = TreeNode {
//!     id: 3,
//!     position: 2,
//!     parent: Some(2),
//!     full_position: "1.4.2".to_string(),
//!     title: Some("Chapter".to_string()),
//!     value: Some("text".to_string()),
//! };
//! assert!(!node.is_placeholder());
//! assert_eq!(node.depth(), 3);
//! ```

use crate::models::path::PATH_SEPARATOR;
use serde::{Deserialize, Serialize};

/// A persisted tree node.
///
/// # Fields
///
/// - `id`: Surrogate identifier assigned by the store on creation
/// - `position`: The node's own segment relative to its parent
/// - `parent`: Parent node id, `None` for root-level nodes
/// - `full_position`: Dot-joined path from the root, unique per node
/// - `title` / `value`: Payload, both `None` for placeholders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: i64,
    pub position: u32,
    pub parent: Option<i64>,
    pub full_position: String,
    pub title: Option<String>,
    pub value: Option<String>,
}

impl TreeNode {
    /// True while no data has been written for this exact path
    pub fn is_placeholder(&self) -> bool {
        self.title.is_none() && self.value.is_none()
    }

    /// True once a title or value is present
    pub fn is_materialized(&self) -> bool {
        !self.is_placeholder()
    }

    /// True for root-level nodes
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Number of segments in the full position (roots have depth 1)
    pub fn depth(&self) -> usize {
        self.full_position.split(PATH_SEPARATOR).count()
    }
}

/// A node annotated with the number of its direct children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeWithChildCount {
    #[serde(flatten)]
    pub node: TreeNode,

    #[serde(rename = "childs")]
    pub child_count: u64,
}

/// Parameters for a single row insert (avoids too-many-arguments lint)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewNode<'a> {
    pub position: u32,
    pub parent: Option<i64>,
    pub full_position: &'a str,
    pub title: Option<&'a str>,
    pub value: Option<&'a str>,
}

impl<'a> NewNode<'a> {
    /// Row for an ancestor that has no data yet
    pub fn placeholder(position: u32, parent: Option<i64>, full_position: &'a str) -> Self {
        Self {
            position,
            parent,
            full_position,
            title: None,
            value: None,
        }
    }

    /// Row carrying the data for its exact path
    pub fn materialized(
        position: u32,
        parent: Option<i64>,
        full_position: &'a str,
        title: &'a str,
        value: &'a str,
    ) -> Self {
        Self {
            position,
            parent,
            full_position,
            title: Some(title),
            value: Some(value),
        }
    }
}

/// One input record: the path and the data for the node at that exact path.
///
/// Matches the `{ "position": "1.4.2", "title": "...", "value": "..." }`
/// shape of the records files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeRecord {
    pub position: String,
    pub title: String,
    pub value: String,
}

impl TreeRecord {
    pub fn new(
        position: impl Into<String>,
        title: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            position: position.into(),
            title: title.into(),
            value: value.into(),
        }
    }
}

/// A node together with its nested children, in tree order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeOutline {
    pub node: TreeNode,
    pub children: Vec<TreeOutline>,
}

impl TreeOutline {
    pub fn leaf(node: TreeNode) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }

    /// Total number of nodes in this subtree, including the node itself
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeOutline::node_count).sum::<usize>()
    }
}
