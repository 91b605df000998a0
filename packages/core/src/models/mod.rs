//! Data Models
//!
//! This module contains the data structures used throughout TreeData:
//!
//! - `TreeNode` - One persisted row of the tree table
//! - `NodeWithChildCount`, `TreeOutline` - Read-side shapes for renderers
//! - `TreeRecord` - One input record (path, title, value)
//! - `path` - Dotted path decomposition and tree ordering

mod node;
pub mod path;

pub use node::{NewNode, NodeWithChildCount, TreeNode, TreeOutline, TreeRecord};
pub use path::{
    compare_full_positions, decompose, normalize, PathError, PathPolicy, PathSegment,
    PATH_SEPARATOR,
};
