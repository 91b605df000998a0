//! Tree Reader
//!
//! Read-only queries over the tree table. Results are in tree order: by
//! `full_position`, compared segment by segment as integers, which is a
//! depth-first pre-order walk of the tree.

use crate::db::NodeStore;
use crate::models::{normalize, NodeWithChildCount, PathPolicy, TreeNode, TreeOutline};
use crate::services::TreeError;
use std::sync::Arc;

pub struct TreeReader {
    store: Arc<dyn NodeStore>,
    policy: PathPolicy,
}

impl TreeReader {
    pub fn new(store: Arc<dyn NodeStore>) -> Self {
        Self::with_policy(store, PathPolicy::default())
    }

    pub fn with_policy(store: Arc<dyn NodeStore>, policy: PathPolicy) -> Self {
        Self { store, policy }
    }

    /// Every node, in tree order
    pub async fn get_full_tree(&self) -> Result<Vec<TreeNode>, TreeError> {
        Ok(self.store.list_all().await?)
    }

    /// Direct children of `parent` (roots when `None`) with their child counts
    pub async fn get_recursive_tree(
        &self,
        parent: Option<i64>,
    ) -> Result<Vec<NodeWithChildCount>, TreeError> {
        Ok(self.store.list_children(parent).await?)
    }

    /// The node at `path`, if any. The path is normalized with the reader's
    /// policy first, so `".1.4."` finds `"1.4"`.
    pub async fn find(&self, path: &str) -> Result<Option<TreeNode>, TreeError> {
        let full_position = normalize(path, self.policy)?;
        Ok(self.store.find_by_full_position(&full_position).await?)
    }

    /// The whole tree as nested outlines, one per root
    pub async fn outline(&self) -> Result<Vec<TreeOutline>, TreeError> {
        let nodes = self.get_full_tree().await?;
        Ok(assemble_outline(nodes))
    }
}

/// Nest nodes that are already in tree order.
///
/// Pre-order guarantees a node's parent is on the stack when the node
/// arrives. A node whose parent is missing becomes a root.
pub fn assemble_outline(nodes: Vec<TreeNode>) -> Vec<TreeOutline> {
    let mut roots = Vec::new();
    let mut stack: Vec<TreeOutline> = Vec::new();

    for node in nodes {
        while stack
            .last()
            .is_some_and(|top| Some(top.node.id) != node.parent)
        {
            if let Some(finished) = stack.pop() {
                attach(&mut stack, &mut roots, finished);
            }
        }
        stack.push(TreeOutline::leaf(node));
    }

    while let Some(finished) = stack.pop() {
        attach(&mut stack, &mut roots, finished);
    }

    roots
}

fn attach(stack: &mut [TreeOutline], roots: &mut Vec<TreeOutline>, finished: TreeOutline) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(finished),
        None => roots.push(finished),
    }
}
