//! LibsqlStore - NodeStore Implementation for the libsql Backend
//!
//! Each method opens its own connection through
//! [`DatabaseService::connect_with_timeout`] and drops it before returning,
//! so no connection or lock outlives a single store call.

use crate::db::node_store::NodeStore;
use crate::db::{DatabaseError, DatabaseService, TREE_TABLE};
use crate::models::path::compare_full_positions;
use crate::models::{NewNode, NodeWithChildCount, TreeNode};
use async_trait::async_trait;
use libsql::Row;
use std::sync::Arc;

const NODE_COLUMNS: &str = "id, position, parent, full_position, title, value";

/// NodeStore over a libsql database file
#[derive(Debug, Clone)]
pub struct LibsqlStore {
    db: Arc<DatabaseService>,
}

impl LibsqlStore {
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self { db }
    }

    /// Convert a libsql row to a `TreeNode`
    ///
    /// # Row Format
    ///
    /// Expected columns (in order):
    /// - id (INTEGER)
    /// - position (INTEGER)
    /// - parent (INTEGER, nullable)
    /// - full_position (TEXT)
    /// - title (TEXT, nullable)
    /// - value (TEXT, nullable)
    fn row_to_node(row: &Row) -> Result<TreeNode, DatabaseError> {
        let id: i64 = row.get(0).map_err(|e| decode_error("id", e))?;
        let position: i64 = row.get(1).map_err(|e| decode_error("position", e))?;
        let parent: Option<i64> = row.get(2).map_err(|e| decode_error("parent", e))?;
        let full_position: String = row.get(3).map_err(|e| decode_error("full_position", e))?;
        let title: Option<String> = row.get(4).map_err(|e| decode_error("title", e))?;
        let value: Option<String> = row.get(5).map_err(|e| decode_error("value", e))?;

        let position = u32::try_from(position).map_err(|_| {
            DatabaseError::sql_execution(format!(
                "Stored position {} of node {} is out of range",
                position, id
            ))
        })?;

        Ok(TreeNode {
            id,
            position,
            parent,
            full_position,
            title,
            value,
        })
    }

    /// Same as `row_to_node`, with the child count in column 6
    fn row_to_node_with_count(row: &Row) -> Result<NodeWithChildCount, DatabaseError> {
        let node = Self::row_to_node(row)?;
        let child_count: i64 = row.get(6).map_err(|e| decode_error("childs", e))?;

        Ok(NodeWithChildCount {
            node,
            child_count: u64::try_from(child_count).unwrap_or_default(),
        })
    }
}

fn decode_error(column: &str, e: libsql::Error) -> DatabaseError {
    DatabaseError::sql_execution(format!("Failed to get {}: {}", column, e))
}

fn is_unique_violation(e: &libsql::Error) -> bool {
    e.to_string().contains("UNIQUE constraint failed")
}

#[async_trait]
impl NodeStore for LibsqlStore {
    async fn find_by_full_position(
        &self,
        full_position: &str,
    ) -> Result<Option<TreeNode>, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM {} WHERE full_position = ?",
                NODE_COLUMNS, TREE_TABLE
            ))
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare find query: {}", e))
            })?;

        let mut rows = stmt.query([full_position]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute find query: {}", e))
        })?;

        match rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            Some(row) => Ok(Some(Self::row_to_node(&row)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, node: NewNode<'_>) -> Result<i64, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        conn.execute(
            &format!(
                "INSERT INTO {} (position, parent, full_position, title, value)
                 VALUES (?, ?, ?, ?, ?)",
                TREE_TABLE
            ),
            (
                i64::from(node.position),
                node.parent,
                node.full_position,
                node.title,
                node.value,
            ),
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DatabaseError::constraint_violation(node.full_position)
            } else {
                DatabaseError::sql_execution(format!(
                    "Failed to insert node {}: {}",
                    node.full_position, e
                ))
            }
        })?;

        // Rowid is per-connection, and this connection is ours alone
        Ok(conn.last_insert_rowid())
    }

    async fn update_if_empty(
        &self,
        id: i64,
        title: &str,
        value: &str,
    ) -> Result<u64, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        conn.execute(
            &format!(
                "UPDATE {} SET title = ?, value = ?
                 WHERE id = ? AND title IS NULL AND value IS NULL",
                TREE_TABLE
            ),
            (title, value, id),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to update node {}: {}", id, e))
        })
    }

    async fn list_children(
        &self,
        parent: Option<i64>,
    ) -> Result<Vec<NodeWithChildCount>, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        let filter = if parent.is_some() {
            "p.parent = ?"
        } else {
            "p.parent IS NULL"
        };
        let sql = format!(
            "SELECT p.id, p.position, p.parent, p.full_position, p.title, p.value,
                    (SELECT COUNT(*) FROM {table} c WHERE c.parent = p.id) AS childs
             FROM {table} p WHERE {filter} ORDER BY p.position, p.full_position",
            table = TREE_TABLE,
            filter = filter
        );

        let mut stmt = conn.prepare(&sql).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to prepare list_children query: {}", e))
        })?;

        let mut rows = match parent {
            Some(parent_id) => stmt.query([parent_id]).await,
            None => stmt.query(()).await,
        }
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute list_children query: {}", e))
        })?;

        let mut children = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            children.push(Self::row_to_node_with_count(&row)?);
        }

        Ok(children)
    }

    async fn list_all(&self) -> Result<Vec<TreeNode>, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        let mut rows = conn
            .query(
                &format!(
                    "SELECT {} FROM {} ORDER BY full_position",
                    NODE_COLUMNS, TREE_TABLE
                ),
                (),
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to execute list_all query: {}", e))
            })?;

        let mut nodes = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            nodes.push(Self::row_to_node(&row)?);
        }

        // SQL orders "1.10" before "1.2"; re-sort segment-wise
        nodes.sort_by(|a, b| compare_full_positions(&a.full_position, &b.full_position));

        Ok(nodes)
    }
}
