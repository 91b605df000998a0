//! TreeData Core
//!
//! Materializes a tree of labeled nodes from dotted path records (`"1.4.2"`)
//! into a single relational table, creating missing ancestors as empty
//! placeholders, and reads the tree (or one level of it) back in path order.
//!
//! # Architecture
//!
//! - **Flat table**: every node is a row with an explicit `parent` link and a
//!   materialized, unique `full_position`
//! - **Out-of-order input**: ancestors are created on demand and filled in
//!   later; filled nodes are never overwritten
//! - **libsql**: embedded SQLite-compatible storage behind the `NodeStore` trait
//!
//! # Modules
//!
//! - [`models`] - Nodes, records and path decomposition
//! - [`db`] - Database layer with libsql integration
//! - [`services`] - `TreeBuilder`, `TreeReader`, `RecordLoader`
//! - [`config`] - Runtime configuration
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use treedata_core::{DatabaseService, LibsqlStore, NodeStore, TreeBuilder, TreeReader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Arc::new(DatabaseService::new("./treedata.db".into()).await?);
//!     let store: Arc<dyn NodeStore> = Arc::new(LibsqlStore::new(db));
//!
//!     let builder = TreeBuilder::new(store.clone());
//!     builder.insert("1.4.2", "Chapter", "text").await?;
//!
//!     let reader = TreeReader::new(store);
//!     for node in reader.get_full_tree().await? {
//!         println!("{} {:?}", node.full_position, node.title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod db;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use config::TreeConfig;
pub use db::{DatabaseError, DatabaseService, LibsqlStore, NodeStore};
pub use models::*;
pub use services::*;
