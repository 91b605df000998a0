//! Database Layer
//!
//! This module handles all database interactions using libsql:
//!
//! - Database initialization and connection management (`DatabaseService`)
//! - The `NodeStore` persistence port used by the tree services
//! - `LibsqlStore`, the libsql implementation of `NodeStore`
//!
//! # Architecture
//!
//! All nodes live in one table, `tree_data`:
//!
//! | column          | type                         |
//! |-----------------|------------------------------|
//! | `id`            | INTEGER PRIMARY KEY          |
//! | `position`      | INTEGER NOT NULL             |
//! | `parent`        | INTEGER NULL → `tree_data.id` |
//! | `full_position` | TEXT NOT NULL, unique index  |
//! | `title`         | TEXT NULL                    |
//! | `value`         | TEXT NULL                    |

mod database;
mod error;
mod libsql_store;
mod node_store;

pub use database::{DatabaseService, TREE_TABLE};
pub use error::DatabaseError;
pub use libsql_store::LibsqlStore;
pub use node_store::NodeStore;
