//! Tree Services
//!
//! This module contains the business logic layered on the `NodeStore`:
//!
//! - `TreeBuilder` - Path-driven insert with placeholder ancestors
//! - `TreeReader` - Full-tree, per-parent and single-node reads
//! - `RecordLoader` - Sequential batch loading with per-record failures
//!
//! Services receive their store at construction; the caller's composition
//! root owns the database lifecycle.

pub mod error;
pub mod record_loader;
pub mod tree_builder;
pub mod tree_reader;

#[cfg(test)]
mod tree_builder_test;

pub use error::TreeError;
pub use record_loader::{LoadReport, LoadedRecord, RecordFailure, RecordLoader};
pub use tree_builder::TreeBuilder;
pub use tree_reader::{assemble_outline, TreeReader};
