//! Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "treedata")]
#[command(version, about = "Load and show dotted-path trees", long_about = None)]
pub struct Cli {
    /// Database file (overrides the configured path)
    #[arg(long, global = true, env = "TREEDATA_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Load records from a JSON array of {"position", "title", "value"}
    Load { file: PathBuf },

    /// Show the tree (whole outline by default)
    Show {
        /// Root-level nodes with their child counts
        #[arg(long, conflicts_with = "parent")]
        roots: bool,

        /// Direct children of this node id with their child counts
        #[arg(long)]
        parent: Option<i64>,

        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },
}

/// What `show` prints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowScope {
    All,
    Roots,
    Children(i64),
}

impl ShowScope {
    pub fn from_flags(roots: bool, parent: Option<i64>) -> Self {
        match (roots, parent) {
            (_, Some(id)) => ShowScope::Children(id),
            (true, None) => ShowScope::Roots,
            (false, None) => ShowScope::All,
        }
    }
}
