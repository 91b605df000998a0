//! TreeData Command-Line Binary
//!
//! Thin front end over `treedata-core` exposing two operations: load a
//! records file into the tree table, and show the tree.
//!
//! # Usage
//!
//! ```bash
//! # Load records (JSON array of {"position", "title", "value"})
//! treedata load data/records.json
//!
//! # Show the whole tree as an indented outline
//! treedata show
//!
//! # Show root-level nodes with their child counts
//! treedata show --roots
//!
//! # Show the children of node 3 with their child counts, as JSON
//! treedata show --parent 3 --json
//! ```
//!
//! # Environment Variables
//!
//! - `TREEDATA_DB`: Database file path (same as `--db`)
//! - `TREEDATA_PATH_POLICY`: `strict` (default) or `lenient`
//! - `TREEDATA_CONFIG`: JSON config file
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

mod args;
mod render;

use anyhow::Context;
use args::{Cli, Command, ShowScope};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use treedata_core::{
    DatabaseService, LibsqlStore, NodeStore, RecordLoader, TreeBuilder, TreeConfig, TreeReader,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = TreeConfig::from_env().context("Failed to resolve configuration")?;
    if let Some(db_path) = cli.db {
        config.database_path = db_path;
    }
    tracing::info!(
        database = %config.database_path.display(),
        policy = %config.path_policy,
        "Opening tree database"
    );

    let db = Arc::new(
        DatabaseService::from_config(&config)
            .await
            .context("Failed to open database")?,
    );
    let store: Arc<dyn NodeStore> = Arc::new(LibsqlStore::new(db.clone()));

    match cli.command {
        Command::Load { file } => {
            let builder = TreeBuilder::with_policy(store, config.path_policy);
            load(&builder, &file).await?;
        }
        Command::Show {
            roots,
            parent,
            json,
        } => {
            let reader = TreeReader::with_policy(store, config.path_policy);
            show(&reader, ShowScope::from_flags(roots, parent), json).await?;
        }
    }

    db.close().await.context("Failed to checkpoint database")?;
    Ok(())
}

async fn load(builder: &TreeBuilder, file: &Path) -> anyhow::Result<()> {
    let contents = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let records = RecordLoader::parse_records(&contents)
        .with_context(|| format!("Failed to parse records in {}", file.display()))?;

    let report = RecordLoader::new(builder).load(records).await;

    for failure in &report.failures {
        println!("Error: {}", failure.error);
    }
    println!(
        "Loaded {} of {} records ({} rejected)",
        report.inserted.len(),
        report.total(),
        report.failures.len()
    );

    Ok(())
}

async fn show(reader: &TreeReader, scope: ShowScope, json: bool) -> anyhow::Result<()> {
    let parent = match scope {
        ShowScope::All => {
            if json {
                let rows = reader.get_full_tree().await?;
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                let outline = reader.outline().await?;
                print!("{}", render::render_outline(&outline));
            }
            return Ok(());
        }
        ShowScope::Roots => None,
        ShowScope::Children(id) => Some(id),
    };

    let rows = reader.get_recursive_tree(parent).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", render::render_level(&rows));
    }
    Ok(())
}
