//! Record Loader
//!
//! Feeds a sequence of records through the [`TreeBuilder`] one at a time.
//! Records are applied sequentially because a later record may target a
//! placeholder that an earlier one created. A failing record is logged and
//! collected in the [`LoadReport`]; it never stops the batch.

use crate::models::TreeRecord;
use crate::services::{TreeBuilder, TreeError};

/// A record that was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRecord {
    pub index: usize,
    pub position: String,
    pub id: i64,
}

/// A record that was rejected
#[derive(Debug)]
pub struct RecordFailure {
    /// Index of the record in the input sequence
    pub index: usize,
    pub position: String,
    pub error: TreeError,
}

/// Outcome of a batch load
#[derive(Debug, Default)]
pub struct LoadReport {
    pub inserted: Vec<LoadedRecord>,
    pub failures: Vec<RecordFailure>,
}

impl LoadReport {
    pub fn total(&self) -> usize {
        self.inserted.len() + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct RecordLoader<'a> {
    builder: &'a TreeBuilder,
}

impl<'a> RecordLoader<'a> {
    pub fn new(builder: &'a TreeBuilder) -> Self {
        Self { builder }
    }

    /// Parse a JSON array of `{ "position", "title", "value" }` objects
    pub fn parse_records(json: &str) -> Result<Vec<TreeRecord>, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Insert every record in order, collecting per-record outcomes
    pub async fn load<I>(&self, records: I) -> LoadReport
    where
        I: IntoIterator<Item = TreeRecord>,
    {
        let mut report = LoadReport::default();

        for (index, record) in records.into_iter().enumerate() {
            match self
                .builder
                .insert(&record.position, &record.title, &record.value)
                .await
            {
                Ok(id) => report.inserted.push(LoadedRecord {
                    index,
                    position: record.position,
                    id,
                }),
                Err(error) => {
                    tracing::warn!(index, position = %record.position, "Record rejected: {}", error);
                    report.failures.push(RecordFailure {
                        index,
                        position: record.position,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            inserted = report.inserted.len(),
            failed = report.failures.len(),
            "Record load finished"
        );

        report
    }
}
