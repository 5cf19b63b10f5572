//! In-memory, read-only table of dataset records.

use std::collections::HashMap;

use tracing::warn;

use crate::models::DatasetRecord;

/// Immutable table of records with an id index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    records: Vec<DatasetRecord>,
    index: HashMap<String, usize>,
}

impl Table {
    /// Build a table, keeping the first occurrence of each `dataset_id`.
    pub fn new(records: Vec<DatasetRecord>) -> Self {
        let mut kept = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());

        for record in records {
            if index.contains_key(&record.dataset_id) {
                warn!("Duplicate dataset_id '{}' ignored", record.dataset_id);
                continue;
            }
            index.insert(record.dataset_id.clone(), kept.len());
            kept.push(record);
        }

        Self {
            records: kept,
            index,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DatasetRecord> {
        self.records.iter()
    }

    /// Look up a record by its `dataset_id`.
    pub fn get(&self, dataset_id: &str) -> Option<&DatasetRecord> {
        self.index.get(dataset_id).map(|&i| &self.records[i])
    }

    /// Smallest and largest `year_published` present, if any record has one.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.records
            .iter()
            .filter_map(|r| r.year_published)
            .fold(None, |bounds, year| match bounds {
                None => Some((year, year)),
                Some((lo, hi)) => Some((lo.min(year), hi.max(year))),
            })
    }
}
