//! Selected-record state and detail lookup.

use serde::Serialize;
use tracing::debug;

use crate::error::NotFoundError;
use crate::models::{DatasetRecord, NOT_AVAILABLE};
use crate::repository::Table;

/// Which record, if any, is shown in the detail panel.
///
/// Only `select` and `clear` change this state; paging and filtering leave it
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "dataset_id", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    Unselected,
    Selected(String),
}

impl Selection {
    pub fn from_id(id: Option<&str>) -> Self {
        match id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => Self::Selected(id.to_string()),
            None => Self::Unselected,
        }
    }

    /// Select a record. Existence is checked when the detail is resolved.
    pub fn select(&mut self, dataset_id: impl Into<String>) {
        *self = Self::Selected(dataset_id.into());
    }

    pub fn clear(&mut self) {
        *self = Self::Unselected;
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Selected(id) => Some(id),
            Self::Unselected => None,
        }
    }

    /// Resolve against the unfiltered table; a vanished id reads as nothing selected.
    pub fn resolve(&self, table: &Table) -> Option<DatasetDetail> {
        let id = self.id()?;
        match detail(table, id) {
            Ok(detail) => Some(detail),
            Err(e) => {
                debug!("Ignoring stale selection: {}", e);
                None
            }
        }
    }
}

/// Full record prepared for the detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetDetail {
    #[serde(flatten)]
    pub record: DatasetRecord,
    pub modality_list: Vec<String>,
    pub associated_task_list: Vec<String>,
}

impl DatasetDetail {
    pub fn new(record: &DatasetRecord) -> Self {
        Self {
            modality_list: record.modality_tokens(),
            associated_task_list: record.associated_task_tokens(),
            record: record.clone(),
        }
    }

    pub fn description_label(&self) -> &str {
        self.record
            .description
            .as_deref()
            .unwrap_or("No description available")
    }

    /// Label/value pairs for the metadata chips.
    pub fn metadata(&self) -> Vec<(&'static str, String)> {
        let text = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());
        vec![
            ("Task", text(&self.record.task)),
            ("Area", text(&self.record.area)),
            ("Year", self.record.year_label()),
            ("License", text(&self.record.license)),
            ("Languages", text(&self.record.languages)),
        ]
    }
}

/// Look up a record by id in the unfiltered table.
pub fn detail(table: &Table, dataset_id: &str) -> Result<DatasetDetail, NotFoundError> {
    table
        .get(dataset_id)
        .map(DatasetDetail::new)
        .ok_or_else(|| NotFoundError(dataset_id.to_string()))
}
