//! CSV ingestion for the dataset table.
//!
//! Reads the source once, validates that the expected columns are present,
//! and derives the benchmark and associated-task counts for every row.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::table::Table;
use crate::error::DataLoadError;
use crate::models::DatasetRecord;

/// Columns the source file must provide.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "dataset_id",
    "task",
    "area",
    "modalities",
    "associated_tasks",
    "benchmark_urls",
    "year_published",
    "license",
    "languages",
    "description",
];

/// A row as it appears in the file, before normalisation.
#[derive(Debug, Default, Deserialize)]
struct CsvRow {
    #[serde(default)]
    dataset_id: Option<String>,
    #[serde(default)]
    task: Option<String>,
    #[serde(default)]
    area: Option<String>,
    #[serde(default)]
    modalities: Option<String>,
    #[serde(default)]
    associated_tasks: Option<String>,
    #[serde(default)]
    benchmark_urls: Option<String>,
    #[serde(default)]
    year_published: Option<String>,
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    languages: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl CsvRow {
    fn into_record(self) -> Option<DatasetRecord> {
        let dataset_id = non_blank(self.dataset_id)?;

        Some(
            DatasetRecord {
                dataset_id,
                task: non_blank(self.task),
                area: non_blank(self.area),
                modalities: non_blank(self.modalities),
                associated_tasks: non_blank(self.associated_tasks),
                benchmark_urls: non_blank(self.benchmark_urls),
                year_published: self.year_published.as_deref().and_then(parse_year),
                license: non_blank(self.license),
                languages: non_blank(self.languages),
                description: non_blank(self.description),
                benchmark_cnt: 0,
                associated_task_cnt: 0,
            }
            .with_derived_counts(),
        )
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a year written either as an integer or as a float with no
/// fractional part ("2019.0", common in spreadsheet exports).
pub fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(year) = raw.parse::<i32>() {
        return Some(year);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => {
            Some(f as i32)
        }
        _ => None,
    }
}

/// Load the dataset table from a CSV file.
pub fn load(path: &Path) -> Result<Table, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::NotFound(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let table = load_from_reader(file)?;
    info!("Loaded {} datasets from {}", table.len(), path.display());
    Ok(table)
}

/// Load the dataset table from any CSV byte stream.
pub fn load_from_reader<R: Read>(reader: R) -> Result<Table, DataLoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h.trim() == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns(missing));
    }

    // Header cells may carry stray whitespace; match on trimmed names.
    let trimmed: csv::StringRecord = headers.iter().map(str::trim).collect();
    csv_reader.set_headers(trimmed);

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (line, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
        match row {
            Ok(row) => match row.into_record() {
                Some(record) => records.push(record),
                None => {
                    debug!("Row {} has no dataset_id, skipping", line + 1);
                    skipped += 1;
                }
            },
            Err(e) => {
                warn!("Skipping malformed row {}: {}", line + 1, e);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} unusable rows", skipped);
    }

    Ok(Table::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "dataset_id,task,area,modalities,associated_tasks,benchmark_urls,year_published,license,languages,description\n";

    fn load_str(body: &str) -> Result<Table, DataLoadError> {
        load_from_reader(format!("{}{}", HEADER, body).as_bytes())
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2019"), Some(2019));
        assert_eq!(parse_year(" 2020.0 "), Some(2020));
        assert_eq!(parse_year("2020.5"), None);
        assert_eq!(parse_year("unknown"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn test_load_derives_counts() {
        let table = load_str(
            "squad,QA,NLP,Text,\"qa, reading\",\"http://a, http://b,\",2016,CC-BY,en,Questions\n",
        )
        .unwrap();

        let record = table.get("squad").unwrap();
        assert_eq!(record.benchmark_cnt, 2);
        assert_eq!(record.associated_task_cnt, 2);
        assert_eq!(record.year_published, Some(2016));
        assert_eq!(record.area.as_deref(), Some("NLP"));
    }

    #[test]
    fn test_blank_fields_are_neutral() {
        let table = load_str("bare,QA,,,,,,,,\n").unwrap();
        let record = table.get("bare").unwrap();

        assert_eq!(record.area, None);
        assert_eq!(record.modalities, None);
        assert_eq!(record.year_published, None);
        assert_eq!(record.benchmark_cnt, 0);
        assert_eq!(record.associated_task_cnt, 0);
    }

    #[test]
    fn test_rows_without_id_are_skipped() {
        let table = load_str(",QA,,,,,2019,,,\nkept,QA,,,,,2019,,,\n").unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get("kept").is_some());
    }

    #[test]
    fn test_short_rows_degrade() {
        let table = load_str("short,QA\n").unwrap();
        let record = table.get("short").unwrap();
        assert_eq!(record.task.as_deref(), Some("QA"));
        assert_eq!(record.description, None);
    }

    #[test]
    fn test_undecodable_row_is_skipped() {
        let mut body = HEADER.as_bytes().to_vec();
        body.extend_from_slice(b"before,QA,,,,,2019,,,\n");
        body.extend_from_slice(b"broken,\xff\xfe,,,,,2020,,,\n");
        body.extend_from_slice(b"after,ASR,,,,,2021,,,\n");

        let table = load_from_reader(body.as_slice()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.get("before").is_some());
        assert!(table.get("after").is_some());
        assert!(table.get("broken").is_none());
    }

    #[test]
    fn test_missing_columns() {
        let err = load_from_reader("dataset_id,task\nx,QA\n".as_bytes()).unwrap_err();
        match err {
            DataLoadError::MissingColumns(cols) => {
                assert!(cols.contains(&"area".to_string()));
                assert!(cols.contains(&"description".to_string()));
                assert!(!cols.contains(&"task".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_headers_only_is_empty_table() {
        let table = load_str("").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = load(Path::new("/nonexistent/datasets.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::NotFound(_)));
    }
}
