//! Domain models for dataset metadata records.

use serde::Serialize;

/// Placeholder shown for absent display fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// Split a comma-separated field into trimmed, non-empty tokens.
pub fn split_tokens(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// Count the non-empty tokens of a comma-separated field.
pub fn count_tokens(raw: Option<&str>) -> usize {
    raw.map(|s| s.split(',').filter(|t| !t.trim().is_empty()).count())
        .unwrap_or(0)
}

/// Shorten `s` to at most `width` characters, marking the cut with `…`.
pub fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

/// One row of the dataset table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetRecord {
    pub dataset_id: String,
    pub task: Option<String>,
    pub area: Option<String>,
    /// Raw comma-separated modality tags.
    pub modalities: Option<String>,
    /// Raw comma-separated associated tasks.
    pub associated_tasks: Option<String>,
    /// Raw comma-separated benchmark URLs.
    pub benchmark_urls: Option<String>,
    pub year_published: Option<i32>,
    pub license: Option<String>,
    pub languages: Option<String>,
    pub description: Option<String>,
    /// Number of non-empty tokens in `benchmark_urls`.
    pub benchmark_cnt: usize,
    /// Number of non-empty tokens in `associated_tasks`.
    pub associated_task_cnt: usize,
}

impl DatasetRecord {
    /// Create a record with only an id; every other field absent.
    pub fn new(dataset_id: impl Into<String>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            task: None,
            area: None,
            modalities: None,
            associated_tasks: None,
            benchmark_urls: None,
            year_published: None,
            license: None,
            languages: None,
            description: None,
            benchmark_cnt: 0,
            associated_task_cnt: 0,
        }
    }

    /// Recompute the derived count columns from their source fields.
    pub fn with_derived_counts(mut self) -> Self {
        self.benchmark_cnt = count_tokens(self.benchmark_urls.as_deref());
        self.associated_task_cnt = count_tokens(self.associated_tasks.as_deref());
        self
    }

    /// Parsed modality tokens.
    pub fn modality_tokens(&self) -> Vec<String> {
        split_tokens(self.modalities.as_deref())
    }

    /// Parsed associated-task tokens.
    pub fn associated_task_tokens(&self) -> Vec<String> {
        split_tokens(self.associated_tasks.as_deref())
    }

    /// Task label for display.
    pub fn task_label(&self) -> &str {
        self.task.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Area label for display.
    pub fn area_label(&self) -> &str {
        self.area.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Year label for display.
    pub fn year_label(&self) -> String {
        self.year_published
            .map(|y| y.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_tokens_drops_empty_entries() {
        assert_eq!(count_tokens(Some("http://a, http://b,")), 2);
        assert_eq!(count_tokens(Some(" , ,")), 0);
        assert_eq!(count_tokens(Some("")), 0);
        assert_eq!(count_tokens(None), 0);
    }

    #[test]
    fn test_count_tokens_ignores_whitespace_variations() {
        assert_eq!(
            count_tokens(Some("a,b,c")),
            count_tokens(Some("  a ,\tb,   c  "))
        );
    }

    #[test]
    fn test_split_tokens_trims() {
        assert_eq!(
            split_tokens(Some(" Text, Image ,,Audio")),
            vec!["Text", "Image", "Audio"]
        );
        assert!(split_tokens(None).is_empty());
    }

    #[test]
    fn test_derived_counts() {
        let mut record = DatasetRecord::new("squad");
        record.benchmark_urls = Some("http://a, http://b,".to_string());
        record.associated_tasks = Some("qa, reading comprehension".to_string());
        let record = record.with_derived_counts();

        assert_eq!(record.benchmark_cnt, 2);
        assert_eq!(record.associated_task_cnt, 2);
    }

    #[test]
    fn test_labels_fall_back_to_na() {
        let record = DatasetRecord::new("x");
        assert_eq!(record.task_label(), "N/A");
        assert_eq!(record.area_label(), "N/A");
        assert_eq!(record.year_label(), "N/A");
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip("abc", 5), "abc");
        assert_eq!(clip("abcdef", 4), "abc…");
        assert_eq!(clip("Question Answering", 9), "Question…");
    }
}
