//! Aggregate series for the statistics charts.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::models::DatasetRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Both chart series for one filtered subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    /// Ordered by count descending, then label.
    pub task_distribution: Vec<CategoryCount>,
    /// Ordered by year ascending.
    pub yearly_trend: Vec<YearCount>,
}

impl Statistics {
    pub fn from_rows(rows: &[&DatasetRecord]) -> Self {
        Self {
            task_distribution: task_distribution(rows),
            yearly_trend: yearly_trend(rows),
        }
    }
}

/// Count records per task. Records without a task are left out.
pub fn task_distribution(rows: &[&DatasetRecord]) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for task in rows.iter().filter_map(|r| r.task.as_deref()) {
        *counts.entry(task).or_insert(0) += 1;
    }

    let mut series: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label: label.to_string(),
            count,
        })
        .collect();
    series.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    series
}

/// Count records per publication year. Records without a year are left out.
pub fn yearly_trend(rows: &[&DatasetRecord]) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for year in rows.iter().filter_map(|r| r.year_published) {
        *counts.entry(year).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, task: Option<&str>, year: Option<i32>) -> DatasetRecord {
        let mut r = DatasetRecord::new(id);
        r.task = task.map(String::from);
        r.year_published = year;
        r
    }

    #[test]
    fn test_task_distribution_order() {
        let records = [
            record("a", Some("QA"), None),
            record("b", Some("ASR"), None),
            record("c", Some("QA"), None),
            record("d", None, None),
            record("e", Some("Detection"), None),
        ];
        let rows: Vec<&DatasetRecord> = records.iter().collect();

        let series = task_distribution(&rows);
        let labels: Vec<&str> = series.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["QA", "ASR", "Detection"]);
        assert_eq!(series[0].count, 2);
    }

    #[test]
    fn test_yearly_trend_sorted_and_skips_missing() {
        let records = [
            record("a", None, Some(2021)),
            record("b", None, Some(2019)),
            record("c", None, None),
            record("d", None, Some(2021)),
        ];
        let rows: Vec<&DatasetRecord> = records.iter().collect();

        assert_eq!(
            yearly_trend(&rows),
            vec![
                YearCount { year: 2019, count: 1 },
                YearCount { year: 2021, count: 2 },
            ]
        );
    }

    #[test]
    fn test_empty_rows() {
        assert_eq!(Statistics::from_rows(&[]), Statistics::default());
    }
}
