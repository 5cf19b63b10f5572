//! Filter engine over the dataset table.
//!
//! Task, area, year range, and search are ANDed together. The modality
//! constraint is an OR over the selected tags, ANDed with the rest.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::models::DatasetRecord;
use crate::repository::Table;

/// Sentinel choice meaning "no constraint" for task and area.
pub const ALL: &str = "All";

/// Inclusive range of publication years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub from: i32,
    pub to: i32,
}

impl YearRange {
    /// Create a range, swapping the bounds if given in reverse.
    pub fn new(from: i32, to: i32) -> Self {
        if from <= to {
            Self { from, to }
        } else {
            Self { from: to, to: from }
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.from <= year && year <= self.to
    }

    /// Whether this range spans the whole observed `(min, max)` interval.
    pub fn covers(&self, bounds: (i32, i32)) -> bool {
        self.from <= bounds.0 && self.to >= bounds.1
    }
}

/// Active filter constraints for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    /// Exact task match.
    pub task: Option<String>,
    /// Exact area match.
    pub area: Option<String>,
    /// Any-of modality tags.
    pub modalities: Vec<String>,
    /// Inclusive publication year range.
    pub years: Option<YearRange>,
    /// Case-insensitive substring of `dataset_id`.
    pub search: Option<String>,
}

impl FilterCriteria {
    /// Normalise a select-box value: blank or "All" means unconstrained.
    pub fn choice(value: Option<&str>) -> Option<String> {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty() && *v != ALL)
            .map(String::from)
    }

    /// Normalise a list of modality tags, dropping blanks and duplicates.
    pub fn modality_set<I, S>(tags: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        tags.into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty() && seen.insert(t.clone()))
            .collect()
    }

    /// Normalise a search term: blank means no search.
    pub fn search_term(value: Option<&str>) -> Option<String> {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
    }

    pub fn is_empty(&self) -> bool {
        self.task.is_none()
            && self.area.is_none()
            && self.modalities.is_empty()
            && self.years.is_none()
            && self.search.is_none()
    }
}

/// Criteria prepared for evaluation against one table.
struct Matcher<'c> {
    criteria: &'c FilterCriteria,
    years: Option<YearRange>,
    needle: Option<String>,
}

impl<'c> Matcher<'c> {
    fn new(criteria: &'c FilterCriteria, year_bounds: Option<(i32, i32)>) -> Self {
        // A range that spans everything observed is not a constraint, so
        // records without a year stay visible.
        let years = criteria.years.filter(|range| match year_bounds {
            Some(bounds) => !range.covers(bounds),
            None => false,
        });

        Self {
            criteria,
            years,
            needle: criteria.search.as_ref().map(|s| s.to_lowercase()),
        }
    }

    fn matches(&self, record: &DatasetRecord) -> bool {
        if let Some(ref task) = self.criteria.task {
            if record.task.as_deref() != Some(task.as_str()) {
                return false;
            }
        }

        if let Some(ref area) = self.criteria.area {
            if record.area.as_deref() != Some(area.as_str()) {
                return false;
            }
        }

        if !self.criteria.modalities.is_empty() {
            let tokens = record.modality_tokens();
            if !tokens.iter().any(|t| self.criteria.modalities.contains(t)) {
                return false;
            }
        }

        if let Some(range) = self.years {
            match record.year_published {
                Some(year) if range.contains(year) => {}
                _ => return false,
            }
        }

        if let Some(ref needle) = self.needle {
            if !record.dataset_id.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }

        true
    }
}

/// Apply the criteria to the table, preserving source order.
pub fn apply<'t>(table: &'t Table, criteria: &FilterCriteria) -> Vec<&'t DatasetRecord> {
    if criteria.is_empty() {
        return table.iter().collect();
    }

    let matcher = Matcher::new(criteria, table.year_bounds());
    table.iter().filter(|r| matcher.matches(r)).collect()
}

/// A selectable category with its record count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionCount {
    pub value: String,
    pub count: usize,
}

/// Choices offered to the user, derived from the unfiltered table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Tasks ordered by count descending, then name.
    pub tasks: Vec<OptionCount>,
    pub areas: Vec<String>,
    pub modalities: Vec<String>,
    pub year_bounds: Option<(i32, i32)>,
}

impl FilterOptions {
    pub fn from_table(table: &Table) -> Self {
        let mut task_counts: HashMap<&str, usize> = HashMap::new();
        let mut areas = BTreeSet::new();
        let mut modalities = BTreeSet::new();

        for record in table.iter() {
            if let Some(ref task) = record.task {
                *task_counts.entry(task.as_str()).or_insert(0) += 1;
            }
            if let Some(ref area) = record.area {
                areas.insert(area.clone());
            }
            modalities.extend(record.modality_tokens());
        }

        let mut tasks: Vec<OptionCount> = task_counts
            .into_iter()
            .map(|(value, count)| OptionCount {
                value: value.to_string(),
                count,
            })
            .collect();
        tasks.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));

        Self {
            tasks,
            areas: areas.into_iter().collect(),
            modalities: modalities.into_iter().collect(),
            year_bounds: table.year_bounds(),
        }
    }
}
