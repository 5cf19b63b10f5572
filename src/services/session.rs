//! Per-session dashboard state and the recompute step.
//!
//! A session owns its filters, page position, and selection. The hosting
//! shell mutates a [`SessionState`] in response to user input and then calls
//! [`recompute`] to get everything the renderer needs.

use serde::Serialize;

use super::filter::{self, FilterCriteria, FilterOptions};
use super::pagination::{paginate, Page, PageSize};
use super::selection::{DatasetDetail, Selection};
use super::stats::Statistics;
use crate::models::DatasetRecord;
use crate::repository::Table;

/// Which dashboard tab is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Explorer,
    Statistics,
}

impl Tab {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("statistics") | Some("stats") => Self::Statistics,
            _ => Self::Explorer,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Explorer => "explorer",
            Self::Statistics => "statistics",
        }
    }
}

/// Ephemeral state of one viewing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub criteria: FilterCriteria,
    /// Requested page, 1-indexed.
    pub page: usize,
    pub page_size: PageSize,
    pub selection: Selection,
    pub tab: Tab,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            criteria: FilterCriteria::default(),
            page: 1,
            page_size: PageSize::default(),
            selection: Selection::default(),
            tab: Tab::default(),
        }
    }
}

impl SessionState {
    /// Replace the filters. Page and selection are kept; an out-of-range
    /// page is corrected by the next recompute.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn select(&mut self, dataset_id: impl Into<String>) {
        self.selection.select(dataset_id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}

/// Everything the renderer needs after one interaction.
#[derive(Debug, Serialize)]
pub struct DashboardView<'t> {
    /// Session with the page corrected to the one actually shown.
    pub session: SessionState,
    /// Rows of the current page, in table order.
    pub rows: Vec<&'t DatasetRecord>,
    pub page: Page,
    /// Detail of the selected record, looked up in the unfiltered table.
    pub selected: Option<DatasetDetail>,
    /// Chart series over the whole filtered subset.
    pub stats: Statistics,
    pub options: FilterOptions,
}

impl DashboardView<'_> {
    /// "Showing N of M datasets (Page p of t)".
    pub fn summary(&self) -> String {
        format!(
            "Showing {} of {} datasets (Page {} of {})",
            self.rows.len(),
            self.page.total_rows,
            self.page.effective_page,
            self.page.total_pages
        )
    }
}

/// Recompute the view for a session against the current table.
pub fn recompute(table: &Table, mut session: SessionState) -> DashboardView<'_> {
    let filtered = filter::apply(table, &session.criteria);
    let page = paginate(filtered.len(), session.page_size, session.page);
    session.page = page.effective_page;

    DashboardView {
        rows: page.slice(&filtered).to_vec(),
        selected: session.selection.resolve(table),
        stats: Statistics::from_rows(&filtered),
        options: FilterOptions::from_table(table),
        page,
        session,
    }
}
