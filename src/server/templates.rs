//! HTML templates for the web interface.
//!
//! The dashboard is a single page: a filter sidebar, an explorer tab with the
//! paginated table and the detail panel, and a statistics tab with charts.
//! Every link carries the session forward in its query string.

use chrono::{DateTime, Utc};

use super::charts;
use crate::services::pagination::PAGE_SIZES;
use crate::services::{DashboardView, DatasetDetail, PageLink, SessionState, Tab};

/// Base HTML template.
pub fn base_template(title: &str, sidebar: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Benchmark Explorer</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <header id="main-header">
        <nav>
            <a href="/" class="logo">AI Benchmark Explorer</a>
        </nav>
    </header>
    <div id="layout">
        {}
        <main>
            {}
        </main>
    </div>
</body>
</html>"#,
        html_escape(title),
        sidebar,
        content
    )
}

/// Page shown when the dataset could not be loaded.
pub fn warning_page(message: &str) -> String {
    base_template(
        "No data",
        "",
        &format!(
            r#"<div class="warning">{}</div>"#,
            html_escape(message)
        ),
    )
}

/// Query-string builder that carries the session forward.
#[derive(Debug, Clone)]
pub struct SessionLink<'s> {
    session: &'s SessionState,
    page: usize,
    selected: Option<&'s str>,
    tab: Tab,
}

impl<'s> SessionLink<'s> {
    pub fn new(session: &'s SessionState) -> Self {
        Self {
            session,
            page: session.page,
            selected: session.selection.id(),
            tab: session.tab,
        }
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn selected(mut self, selected: Option<&'s str>) -> Self {
        self.selected = selected;
        self
    }

    pub fn tab(mut self, tab: Tab) -> Self {
        self.tab = tab;
        self
    }

    /// Render as `/?key=value&...`.
    pub fn href(&self) -> String {
        let criteria = &self.session.criteria;
        let mut parts: Vec<String> = Vec::new();

        if let Some(ref task) = criteria.task {
            parts.push(format!("task={}", urlencoding::encode(task)));
        }
        if let Some(ref area) = criteria.area {
            parts.push(format!("area={}", urlencoding::encode(area)));
        }
        if !criteria.modalities.is_empty() {
            parts.push(format!(
                "modalities={}",
                urlencoding::encode(&criteria.modalities.join(","))
            ));
        }
        if let Some(range) = criteria.years {
            if range.from != i32::MIN {
                parts.push(format!("year_from={}", range.from));
            }
            if range.to != i32::MAX {
                parts.push(format!("year_to={}", range.to));
            }
        }
        if let Some(ref q) = criteria.search {
            parts.push(format!("q={}", urlencoding::encode(q)));
        }
        if self.page > 1 {
            parts.push(format!("page={}", self.page));
        }
        parts.push(format!("per_page={}", self.session.page_size));
        if let Some(id) = self.selected {
            parts.push(format!("selected={}", urlencoding::encode(id)));
        }
        if self.tab != Tab::Explorer {
            parts.push(format!("tab={}", self.tab.as_str()));
        }

        format!("/?{}", html_escape(&parts.join("&")))
    }
}

/// Render the full dashboard for a recomputed view.
pub fn dashboard_page(view: &DashboardView<'_>, loaded_at: DateTime<Utc>) -> String {
    let session = &view.session;

    let tabs = format!(
        r#"
    <nav class="tabs">
        <a href="{}" class="tab{}">Dataset Explorer</a>
        <a href="{}" class="tab{}">Dataset Statistics</a>
    </nav>"#,
        SessionLink::new(session).tab(Tab::Explorer).href(),
        if session.tab == Tab::Explorer { " active" } else { "" },
        SessionLink::new(session).tab(Tab::Statistics).href(),
        if session.tab == Tab::Statistics { " active" } else { "" },
    );

    let body = match session.tab {
        Tab::Explorer => explorer_tab(view),
        Tab::Statistics => statistics_tab(view),
    };

    let content = format!(
        r#"{}
    {}
    <footer class="loaded-at">Data loaded {}</footer>"#,
        tabs,
        body,
        loaded_at.format("%Y-%m-%d %H:%M UTC")
    );

    base_template("Datasets", &filter_panel(view), &content)
}

/// Sidebar form with the filter controls.
fn filter_panel(view: &DashboardView<'_>) -> String {
    let session = &view.session;
    let criteria = &session.criteria;
    let options = &view.options;

    let mut task_options = String::from(r#"<option value="All">All</option>"#);
    for option in &options.tasks {
        let selected = if criteria.task.as_deref() == Some(option.value.as_str()) {
            " selected"
        } else {
            ""
        };
        task_options.push_str(&format!(
            r#"<option value="{}"{}>{} ({})</option>"#,
            html_escape(&option.value),
            selected,
            html_escape(&option.value),
            option.count
        ));
    }

    let mut area_options = String::from(r#"<option value="All">All</option>"#);
    for area in &options.areas {
        let selected = if criteria.area.as_deref() == Some(area.as_str()) {
            " selected"
        } else {
            ""
        };
        area_options.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            html_escape(area),
            selected,
            html_escape(area)
        ));
    }

    let modality_toggles: String = options
        .modalities
        .iter()
        .map(|m| {
            let checked = if criteria.modalities.contains(m) {
                " checked"
            } else {
                ""
            };
            format!(
                r#"<label class="modality-toggle"><input type="checkbox" name="modalities" value="{}"{}> {}</label>"#,
                html_escape(m),
                checked,
                html_escape(m)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let year_inputs = match options.year_bounds {
        Some((min, max)) => {
            let from = criteria
                .years
                .map(|r| r.from.clamp(min, max))
                .unwrap_or(min);
            let to = criteria.years.map(|r| r.to.clamp(min, max)).unwrap_or(max);
            format!(
                r#"
            <label class="filter-label">Publication Year</label>
            <div class="year-range">
                <input type="number" name="year_from" min="{min}" max="{max}" value="{from}">
                <span>to</span>
                <input type="number" name="year_to" min="{min}" max="{max}" value="{to}">
            </div>"#,
                min = min,
                max = max,
                from = from,
                to = to
            )
        }
        None => String::new(),
    };

    let page_size_options: String = PAGE_SIZES
        .iter()
        .map(|&size| {
            let selected = if session.page_size.get() == size {
                " selected"
            } else {
                ""
            };
            format!(r#"<option value="{}"{}>{}</option>"#, size, selected, size)
        })
        .collect();

    let hidden_selected = session
        .selection
        .id()
        .map(|id| {
            format!(
                r#"<input type="hidden" name="selected" value="{}">"#,
                html_escape(id)
            )
        })
        .unwrap_or_default();

    let reset_href = SessionLink::new(&SessionState {
        tab: session.tab,
        selection: session.selection.clone(),
        ..Default::default()
    })
    .href();

    format!(
        r#"
    <aside id="sidebar">
        <h2>Dataset Filters</h2>
        <form method="get" action="/" class="filters">
            <label class="filter-label" for="task">Task</label>
            <select id="task" name="task">{}</select>

            <label class="filter-label" for="area">Research Area</label>
            <select id="area" name="area">{}</select>

            <label class="filter-label">Modalities</label>
            <div class="modality-toggles">
                {}
            </div>
            {}
            <label class="filter-label" for="q">Search Datasets</label>
            <input type="text" id="q" name="q" value="{}" placeholder="dataset id">

            <h3>Pagination Settings</h3>
            <label class="filter-label" for="per_page">Entries per page</label>
            <select id="per_page" name="per_page">{}</select>

            {}
            <input type="hidden" name="tab" value="{}">
            <div class="filter-actions">
                <button type="submit" class="btn">Apply</button>
                <a href="{}" class="btn-small">reset</a>
            </div>
        </form>
    </aside>"#,
        task_options,
        area_options,
        modality_toggles,
        year_inputs,
        html_escape(criteria.search.as_deref().unwrap_or("")),
        page_size_options,
        hidden_selected,
        session.tab.as_str(),
        reset_href
    )
}

/// Explorer tab: summary, table, pagination, and detail panel.
fn explorer_tab(view: &DashboardView<'_>) -> String {
    let session = &view.session;
    let selected_id = session.selection.id();

    let mut rows = String::new();
    for record in &view.rows {
        let class = if selected_id == Some(record.dataset_id.as_str()) {
            r#" class="selected""#
        } else {
            ""
        };
        rows.push_str(&format!(
            r#"
        <tr{}>
            <td><a href="{}">{}</a></td>
            <td>{}</td>
            <td>{}</td>
            <td>{}</td>
            <td>{}</td>
            <td>{}</td>
        </tr>"#,
            class,
            SessionLink::new(session)
                .selected(Some(record.dataset_id.as_str()))
                .href(),
            html_escape(&record.dataset_id),
            html_escape(record.task_label()),
            html_escape(record.area_label()),
            record.year_label(),
            record.benchmark_cnt,
            record.associated_task_cnt
        ));
    }

    if view.rows.is_empty() {
        rows.push_str(
            r#"
        <tr><td colspan="6" class="empty">No datasets match the current filters.</td></tr>"#,
        );
    }

    let detail = view
        .selected
        .as_ref()
        .map(|d| detail_panel(d, session))
        .unwrap_or_default();

    format!(
        r#"
    <div class="result-info">
        <strong>{}</strong>
    </div>
    <table class="file-listing" id="dataset-table">
        <thead>
            <tr>
                <th>Dataset ID</th>
                <th>Task</th>
                <th>Area</th>
                <th>Year</th>
                <th>Benchmarks</th>
                <th>Tasks</th>
            </tr>
        </thead>
        <tbody>
            {}
        </tbody>
    </table>
    {}
    {}"#,
        html_escape(&view.summary()),
        rows,
        pagination(view),
        detail
    )
}

/// Previous / numbered / next page controls.
fn pagination(view: &DashboardView<'_>) -> String {
    let session = &view.session;
    let page = &view.page;
    let mut nav = String::new();

    if page.has_previous() {
        nav.push_str(&format!(
            r#"<a href="{}" class="page-link">&larr; Previous</a> "#,
            SessionLink::new(session)
                .page(page.effective_page - 1)
                .href()
        ));
    } else {
        nav.push_str(r#"<span class="page-link disabled">&larr; Previous</span> "#);
    }

    nav.push_str(r#"<span class="page-numbers">"#);
    for link in page.links() {
        match link {
            PageLink::Page {
                number,
                current: true,
            } => nav.push_str(&format!(
                r#"<span class="page-link active">{}</span> "#,
                number
            )),
            PageLink::Page { number, .. } => nav.push_str(&format!(
                r#"<a href="{}" class="page-link">{}</a> "#,
                SessionLink::new(session).page(number).href(),
                number
            )),
            PageLink::Ellipsis => nav.push_str(r#"<span class="ellipsis">...</span> "#),
        }
    }
    nav.push_str("</span>");

    if page.has_next() {
        nav.push_str(&format!(
            r#"<a href="{}" class="page-link">Next &rarr;</a>"#,
            SessionLink::new(session)
                .page(page.effective_page + 1)
                .href()
        ));
    } else {
        nav.push_str(r#"<span class="page-link disabled">Next &rarr;</span>"#);
    }

    format!(r#"<div class="pagination">{}</div>"#, nav)
}

/// Detail panel for the selected dataset.
pub fn detail_panel(detail: &DatasetDetail, session: &SessionState) -> String {
    let record = &detail.record;

    let metadata: String = detail
        .metadata()
        .iter()
        .map(|(label, value)| {
            format!(
                r#"
            <div class="meta-item">
                <strong>{}</strong>
                <div class="chip">{}</div>
            </div>"#,
                label,
                html_escape(value)
            )
        })
        .collect();

    format!(
        r#"
    <section class="dataset-detail">
        <div class="detail-header">
            <h2>Dataset Details</h2>
            <a href="{}" class="btn-small">close</a>
        </div>
        <div class="detail-columns">
            <div class="detail-main">
                <h3>{}</h3>
                <p><strong>Description:</strong> {}</p>
            </div>
            <div class="quick-stats">
                <h4>Quick Stats</h4>
                <div class="metric"><span class="metric-label">Total Benchmarks</span><span class="metric-value">{}</span></div>
                <div class="metric"><span class="metric-label">Associated Tasks</span><span class="metric-value">{}</span></div>
            </div>
        </div>
        <h3>Dataset Metadata</h3>
        <div class="metadata-row">{}
        </div>
        <h3>Additional Information</h3>
        <div class="detail-columns">
            <div>
                <strong>Modalities</strong>
                {}
            </div>
            <div>
                <strong>Associated Tasks</strong>
                {}
            </div>
        </div>
    </section>"#,
        SessionLink::new(session).selected(None).href(),
        html_escape(&record.dataset_id),
        html_escape(detail.description_label()),
        record.benchmark_cnt,
        record.associated_task_cnt,
        metadata,
        chips(&detail.modality_list, "No modalities available"),
        chips(&detail.associated_task_list, "No associated tasks available")
    )
}

fn chips(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        return format!(r#"<p class="empty">{}</p>"#, empty);
    }
    let inner: String = items
        .iter()
        .map(|t| format!(r#"<span class="chip">{}</span>"#, html_escape(t)))
        .collect();
    format!(r#"<div class="horizontal-chips">{}</div>"#, inner)
}

/// Statistics tab: task distribution and yearly trend.
fn statistics_tab(view: &DashboardView<'_>) -> String {
    format!(
        r#"
    <div class="result-info">
        <strong>{} datasets match the current filters</strong>
    </div>
    <div class="chart-columns">
        <section>
            <h3>Tasks Distribution</h3>
            {}
        </section>
        <section>
            <h3>Yearly Trends</h3>
            {}
        </section>
    </div>"#,
        view.page.total_rows,
        charts::task_bar_chart(&view.stats.task_distribution),
        charts::year_line_chart(&view.stats.yearly_trend)
    )
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// CSS styles for the web interface.
pub const CSS: &str = r#"
:root {
    --bg: #0e1117;
    --panel: #1e2026;
    --text: #f0f2f6;
    --text-muted: #9aa0aa;
    --accent: #3b5998;
    --accent-hover: #4a6cd4;
    --chip: #2c3e50;
    --border: #333842;
    --warning: #5c4a12;
}

* { box-sizing: border-box; margin: 0; padding: 0; }

body {
    font-family: -apple-system, 'Segoe UI', Helvetica, Arial, sans-serif;
    font-size: 14px;
    background: var(--bg);
    color: var(--text);
    line-height: 1.5;
}

a { color: var(--accent-hover); text-decoration: none; }
a:hover { text-decoration: underline; }

h1, h2, h3, h4 { font-weight: 600; margin: 0.75rem 0 0.5rem; }

#main-header {
    border-bottom: 1px solid var(--border);
    padding: 0.75rem 1rem;
}

#main-header .logo { font-size: 18px; font-weight: 600; color: var(--text); }

#layout { display: flex; min-height: calc(100vh - 50px); }

#sidebar {
    width: 280px;
    flex-shrink: 0;
    background: var(--panel);
    padding: 1rem;
}

#sidebar .filters { display: flex; flex-direction: column; gap: 0.35rem; }

.filter-label { color: var(--text-muted); font-size: 12px; margin-top: 0.5rem; }

select, input[type="text"], input[type="number"] {
    background: var(--bg);
    color: var(--text);
    border: 1px solid var(--border);
    border-radius: 6px;
    padding: 4px 8px;
    width: 100%;
}

.year-range { display: flex; gap: 0.5rem; align-items: center; }

.modality-toggles { display: flex; flex-wrap: wrap; gap: 0.25rem 0.75rem; }

.filter-actions { display: flex; gap: 0.75rem; align-items: center; margin-top: 0.75rem; }

.btn, .btn-small {
    background: var(--accent);
    color: white;
    border: none;
    border-radius: 6px;
    cursor: pointer;
}

.btn { padding: 6px 14px; }
.btn-small { padding: 2px 10px; font-size: 12px; }
.btn:hover, .btn-small:hover { background: var(--accent-hover); text-decoration: none; }

main { flex: 1; padding: 1rem 1.5rem; min-width: 0; }

.tabs { display: flex; gap: 1rem; border-bottom: 1px solid var(--border); margin-bottom: 1rem; }
.tab { padding: 0.5rem 0.25rem; color: var(--text-muted); }
.tab.active { color: var(--text); border-bottom: 2px solid var(--accent-hover); }

.result-info { margin: 0.5rem 0; }

.file-listing { width: 100%; border-collapse: collapse; background: var(--panel); border-radius: 8px; overflow: hidden; }
.file-listing th { text-align: left; padding: 6px 10px; border-bottom: 1px solid var(--accent-hover); }
.file-listing td { padding: 5px 10px; border-bottom: 1px solid var(--border); }
.file-listing tr:hover td { background: var(--chip); }
.file-listing tr.selected td { background: var(--chip); }

.pagination {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin: 15px 0;
    padding: 10px;
    background: var(--panel);
    border-radius: 8px;
}

.page-link { padding: 4px 10px; border-radius: 6px; background: var(--accent); color: white; }
.page-link.active { background: var(--accent-hover); }
.page-link.disabled { background: var(--border); color: var(--text-muted); }

.dataset-detail { background: var(--panel); border-radius: 8px; padding: 1rem; margin-top: 1rem; }
.detail-header { display: flex; justify-content: space-between; align-items: center; }
.detail-columns { display: grid; grid-template-columns: 2fr 1fr; gap: 1rem; }
.metric { display: flex; justify-content: space-between; }
.metric-value { font-size: 20px; font-weight: 600; }
.metadata-row { display: grid; grid-template-columns: repeat(5, 1fr); gap: 0.5rem; }

.horizontal-chips { display: flex; flex-wrap: wrap; gap: 5px; align-items: center; }
.chip {
    display: inline-block;
    background: var(--chip);
    color: #ecf0f1;
    padding: 3px 8px;
    border-radius: 15px;
    font-size: 0.8em;
    margin: 2px;
}

.chart-columns { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
.chart { width: 100%; height: auto; background: var(--panel); border-radius: 8px; }
.chart rect { fill: var(--accent-hover); }
.chart text { fill: var(--text); font-size: 11px; }
.chart .axis { stroke: var(--text-muted); }
.chart .trend { fill: none; stroke: var(--accent-hover); stroke-width: 2; }
.chart circle { fill: var(--text); }

.empty { color: var(--text-muted); font-style: italic; }

.warning { background: var(--warning); padding: 1rem; border-radius: 8px; }

.loaded-at { color: var(--text-muted); font-size: 12px; margin-top: 2rem; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DatasetRecord;
    use crate::repository::Table;
    use crate::services::{recompute, FilterCriteria, YearRange};

    fn table() -> Table {
        let mut squad = DatasetRecord::new("SQuAD");
        squad.task = Some("QA".to_string());
        squad.year_published = Some(2016);
        squad.modalities = Some("Text".to_string());
        let mut coco = DatasetRecord::new("COCO <2014>");
        coco.task = Some("Detection".to_string());
        coco.year_published = Some(2014);
        Table::new(vec![squad, coco])
    }

    #[test]
    fn test_session_link_defaults() {
        let session = SessionState::default();
        assert_eq!(SessionLink::new(&session).href(), "/?per_page=20");
    }

    #[test]
    fn test_session_link_carries_state() {
        let mut session = SessionState::default();
        session.criteria = FilterCriteria {
            task: Some("Q A".to_string()),
            modalities: vec!["Text".to_string(), "Image".to_string()],
            years: Some(YearRange::new(2015, 2020)),
            ..Default::default()
        };
        session.select("SQuAD");

        let href = SessionLink::new(&session).page(2).href();
        assert!(href.contains("task=Q%20A"));
        assert!(href.contains("modalities=Text%2CImage"));
        assert!(href.contains("year_from=2015&amp;year_to=2020"));
        assert!(href.contains("page=2"));
        assert!(href.contains("selected=SQuAD"));
    }

    #[test]
    fn test_dashboard_escapes_and_shows_rows() {
        let table = table();
        let view = recompute(&table, SessionState::default());
        let html = dashboard_page(&view, Utc::now());

        assert!(html.contains("COCO &lt;2014&gt;"));
        assert!(!html.contains("COCO <2014>"));
        assert!(html.contains("Showing 2 of 2 datasets (Page 1 of 1)"));
        assert!(html.contains(r#"<option value="QA">QA (1)</option>"#));
    }

    #[test]
    fn test_dashboard_detail_panel() {
        let table = table();
        let mut session = SessionState::default();
        session.select("SQuAD");
        let view = recompute(&table, session);
        let html = dashboard_page(&view, Utc::now());

        assert!(html.contains("Dataset Details"));
        assert!(html.contains("No description available"));
        assert!(html.contains("No associated tasks available"));
        assert!(html.contains(r#"<span class="chip">Text</span>"#));
    }

    #[test]
    fn test_statistics_tab_renders_charts() {
        let table = table();
        let mut session = SessionState::default();
        session.tab = Tab::Statistics;
        let view = recompute(&table, session);
        let html = dashboard_page(&view, Utc::now());

        assert!(html.contains("Tasks Distribution"));
        assert!(html.contains("task-chart"));
        assert!(html.contains("year-chart"));
    }

    #[test]
    fn test_warning_page() {
        let html = warning_page("Dataset file not found: data/datasets.csv");
        assert!(html.contains(r#"<div class="warning">Dataset file not found"#));
    }
}
