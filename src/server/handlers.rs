//! Request handlers for the dashboard and its JSON API.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::debug;

use super::templates;
use super::AppState;
use crate::error::NotFoundError;
use crate::repository::Snapshot;
use crate::services::{
    detail, recompute, FilterCriteria, FilterOptions, PageSize, Selection, SessionState, Tab,
    YearRange,
};

/// Warning shown when the source has no usable rows.
pub const EMPTY_DATA_WARNING: &str = "Please place your dataset CSV file in the 'data' directory.";

/// Session parameters carried in the query string.
///
/// Parsed from raw key/value pairs so that repeated `modalities` keys (from
/// checkboxes) and comma-joined values both work, and so that malformed
/// numbers degrade to defaults instead of rejecting the request.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DashboardParams {
    pub task: Option<String>,
    pub area: Option<String>,
    pub modalities: Vec<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub q: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    pub selected: Option<String>,
    pub tab: Option<String>,
}

impl DashboardParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "task" => params.task = Some(value),
                "area" => params.area = Some(value),
                "modalities" | "modality" => params
                    .modalities
                    .extend(value.split(',').map(|s| s.to_string())),
                "year_from" => params.year_from = value.trim().parse().ok(),
                "year_to" => params.year_to = value.trim().parse().ok(),
                "q" => params.q = Some(value),
                "page" => params.page = value.trim().parse().ok(),
                "per_page" => params.per_page = value.trim().parse().ok(),
                "selected" => params.selected = Some(value),
                "tab" => params.tab = Some(value),
                other => debug!("Ignoring unknown query parameter '{}'", other),
            }
        }
        params
    }

    pub fn criteria(&self) -> FilterCriteria {
        let years = match (self.year_from, self.year_to) {
            (None, None) => None,
            (from, to) => Some(YearRange::new(
                from.unwrap_or(i32::MIN),
                to.unwrap_or(i32::MAX),
            )),
        };

        FilterCriteria {
            task: FilterCriteria::choice(self.task.as_deref()),
            area: FilterCriteria::choice(self.area.as_deref()),
            modalities: FilterCriteria::modality_set(&self.modalities),
            years,
            search: FilterCriteria::search_term(self.q.as_deref()),
        }
    }

    pub fn into_session(self, default_page_size: PageSize) -> SessionState {
        let page_size = self
            .per_page
            .and_then(PageSize::new)
            .unwrap_or(default_page_size);

        SessionState {
            criteria: self.criteria(),
            page: self.page.unwrap_or(1),
            page_size,
            selection: Selection::from_id(self.selected.as_deref()),
            tab: Tab::parse(self.tab.as_deref()),
        }
    }
}

/// Errors returned by the JSON API.
#[derive(Debug)]
pub enum ApiError {
    /// The dataset could not be loaded.
    Unavailable(String),
    NotFound(NotFoundError),
}

impl From<NotFoundError> for ApiError {
    fn from(e: NotFoundError) -> Self {
        Self::NotFound(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            Self::NotFound(e) => (StatusCode::NOT_FOUND, e.to_string()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Refresh the cache if the source changed and take the current snapshot.
async fn current_snapshot(state: &AppState) -> std::sync::Arc<Snapshot> {
    state.cache.refresh_if_changed().await;
    state.cache.snapshot().await
}

/// The reason a snapshot cannot be browsed, if any.
fn unusable(snapshot: &Snapshot) -> Option<String> {
    match snapshot.warning {
        Some(ref warning) => Some(warning.clone()),
        None if snapshot.table.is_empty() => Some(EMPTY_DATA_WARNING.to_string()),
        None => None,
    }
}

/// Dashboard page.
pub async fn dashboard(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Html<String> {
    let snapshot = current_snapshot(&state).await;
    if let Some(warning) = unusable(&snapshot) {
        return Html(templates::warning_page(&warning));
    }

    let session = DashboardParams::from_pairs(pairs).into_session(state.default_page_size);
    let view = recompute(&snapshot.table, session);
    Html(templates::dashboard_page(&view, snapshot.loaded_at))
}

/// Recomputed view as JSON.
pub async fn api_view(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let snapshot = current_snapshot(&state).await;
    if let Some(warning) = unusable(&snapshot) {
        return Err(ApiError::Unavailable(warning));
    }

    let session = DashboardParams::from_pairs(pairs).into_session(state.default_page_size);
    let view = recompute(&snapshot.table, session);
    Ok(Json(&view).into_response())
}

/// Single dataset detail, looked up in the unfiltered table.
pub async fn api_dataset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let snapshot = current_snapshot(&state).await;
    if let Some(warning) = unusable(&snapshot) {
        return Err(ApiError::Unavailable(warning));
    }

    let detail = detail(&snapshot.table, &id)?;
    Ok(Json(detail).into_response())
}

/// Chart series for the filtered subset.
pub async fn api_stats(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let snapshot = current_snapshot(&state).await;
    if let Some(warning) = unusable(&snapshot) {
        return Err(ApiError::Unavailable(warning));
    }

    let session = DashboardParams::from_pairs(pairs).into_session(state.default_page_size);
    let view = recompute(&snapshot.table, session);
    Ok(Json(view.stats).into_response())
}

/// Filter choices derived from the unfiltered table.
pub async fn api_filters(State(state): State<AppState>) -> Result<Response, ApiError> {
    let snapshot = current_snapshot(&state).await;
    if let Some(warning) = unusable(&snapshot) {
        return Err(ApiError::Unavailable(warning));
    }

    Ok(Json(FilterOptions::from_table(&snapshot.table)).into_response())
}

/// Liveness check.
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let snapshot = state.cache.snapshot().await;
    Json(json!({
        "status": if snapshot.warning.is_some() { "degraded" } else { "ok" },
        "datasets": snapshot.table.len(),
        "loaded_at": snapshot.loaded_at,
        "warning": snapshot.warning,
    }))
}

/// Stylesheet.
pub async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], templates::CSS)
}
