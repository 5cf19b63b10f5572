//! Web server for browsing benchmark datasets.
//!
//! Provides a single-page dashboard over the loaded dataset table with:
//! - Task, area, modality, year, and id-search filters
//! - Paginated listing with a detail panel for the selected dataset
//! - Task distribution and yearly trend charts
//! - A JSON API exposing the same views

mod charts;
mod handlers;
mod routes;
mod templates;

pub use handlers::DashboardParams;
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::repository::DatasetCache;
use crate::services::PageSize;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<DatasetCache>,
    pub default_page_size: PageSize,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        Self::with_cache(
            Arc::new(DatasetCache::open(&settings.data_file)),
            settings.default_page_size,
        )
    }

    pub fn with_cache(cache: Arc<DatasetCache>, default_page_size: PageSize) -> Self {
        Self {
            cache,
            default_page_size,
        }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
