//! Router-level tests driving the web server without binding a socket.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use benchex::repository::DatasetCache;
use benchex::server::{create_router, AppState};
use benchex::services::PageSize;

const CSV: &str = "dataset_id,task,area,modalities,associated_tasks,benchmark_urls,year_published,license,languages,description
SQuAD,QA,NLP,Text,\"qa, reading comprehension\",\"http://a, http://b,\",2016,CC-BY-SA,en,Reading comprehension questions
COCO,Detection,Vision,\"Image, Text\",captioning,http://c,2014,CC-BY,en,
LibriSpeech,ASR,Speech,Audio,,,2015,CC-BY,en,Read English speech
";

fn router_for(path: &Path) -> Router {
    let cache = Arc::new(DatasetCache::open(path));
    create_router(AppState::with_cache(cache, PageSize::DEFAULT))
}

fn setup() -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("datasets.csv");
    std::fs::write(&path, CSV).unwrap();
    let router = router_for(&path);
    (dir, router)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn dashboard_lists_all_datasets() {
    let (_dir, router) = setup();
    let (status, body) = get(&router, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Showing 3 of 3 datasets (Page 1 of 1)"));
    assert!(body.contains("LibriSpeech"));
}

#[tokio::test]
async fn dashboard_applies_filters_and_keeps_selection() {
    let (_dir, router) = setup();
    let (status, body) = get(&router, "/?task=QA&selected=COCO").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Showing 1 of 1 datasets"));
    // COCO is filtered out of the table but still shown in the detail panel.
    assert!(body.contains("Dataset Details"));
    assert!(body.contains("<h3>COCO</h3>"));
}

#[tokio::test]
async fn dashboard_accepts_repeated_modalities() {
    let (_dir, router) = setup();
    let (_, body) = get(&router, "/?modalities=Audio&modalities=Image").await;
    assert!(body.contains("Showing 2 of 2 datasets"));
}

#[tokio::test]
async fn dashboard_tolerates_bad_numbers() {
    let (_dir, router) = setup();
    let (status, body) = get(&router, "/?page=abc&per_page=7&year_from=x").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Showing 3 of 3 datasets (Page 1 of 1)"));
}

#[tokio::test]
async fn api_view_returns_page_and_stats() {
    let (_dir, router) = setup();
    let (status, body) = get(&router, "/api/view?year_from=2015&year_to=2016").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["page"]["total_rows"], 2);
    assert_eq!(json["page"]["total_pages"], 1);
    assert_eq!(json["rows"].as_array().unwrap().len(), 2);
    assert_eq!(json["stats"]["yearly_trend"][0]["year"], 2015);
}

#[tokio::test]
async fn api_dataset_detail_and_not_found() {
    let (_dir, router) = setup();

    let (status, body) = get(&router, "/api/datasets/SQuAD").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["benchmark_cnt"], 2);
    assert_eq!(json["associated_task_cnt"], 2);
    assert_eq!(json["modality_list"][0], "Text");

    let (status, _) = get(&router, "/api/datasets/ImageNet").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_filters_lists_choices() {
    let (_dir, router) = setup();
    let (status, body) = get(&router, "/api/filters").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["modalities"], serde_json::json!(["Audio", "Image", "Text"]));
    assert_eq!(json["year_bounds"], serde_json::json!([2014, 2016]));
}

#[tokio::test]
async fn missing_source_degrades_to_warning() {
    let dir = tempfile::tempdir().unwrap();
    let router = router_for(&dir.path().join("absent.csv"));

    let (status, body) = get(&router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"class="warning""#));

    let (status, _) = get(&router, "/api/view").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = get(&router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("degraded"));
}

#[tokio::test]
async fn headers_only_source_is_unavailable_on_every_api_route() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("datasets.csv");
    let header = CSV.lines().next().unwrap();
    std::fs::write(&path, format!("{}\n", header)).unwrap();
    let router = router_for(&path);

    for uri in ["/api/view", "/api/stats", "/api/filters", "/api/datasets/SQuAD"] {
        let (status, body) = get(&router, uri).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        assert!(body.contains("Please place your dataset CSV file"), "{uri}");
    }

    let (status, body) = get(&router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"class="warning""#));
}

#[tokio::test]
async fn stylesheet_is_served() {
    let (_dir, router) = setup();
    let (status, body) = get(&router, "/static/style.css").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(".pagination"));
}

#[tokio::test]
async fn cache_reloads_changed_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("datasets.csv");
    std::fs::write(&path, CSV).unwrap();
    let cache = DatasetCache::open(&path);
    assert_eq!(cache.snapshot().await.table.len(), 3);
    assert!(!cache.refresh_if_changed().await);

    let held = cache.snapshot().await;

    let mut extended = CSV.to_string();
    extended.push_str("MNIST,Classification,Vision,Image,,,1998,,,\n");
    std::fs::write(&path, extended).unwrap();
    let file = std::fs::File::options().write(true).open(&path).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(10))
        .unwrap();

    assert!(cache.refresh_if_changed().await);
    assert_eq!(cache.snapshot().await.table.len(), 4);
    // Readers holding the old snapshot keep a complete table.
    assert_eq!(held.table.len(), 3);
}
