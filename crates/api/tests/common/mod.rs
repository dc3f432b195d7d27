#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use stables_api::config::{ServerConfig, SimulationConfig, SnapshotConfig};
use stables_api::router::build_app_router;
use stables_api::state::AppState;

/// Occupancy document served by default in tests.
pub const LOTS_DOC: &str = r#"[
    {
        "lot_id": "Lot_A",
        "zone_type": "zone_1",
        "total_spots": 3,
        "available_spots": 2,
        "updated_at": "2024-03-01T12:00:00+00:00",
        "parking_status": [
            {"spot_id": "spot_1", "status": "available"},
            {"spot_id": "spot_2", "status": "available"},
            {"spot_id": "spot_3", "status": "occupied"}
        ]
    },
    {
        "lot_id": "Lot_B",
        "zone_type": "zone_2",
        "total_spots": 1,
        "available_spots": 0,
        "updated_at": "2024-03-01T12:00:00+00:00",
        "parking_status": [
            {"spot_id": "spot_4", "status": "occupied"}
        ]
    }
]"#;

/// Build a test `ServerConfig` pointed at `snapshot_path`.
///
/// `max_age` is zero so every `GET /parking` rereads the file, letting tests
/// rewrite the document between requests.
pub fn test_config(snapshot_path: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        snapshot: SnapshotConfig {
            path: snapshot_path.to_path_buf(),
            refresh_interval: Duration::from_secs(1),
            max_age: Duration::ZERO,
        },
        simulation: SimulationConfig {
            enabled: false,
            interval: Duration::from_secs(1),
            lots: Vec::new(),
        },
        seed_demo_users: false,
    }
}

/// A router plus the state and temp directory backing it.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub snapshot_path: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    /// Replace the occupancy document on disk.
    pub fn write_snapshot(&self, doc: &str) {
        std::fs::write(&self.snapshot_path, doc).expect("write snapshot");
    }

    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router with all middleware layers, serving
/// `doc` as the occupancy snapshot (or no file at all when `None`).
pub fn build_test_app_with(doc: Option<&str>) -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let snapshot_path = dir.path().join("simulated_data.json");
    if let Some(doc) = doc {
        std::fs::write(&snapshot_path, doc).expect("write snapshot");
    }

    let config = test_config(&snapshot_path);
    let state = AppState::in_memory(config.clone());
    let router = build_app_router(state.clone(), &config);

    TestApp {
        router,
        state,
        snapshot_path,
        _dir: dir,
    }
}

/// Build the app serving [`LOTS_DOC`].
pub fn build_test_app() -> TestApp {
    build_test_app_with(Some(LOTS_DOC))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    post_raw(app, uri, &body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).expect("response body is UTF-8")
}
