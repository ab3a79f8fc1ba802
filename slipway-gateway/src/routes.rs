//! Axum route handlers for the Slipway launcher API.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use slipway_launcher::{RecordSnapshot, Registry, StopOutcome};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use uuid::Uuid;

use crate::error::GatewayError;

// ── Shared state ─────────────────────────────────────────────────────────────

type SharedRegistry = Arc<Registry>;

// ── Response types ────────────────────────────────────────────────────────────

/// Body returned by a successful launch.
#[derive(Debug, Serialize)]
pub struct LaunchResponse {
    pub status: &'static str,
    pub port: u16,
    pub launch_id: Uuid,
    pub message: String,
}

/// Body returned by the app listing.
#[derive(Debug, Serialize)]
pub struct AppsResponse {
    /// Applications with a start script on disk, sorted by name.
    pub apps: Vec<String>,
    /// Launch records, oldest launch first.
    pub records: Vec<RecordSnapshot>,
}

/// Body returned by a stop request.
#[derive(Debug, Serialize)]
pub struct StopResponse {
    #[serde(flatten)]
    pub outcome: StopOutcome,
    pub message: String,
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the application router with the given registry and static UI root.
pub fn create_router(registry: SharedRegistry, ui_dir: &FsPath) -> Router {
    Router::new()
        .route("/api/apps", get(list_apps))
        .route("/api/apps/{name}/launch", post(launch_app))
        .route("/api/apps/{name}/status", get(app_status))
        .route("/api/apps/{name}/stop", post(stop_app))
        .route("/health", get(health))
        .fallback_service(ServeDir::new(ui_dir))
        .with_state(registry)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /health` — liveness probe.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

/// `GET /api/apps` — applications on disk plus all launch records.
pub async fn list_apps(State(registry): State<SharedRegistry>) -> impl IntoResponse {
    Json(AppsResponse {
        apps: registry.discover().await,
        records: registry.entries().await,
    })
}

/// `POST /api/apps/:name/launch` — start the named application on a fresh
/// port.
///
/// # Errors
/// Returns [`GatewayError::InvalidName`] for names that would escape the
/// apps directory, or a launcher error (missing script, exhausted ports,
/// spawn failure) mapped to its HTTP status.
pub async fn launch_app(
    State(registry): State<SharedRegistry>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    validate_name(&name)?;
    let launched = registry.launch(&name).await?;
    Ok((
        StatusCode::OK,
        Json(LaunchResponse {
            status: "success",
            port: launched.port,
            launch_id: launched.launch_id,
            message: format!("{name} launched on port {}", launched.port),
        }),
    ))
}

/// `GET /api/apps/:name/status` — non-blocking liveness poll.
pub async fn app_status(
    State(registry): State<SharedRegistry>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    Json(registry.status(&name).await)
}

/// `POST /api/apps/:name/stop` — graceful stop with forced-kill fallback.
pub async fn stop_app(
    State(registry): State<SharedRegistry>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let outcome = registry.stop(&name).await;
    let message = match &outcome {
        StopOutcome::NotLaunched => format!("{name} was not launched."),
        StopOutcome::NotRunning => format!("{name} is not running."),
        StopOutcome::Stopped { .. } => format!("{name} stopped."),
    };
    Json(StopResponse { outcome, message })
}

/// Reject names that could resolve outside the apps directory.
fn validate_name(name: &str) -> Result<(), GatewayError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(GatewayError::InvalidName(name.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use slipway_launcher::RegistryConfig;
    use tower::ServiceExt;

    use super::*;

    fn test_router(apps_dir: &FsPath) -> Router {
        let registry = match Registry::for_host(RegistryConfig::new(apps_dir)) {
            Ok(r) => Arc::new(r),
            Err(e) => panic!("host platform must be supported in tests: {e}"),
        };
        create_router(registry, FsPath::new("ui"))
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = match axum::body::to_bytes(resp.into_body(), 64 * 1024).await {
            Ok(b) => b,
            Err(e) => panic!("failed to read body: {e}"),
        };
        match serde_json::from_slice(&bytes) {
            Ok(v) => v,
            Err(e) => panic!("invalid JSON: {e}"),
        }
    }

    fn get_request(uri: &str) -> Request<Body> {
        match Request::builder().uri(uri).body(Body::empty()) {
            Ok(r) => r,
            Err(e) => panic!("failed to build request: {e}"),
        }
    }

    fn post_request(uri: &str) -> Request<Body> {
        match Request::builder().method("POST").uri(uri).body(Body::empty()) {
            Ok(r) => r,
            Err(e) => panic!("failed to build request: {e}"),
        }
    }

    #[tokio::test]
    async fn health_returns_ok_with_status_field() {
        let apps = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("tempdir failed: {e}"),
        };
        let app = test_router(apps.path());
        let resp = match app.oneshot(get_request("/health")).await {
            Ok(r) => r,
            Err(e) => panic!("handler error: {e}"),
        };
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn status_of_unknown_app_is_not_launched() {
        let apps = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("tempdir failed: {e}"),
        };
        let app = test_router(apps.path());
        let resp = match app.oneshot(get_request("/api/apps/Ghost/status")).await {
            Ok(r) => r,
            Err(e) => panic!("handler error: {e}"),
        };
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["status"], "not_launched");
    }

    #[tokio::test]
    async fn launch_with_missing_script_is_404_with_kind() {
        let apps = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("tempdir failed: {e}"),
        };
        let app = test_router(apps.path());
        let resp = match app.oneshot(post_request("/api/apps/Beta/launch")).await {
            Ok(r) => r,
            Err(e) => panic!("handler error: {e}"),
        };
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = body_json(resp).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["kind"], "script_not_found");
        assert!(
            body["message"].as_str().is_some_and(|m| m.contains("Beta")),
            "error message must name the app"
        );
    }

    #[tokio::test]
    async fn launch_with_traversal_name_is_rejected() {
        let apps = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("tempdir failed: {e}"),
        };
        let app = test_router(apps.path());
        let resp = match app.oneshot(post_request("/api/apps/../launch")).await {
            Ok(r) => r,
            Err(e) => panic!("handler error: {e}"),
        };
        // `..` is either rejected by the router or by name validation;
        // it must never reach the filesystem as a script path.
        assert!(
            resp.status() == StatusCode::BAD_REQUEST || resp.status() == StatusCode::NOT_FOUND,
            "traversal name must not be treated as a launchable app, got {}",
            resp.status()
        );
    }

    #[tokio::test]
    async fn stop_of_unknown_app_is_not_launched_with_message() {
        let apps = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("tempdir failed: {e}"),
        };
        let app = test_router(apps.path());
        let resp = match app.oneshot(post_request("/api/apps/Ghost/stop")).await {
            Ok(r) => r,
            Err(e) => panic!("handler error: {e}"),
        };
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["status"], "not_launched");
        assert_eq!(body["message"], "Ghost was not launched.");
    }

    #[tokio::test]
    async fn list_apps_reports_discovered_scripts() {
        let apps = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("tempdir failed: {e}"),
        };
        let platform = match slipway_launcher::Platform::host() {
            Ok(p) => p,
            Err(e) => panic!("host platform must be supported in tests: {e}"),
        };
        let dir = apps.path().join("Agent");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            panic!("failed to create app dir: {e}");
        }
        if let Err(e) = std::fs::write(dir.join(platform.script_name()), "#!/bin/sh\n") {
            panic!("failed to write script: {e}");
        }

        let app = test_router(apps.path());
        let resp = match app.oneshot(get_request("/api/apps")).await {
            Ok(r) => r,
            Err(e) => panic!("handler error: {e}"),
        };
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["apps"], serde_json::json!(["Agent"]));
        assert_eq!(body["records"], serde_json::json!([]));
    }
}
