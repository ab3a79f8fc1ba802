//! Error types for the gateway crate.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use slipway_launcher::LaunchError;

/// Errors that can occur during gateway request handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// An error propagated from the launcher layer.
    #[error(transparent)]
    Launcher(#[from] LaunchError),

    /// The application name in the request is not acceptable.
    #[error("invalid application name: {0}")]
    InvalidName(String),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            GatewayError::Launcher(e) => {
                let status = match e {
                    LaunchError::ScriptNotFound { .. } => StatusCode::NOT_FOUND,
                    LaunchError::NoFreePorts { .. } => StatusCode::SERVICE_UNAVAILABLE,
                    LaunchError::UnsupportedPlatform { .. } | LaunchError::Spawn { .. } => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.kind())
            }
            GatewayError::InvalidName(_) => (StatusCode::BAD_REQUEST, "invalid_name"),
        };
        let body = json!({
            "status": "error",
            "kind": kind,
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn missing_script_maps_to_404() {
        let err = GatewayError::Launcher(LaunchError::ScriptNotFound {
            app: "Beta".to_owned(),
            path: PathBuf::from("apps/Beta/run.sh"),
        });
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn exhausted_ports_map_to_503() {
        let err = GatewayError::Launcher(LaunchError::NoFreePorts { start: 8000, end: 9000 });
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn spawn_failure_maps_to_500() {
        let err = GatewayError::Launcher(LaunchError::Spawn {
            app: "Alpha".to_owned(),
            reason: "exec failed".to_owned(),
        });
        let resp = err.into_response();
        assert_eq!(
            resp.status(),
            StatusCode::INTERNAL_SERVER_ERROR,
            "spawn failures must map to 500"
        );
    }

    #[test]
    fn invalid_name_maps_to_400() {
        let err = GatewayError::InvalidName("..".to_owned());
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
