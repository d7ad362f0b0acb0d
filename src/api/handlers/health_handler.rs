//! Liveness and health check handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: &'static str,
    pub services: ServiceStatus,
}

/// Individual service status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatus {
    pub database: ServiceHealth,
    pub sessions: ServiceHealth,
}

/// Service health with optional error message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceHealth {
    #[schema(example = "healthy")]
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealth {
    fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                status: "healthy",
                error: None,
            },
            Err(e) => Self {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        }
    }

    fn is_healthy(&self) -> bool {
        self.error.is_none()
    }
}

/// Create health routes.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/ping", get(ping))
        .route("/health", get(health_check))
}

async fn root() -> &'static str {
    "Task Manager API"
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/ping",
    tag = "Health",
    responses((status = 200, description = "Server is up", body = String, example = json!("OK")))
)]
pub async fn ping() -> &'static str {
    "OK"
}

/// Database and session store connectivity
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "All dependencies reachable", body = HealthResponse),
        (status = 503, description = "At least one dependency is down", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Response {
    let database = ServiceHealth::from_result(state.database.ping().await);
    let sessions = ServiceHealth::from_result(state.sessions.ping().await);

    let all_healthy = database.is_healthy() && sessions.is_healthy();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        services: ServiceStatus { database, sessions },
    };

    if all_healthy {
        (StatusCode::OK, Json(response)).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response()
    }
}
