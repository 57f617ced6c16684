//! HTTP API: health check and single-page audits

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use seolens_core::{AuditResult, PageInspector, audit_url};

#[derive(Clone)]
struct AppState {
    inspector: Arc<dyn PageInspector>,
}

#[derive(Debug, Deserialize)]
struct AuditQuery {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuditRequest {
    #[serde(default)]
    url: String,
}

/// JSON error body: `{"error": ..., "details": ...}`
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    error: &'static str,
    details: Option<String>,
}

impl ApiError {
    fn bad_request(error: &'static str, details: Option<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
            details,
        }
    }

    fn audit_failed(details: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: "Error auditing website",
            details: Some(details),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

pub fn build_router(inspector: Arc<dyn PageInspector>) -> Router {
    let state = AppState { inspector };

    Router::new()
        .route("/api/health", get(health))
        .route("/api/audit", get(audit_get).post(audit_post))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

pub async fn serve(host: &str, port: u16, inspector: Arc<dyn PageInspector>) -> anyhow::Result<()> {
    let app = build_router(inspector);
    let addr = format!("{host}:{port}");

    info!("seolens API starting on http://{addr}");
    info!("  GET  /api/health");
    info!("  POST /api/audit  (body: {{\"url\": \"https://example.com\"}})");
    info!("  GET  /api/audit?url=https://example.com");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "SEO Auditor API is running",
    }))
}

async fn run_audit(state: &AppState, url: &str) -> Result<Json<AuditResult>, ApiError> {
    match audit_url(state.inspector.as_ref(), url, Utc::now()).await {
        Ok(result) => Ok(Json(result)),
        Err(err) => {
            warn!(url, error = %err, "audit failed");
            Err(ApiError::audit_failed(err.to_string()))
        }
    }
}

async fn audit_get(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<AuditResult>, ApiError> {
    let url = query.url.unwrap_or_default();
    if url.trim().is_empty() {
        return Err(ApiError::bad_request("URL query parameter is required", None));
    }
    run_audit(&state, url.trim()).await
}

async fn audit_post(
    State(state): State<AppState>,
    payload: Result<Json<AuditRequest>, JsonRejection>,
) -> Result<Json<AuditResult>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::bad_request("Invalid request body", Some(rejection.body_text()))
    })?;

    if request.url.trim().is_empty() {
        return Err(ApiError::bad_request("URL is required", None));
    }
    run_audit(&state, request.url.trim()).await
}
