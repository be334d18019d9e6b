use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Local;
use tokio::time::{timeout, Duration};
use tracing::error;

use backend_application::commands::lifecycle_commands::run_job;
use backend_application::commands::LifecycleJob;
use backend_application::queries::{audit_queries, event_queries};
use backend_application::AppState;
use backend_domain::{AuditLogQuery, AuditRecord, Event};

use super::parse_event_id;
use crate::error::HttpError;

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn health_ready(State(state): State<AppState>) -> StatusCode {
    let timeout_secs = state.config.request_timeout_seconds.max(1);
    let timeout_duration = Duration::from_secs(timeout_secs);
    match timeout(timeout_duration, state.health_service.check_database()).await {
        Ok(Ok(true)) => StatusCode::OK,
        Ok(Ok(false)) => StatusCode::SERVICE_UNAVAILABLE,
        Ok(Err(err)) => {
            error!("ready check failed: {}", err);
            StatusCode::SERVICE_UNAVAILABLE
        }
        Err(_) => {
            error!("ready check timeout after {}s", timeout_secs);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload)
}

pub async fn list_audit_logs(
    State(state): State<AppState>,
    Query(query): Query<AuditLogQuery>,
) -> Result<Json<Vec<AuditRecord>>, HttpError> {
    let records = audit_queries::list_audit_logs(&state, query)
        .await
        .map_err(HttpError::Query)?;
    Ok(Json(records))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, HttpError> {
    let id = parse_event_id(&id).map_err(HttpError::Query)?;
    let event = event_queries::get_event(&state, id)
        .await
        .map_err(HttpError::Query)?;
    Ok(Json(event))
}

/// Runs a lifecycle job immediately, as the scheduler would today.
pub async fn run_lifecycle_job(
    State(state): State<AppState>,
    Path(job): Path<String>,
) -> Result<Json<Event>, HttpError> {
    let job = LifecycleJob::parse(&job)
        .ok_or_else(|| HttpError::BadRequest(format!("unknown job '{}'", job)))?;
    let event = run_job(&state, job, Local::now().date_naive())
        .await
        .map_err(HttpError::Query)?;
    Ok(Json(event))
}
