//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint. Queue status runs issue one
//! blocking evaluator query per hour, so they execute on the blocking pool.

use axum::{
    extract::{Query, State},
    Json,
};

use super::dto::{HealthResponse, QueueStatusQuery, QueueStatusReport, SummaryResponse};
use super::error::AppError;
use super::state::AppState;
use crate::db::repository::MsbRepository;
use crate::services::{
    build_report, group_queue_status, order_projects, query_queue_status, QueueStatus,
    QueueStatusRequest,
};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the evaluator is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check() {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Queue Status
// =============================================================================

fn run_queue_status(state: &AppState, request: &QueueStatusRequest) -> Result<QueueStatus, AppError> {
    Ok(query_queue_status(
        state.repository.as_ref(),
        &state.config.sites,
        &state.config.queue_status,
        request,
    )?)
}

/// GET /v1/queue-status
///
/// Ordered per-project queue status for one telescope night.
pub async fn get_queue_status(
    State(state): State<AppState>,
    Query(query): Query<QueueStatusQuery>,
) -> HandlerResult<QueueStatusReport> {
    let (request, order) = query.into_request()?;

    let report = tokio::task::spawn_blocking(move || {
        let status = run_queue_status(&state, &request)?;
        Ok::<_, AppError>(build_report(state.repository.as_ref(), &status, order)?)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(report))
}

/// GET /v1/queue-status/summary
///
/// Hour, MSB and instrument totals per project.
pub async fn get_queue_status_summary(
    State(state): State<AppState>,
    Query(query): Query<QueueStatusQuery>,
) -> HandlerResult<SummaryResponse> {
    let (request, order) = query.into_request()?;

    let response = tokio::task::spawn_blocking(move || {
        let status = run_queue_status(&state, &request)?;
        let ordered = order_projects(state.repository.as_ref(), &status, order)?;
        Ok::<_, AppError>(SummaryResponse {
            telescope: status.telescope.clone(),
            start: status.window.start,
            end: status.window.end,
            sample_count: status.window.sample_count(),
            order: ordered,
            summary: group_queue_status(&status),
        })
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(response))
}
