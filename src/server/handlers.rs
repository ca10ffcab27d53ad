//! API endpoint handlers.

use axum::{
    extract::{rejection::JsonRejection, Multipart, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::ApiError;
use super::AppState;
use crate::storage::Storage;
use crate::submit::{now_iso, BatchReport, BatchRequest, BatchStatus};
use crate::url::{extract_urls_from_bytes, validate_unique_urls, validate_urls, SourceKind};

const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    status: &'static str,
    message: String,
    #[serde(flatten)]
    report: BatchReport,
}

/// Runs a batch for the posted URLs and returns every per-URL result.
pub async fn index_urls(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<IndexResponse>, ApiError> {
    if state.runner.is_busy() {
        return Err(crate::SubmitError::Busy.into());
    }

    let Json(body) =
        body.map_err(|e| ApiError::BadRequest(format!("Invalid request: {}", e.body_text())))?;

    if !body.get("urls").map(Value::is_array).unwrap_or(false) {
        return Err(ApiError::BadRequest("URLs array is required".to_string()));
    }

    let mut request: BatchRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request: {}", e)))?;

    if request.protocol_key.is_none() {
        request.protocol_key = state.default_protocol_key.clone();
    }
    if !request
        .vendor_credentials
        .as_ref()
        .is_some_and(Value::is_object)
    {
        request.vendor_credentials = state
            .default_vendor_credentials
            .as_ref()
            .map(|c| c.as_value().clone());
    }

    // A panic inside the batch surfaces as a join error; the runner's
    // session permit is dropped during unwinding.
    let runner = state.runner.clone();
    let report = tokio::spawn(async move { runner.submit(request).await })
        .await
        .map_err(|e| {
            tracing::error!("Batch aborted: {}", e);
            ApiError::Internal("Internal server error".to_string())
        })??;

    // Not awaited: history writes never hold up or change the response
    state.persist(report.clone());

    Ok(Json(IndexResponse {
        status: "success",
        message: format!("Processed {} URLs", report.summary.total),
        report,
    }))
}

/// Reports whether a batch is running, or the last batch's results.
pub async fn batch_status(State(state): State<AppState>) -> Json<Value> {
    let body = match state.runner.status() {
        BatchStatus::InProgress => json!({
            "status": "indexing",
            "in_progress": true,
            "message": "Indexing in progress...",
        }),
        BatchStatus::Complete(report) => json!({
            "status": "complete",
            "in_progress": false,
            "total": report.summary.total,
            "successful": report.summary.successful,
            "failed": report.summary.failed,
            "results": report.results,
        }),
        BatchStatus::Idle => json!({
            "status": "idle",
            "in_progress": false,
            "message": "Ready to index",
        }),
    };
    Json(body)
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<usize>,
    pub stats: Option<String>,
}

/// Returns stored submissions newest-first, or aggregate statistics.
pub async fn get_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Response, ApiError> {
    if params.stats.as_deref() == Some("true") {
        let now = chrono::Utc::now();
        let stats = state.with_storage(move |s| s.history_stats(now)).await?;
        return Ok(Json(stats).into_response());
    }

    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let history = state.with_storage(move |s| s.read_history(limit)).await?;

    Ok(Json(json!({
        "total": history.len(),
        "showing": history.len(),
        "history": history,
    }))
    .into_response())
}

pub async fn clear_history(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let removed = state.with_storage(|s| s.clear_history()).await?;
    tracing::info!("Cleared {} history records", removed);

    Ok(Json(json!({
        "status": "success",
        "message": "History cleared successfully",
    })))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": now_iso(),
    }))
}

/// Extracts candidate URLs from an uploaded `file` field.
pub async fn extract_urls(mut multipart: Multipart) -> Result<Json<Value>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        let kind = SourceKind::from_file_name(&file_name);
        let candidates = extract_urls_from_bytes(&bytes, kind)
            .map_err(|e| ApiError::Internal(format!("Failed to extract URLs: {}", e)))?;
        let urls = if kind.deduplicates() {
            validate_unique_urls(&candidates)
        } else {
            validate_urls(&candidates)
        };

        tracing::debug!("Extracted {} URLs from '{}'", urls.len(), file_name);
        return Ok(Json(json!({
            "success": true,
            "count": urls.len(),
            "urls": urls,
        })));
    }

    Err(ApiError::BadRequest("No file provided".to_string()))
}
