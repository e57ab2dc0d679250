use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use service::blessing::store::BlessingStore;
use service::blessing::{BlessingInput, BlessingRecord};

use crate::errors::ApiError;

/// List the wall, newest first
pub async fn list_blessings(
    State(store): State<Arc<dyn BlessingStore>>,
) -> Result<Json<Vec<BlessingRecord>>, ApiError> {
    let all = store.list().await?;
    Ok(Json(all))
}

/// Accept a submission; the stored record's timestamp comes back as `id`
pub async fn submit_blessing(
    State(store): State<Arc<dyn BlessingStore>>,
    payload: Result<Json<BlessingInput>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    // malformed or mistyped bodies are the client's problem, not a 500
    let Json(input) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let record = store.submit(input).await?;
    info!(timestamp = record.timestamp, "blessing accepted");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({"success": true, "id": record.timestamp})),
    ))
}

/// Empty success for OPTIONS; the CORS layer supplies the header set and
/// the store is never touched.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any unrecognized method on the API path.
pub async fn method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}
