use crate::error::QuoteError;
use crate::services::get_metrics;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use service_core::error::AppError;

/// Liveness probe; answers 503 when the quote store cannot be pinged.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.quotes.store().health_check().await.map_err(|e| {
        tracing::warn!(error = %e, "Health check failed - quote store unavailable");
        store_unavailable(e)
    })?;

    Ok(Json(json!({
        "status": "ok",
        "service": state.config.service_name,
        "version": env!("CARGO_PKG_VERSION")
    })))
}

pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state
        .quotes
        .store()
        .health_check()
        .await
        .map_err(store_unavailable)?;
    Ok(StatusCode::OK)
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}

fn store_unavailable(err: QuoteError) -> AppError {
    AppError::ServiceUnavailable(anyhow::Error::new(err))
}
