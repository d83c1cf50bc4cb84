use crate::dtos::{CreateQuoteRequest, DeletedQuoteResponse, QuoteResponse};
use crate::error::QuoteError;
use crate::services::ReconcileReport;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

pub async fn hello() -> &'static str {
    "world"
}

pub async fn list_quotes(
    State(state): State<AppState>,
) -> Result<Json<Vec<QuoteResponse>>, QuoteError> {
    let quotes = state.quotes.list_quotes().await?;
    Ok(Json(quotes.into_iter().map(QuoteResponse::from).collect()))
}

pub async fn get_quote(
    State(state): State<AppState>,
    Path(quote_id): Path<String>,
) -> Result<Json<QuoteResponse>, QuoteError> {
    let quote = state.quotes.get_quote(&quote_id).await?;
    Ok(Json(QuoteResponse::from(quote)))
}

pub async fn create_quote(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuoteRequest>,
) -> Result<Json<QuoteResponse>, QuoteError> {
    let quote = state.quotes.create_quote(payload.into()).await?;
    Ok(Json(QuoteResponse::from(quote)))
}

pub async fn delete_quote(
    State(state): State<AppState>,
    Path(quote_id): Path<String>,
) -> Result<Json<DeletedQuoteResponse>, QuoteError> {
    let id = state.quotes.delete_quote(&quote_id).await?;
    Ok(Json(DeletedQuoteResponse { id }))
}

pub async fn daily_quote(
    State(state): State<AppState>,
) -> Result<Json<QuoteResponse>, QuoteError> {
    let quote = state.quotes.daily_quote().await.map_err(|e| {
        tracing::warn!(error = %e, kind = e.kind(), "Daily quote unavailable");
        e
    })?;
    Ok(Json(QuoteResponse::from(quote)))
}

pub async fn reconcile_index(
    State(state): State<AppState>,
) -> Result<Json<ReconcileReport>, QuoteError> {
    let report = state.quotes.reconcile_index().await?;
    Ok(Json(report))
}
