//! Request handlers for the stock endpoints.

use std::sync::Arc;

use axum::{body::Body, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::catalog::{Record, RecordStore};
use crate::http::error::ApiError;
use crate::http::form;
use crate::http::server::AppState;

/// Body of a successful lookup: `{"data":[{"symbol": <record>}]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub data: Vec<QuoteEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteEntry {
    pub symbol: Record,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub records: usize,
}

/// `GET /stocks`
pub async fn list_stocks(State(state): State<AppState>) -> Json<Arc<RecordStore>> {
    Json(Arc::clone(&state.store))
}

/// `POST /stocks`
pub async fn lookup_stock(
    State(state): State<AppState>,
    body: Body,
) -> Result<Json<QuoteResponse>, ApiError> {
    let bytes = axum::body::to_bytes(body, state.max_body_size)
        .await
        .map_err(ApiError::BodyUnreadable)?;

    let oid = form::extract_oid(&bytes);
    tracing::debug!(oid = %oid, "Looking up stock");

    let record = state
        .store
        .get(&oid)
        .cloned()
        .ok_or(ApiError::NotFound(oid))?;

    Ok(Json(QuoteResponse {
        data: vec![QuoteEntry { symbol: record }],
    }))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "operational",
        version: env!("CARGO_PKG_VERSION"),
        records: state.store.len(),
    })
}
