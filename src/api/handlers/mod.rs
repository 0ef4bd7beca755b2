use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::models::*;

const EMPTY_FILTER_MESSAGE: &str = "Please select at least one search filter.";

// ============================================================
// Responses
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsResponse {
    pub success: bool,
    pub total: usize,
    pub options: FilterOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub count: usize,
    pub results: Vec<Record>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub total: usize,
    /// `None` until the first load has been published.
    pub source: Option<DataSource>,
    pub loaded_at: Option<DateTime<Utc>>,
}

// ============================================================
// Error Handling
// ============================================================

/// Errors a client can cause. None of them are server faults, so they are
/// not logged as errors.
#[derive(Debug)]
pub enum ApiError {
    /// The request was well-formed but not acceptable, e.g. no filters.
    Validation(String),
    /// The query string could not be decoded.
    MalformedQuery(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = match self {
            ApiError::Validation(error) | ApiError::MalformedQuery(error) => error,
        };

        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                success: false,
                error,
            }),
        )
            .into_response()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("Rejected query string: {}", rejection.body_text());
        ApiError::MalformedQuery(rejection.body_text())
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health(State(catalog): State<Catalog>) -> Json<HealthResponse> {
    let dataset = catalog.snapshot();
    let provenance = dataset.provenance();
    Json(HealthResponse {
        status: "ok".to_string(),
        total: dataset.len(),
        source: provenance.map(|p| p.source),
        loaded_at: provenance.map(|p| p.loaded_at),
    })
}

// ============================================================
// Exoplanets
// ============================================================

pub async fn options(State(catalog): State<Catalog>) -> Json<OptionsResponse> {
    let dataset = catalog.snapshot();
    Json(OptionsResponse {
        success: true,
        total: dataset.len(),
        options: dataset.options().clone(),
    })
}

pub async fn search(
    State(catalog): State<Catalog>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(pairs) = query?;
    let filter = Filter::from(SearchParams::from_pairs(pairs));
    if filter.is_empty() {
        tracing::debug!("Rejected search without filters");
        return Err(ApiError::Validation(EMPTY_FILTER_MESSAGE.to_string()));
    }

    let dataset = catalog.snapshot();
    let results: Vec<Record> = dataset.search(&filter).into_iter().cloned().collect();
    tracing::debug!("Search {:?} matched {} records", filter, results.len());

    Ok(Json(SearchResponse {
        success: true,
        count: results.len(),
        results,
    }))
}
