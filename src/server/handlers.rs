//! Route handlers

use crate::server::dto::{CrawlRequest, CrawlResponse, HealthResponse};
use crate::server::errors::ApiError;
use crate::server::AppState;
use crate::url::{parse_target_url, remove_duplicates};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

/// `POST /crawl`
///
/// Validates the batch, removes duplicate URLs and runs the crawl. Per-URL
/// failures come back in `errors` with status 200; only a failure of the
/// crawl machinery produces a 500. A body without a JSON content type is a
/// 415, any other undecodable body a 400.
pub async fn crawl(
    State(state): State<AppState>,
    payload: Result<Json<CrawlRequest>, JsonRejection>,
) -> Result<Json<CrawlResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        let message = format!("failed to decode request body: {}", rejection.body_text());
        match rejection {
            JsonRejection::MissingJsonContentType(_) => ApiError::UnsupportedMediaType(message),
            _ => ApiError::BadRequest(message),
        }
    })?;

    if request.urls.is_empty() {
        return Err(ApiError::BadRequest(
            "at least one URL is required".to_string(),
        ));
    }

    for url in &request.urls {
        parse_target_url(url).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    }

    let urls = remove_duplicates(request.urls);
    tracing::info!(urls = urls.len(), keywords = request.keywords.len(), "Received crawl request");

    // Fires if the client goes away and this future is dropped.
    let cancel = state.shutdown.child_token();
    let _cancel_on_drop = cancel.clone().drop_guard();

    let report = state
        .service
        .crawl(urls, request.keywords, cancel)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Crawl failed");
            ApiError::Internal(e.to_string())
        })?;

    Ok(Json(CrawlResponse::from(report)))
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
