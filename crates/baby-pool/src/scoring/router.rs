use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::domain::CallerIdentity;
use super::repository::PoolStore;
use super::service::{ScoringError, ScoringService};

/// Router builder exposing the score calculation endpoint.
pub fn scoring_router<S>(service: Arc<ScoringService<S>>) -> Router
where
    S: PoolStore + 'static,
{
    Router::new()
        .route("/api/v1/scores/calculate", post(calculate_handler::<S>))
        .with_state(service)
}

pub(crate) async fn calculate_handler<S>(
    State(service): State<Arc<ScoringService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: PoolStore + 'static,
{
    let caller = caller_from_headers(&headers);
    match service.calculate_and_save(caller.as_ref()) {
        Ok(run) => axum::Json(run.summary).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Reads the bearer token as the caller identity. Only presence is checked.
pub fn caller_from_headers(headers: &HeaderMap) -> Option<CallerIdentity> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(CallerIdentity::new(token))
    }
}

impl IntoResponse for ScoringError {
    fn into_response(self) -> Response {
        let payload = json!({
            "error": {
                "status": self.code(),
                "message": self.message(),
            }
        });
        (self.status_code(), axum::Json(payload)).into_response()
    }
}
