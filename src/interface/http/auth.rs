use axum::{
    extract::{rejection::QueryRejection, Query, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::handlers::{AppError, AppState};

const API_KEY_PARAM: &str = "api_key";

/// Raw query pairs in request order; repeated keys are kept
type QueryPairs = Vec<(String, String)>;

/// First `api_key` value in the query string, if any
fn first_api_key(pairs: QueryPairs) -> Option<String> {
    pairs
        .into_iter()
        .find(|(name, _)| name == API_KEY_PARAM)
        .map(|(_, value)| value)
}

/// Reject requests whose `api_key` query parameter is missing or wrong.
///
/// When the key is repeated only the first value counts. A query string
/// that fails to decode counts as a missing key.
pub async fn require_api_key(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
    request: Request,
    next: Next,
) -> Response {
    let provided = query.ok().and_then(|Query(pairs)| first_api_key(pairs));

    match provided {
        Some(key) if state.api_key.matches(&key) => next.run(request).await,
        _ => {
            warn!(
                "Rejected {} {}: missing or invalid API key",
                request.method(),
                request.uri().path()
            );
            AppError::Unauthorized.into_response()
        }
    }
}
