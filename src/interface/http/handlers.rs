use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::application::StatsService;
use crate::config::ApiKey;
use crate::domain::ContainerStat;
use crate::ports::CollectorError;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized. Invalid API key.";

/// Errors surfaced to API clients as `{"error": "..."}`
#[derive(Debug)]
pub enum AppError {
    Unauthorized,
    Collector(CollectorError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized => (StatusCode::FORBIDDEN, UNAUTHORIZED_MESSAGE.to_string()),
            AppError::Collector(e) => {
                error!("Failed to collect container stats: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<CollectorError> for AppError {
    fn from(err: CollectorError) -> Self {
        AppError::Collector(err)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub stats_service: Arc<StatsService>,
    pub api_key: ApiKey,
}

/// Handler for GET /stats
pub async fn stats_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContainerStat>>, AppError> {
    let stats = state.stats_service.collect().await?;
    Ok(Json(stats))
}
