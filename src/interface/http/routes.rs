use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::application::StatsService;
use crate::config::ApiKey;

use super::auth::require_api_key;
use super::handlers::{stats_handler, AppState};

pub fn create_router(stats_service: Arc<StatsService>, api_key: ApiKey) -> Router {
    let state = AppState {
        stats_service,
        api_key,
    };

    Router::new()
        .route("/stats", get(stats_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::{ContainerStat, Snapshot};
    use crate::ports::{CollectorError, StatsSource};

    const KEY: &str = "123abc";

    /// Records how often it was asked for a snapshot
    struct StubSource {
        calls: Arc<AtomicUsize>,
        fail: bool,
        stats: Vec<ContainerStat>,
    }

    #[async_trait]
    impl StatsSource for StubSource {
        async fn snapshot(&self) -> Result<Snapshot, CollectorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CollectorError::Spawn {
                    command: "docker stats".to_string(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "No such file or directory",
                    ),
                });
            }
            Ok(Snapshot::new(self.stats.clone(), Vec::new()))
        }
    }

    fn router_with(fail: bool, stats: Vec<ContainerStat>) -> (Router, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = StubSource {
            calls: calls.clone(),
            fail,
            stats,
        };
        let service = Arc::new(StatsService::new(Arc::new(source)));
        (create_router(service, ApiKey::new(KEY)), calls)
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_api_key_is_forbidden() {
        let (router, calls) = router_with(false, Vec::new());

        let (status, body) = get_json(router, "/stats").await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": "Unauthorized. Invalid API key." }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_wrong_api_key_is_forbidden() {
        let (router, calls) = router_with(false, Vec::new());

        let (status, body) = get_json(router, "/stats?api_key=123abd").await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": "Unauthorized. Invalid API key." }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_repeated_api_key_uses_first_value() {
        let (router, calls) = router_with(false, vec![ContainerStat::new("web", 1.0, 2.0)]);
        let (status, _) = get_json(router, "/stats?api_key=123abc&api_key=zzz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let (router, calls) = router_with(false, Vec::new());
        let (status, _) = get_json(router, "/stats?api_key=zzz&api_key=123abc").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_api_key_is_forbidden() {
        let (router, calls) = router_with(false, Vec::new());

        let (status, _) = get_json(router, "/stats?api_key=").await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_api_key_returns_stats_in_order() {
        let stats = vec![
            ContainerStat::new("web", 12.34, 1117.184),
            ContainerStat::new("db", 0.5, 256.0),
        ];
        let (router, calls) = router_with(false, stats);

        let (status, body) = get_json(router, "/stats?api_key=123abc").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                { "name": "web", "cpuUsage": 12.34, "memoryUsage": 1117.184 },
                { "name": "db", "cpuUsage": 0.5, "memoryUsage": 256.0 }
            ])
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_containers_returns_empty_array() {
        let (router, _) = router_with(false, Vec::new());

        let (status, body) = get_json(router, "/stats?api_key=123abc").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_collector_failure_is_internal_error() {
        let (router, calls) = router_with(true, Vec::new());

        let (status, body) = get_json(router, "/stats?api_key=123abc").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "Failed to run 'docker stats': No such file or directory" })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (router, calls) = router_with(false, Vec::new());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/containers?api_key=123abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
