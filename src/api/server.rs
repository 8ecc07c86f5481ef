//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::{handlers, models::{ApiResponse, ViewQuery}};
use crate::config::Config;
use crate::dataset::Dataset;

/// Shared application state. The dataset is never mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub config: Arc<Config>,
}

/// Build the router; separate from serving so tests can drive it without a socket
pub fn router(dataset: Arc<Dataset>, config: Arc<Config>) -> Router {
    let app_state = AppState { dataset, config };

    // Configure CORS to allow browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/health", get(health_handler))
        .route("/api/view", get(view_handler))
        .route("/api/channels", get(channels_handler))
        .route("/api/bounds", get(bounds_handler))
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Configure and start the HTTP server
pub async fn start_http_server(dataset: Arc<Dataset>, config: Arc<Config>, port: u16) -> Result<()> {
    let address = format!("{}:{}", config.api.host, port);
    let app = router(dataset, config);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("🌐 API server listening on http://{}", address);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check handler
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(handlers::health_check(&state.dataset)))
}

/// Dashboard view handler
async fn view_handler(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> impl IntoResponse {
    match handlers::get_view(&state.dataset, &state.config, &query) {
        Ok(view) => (StatusCode::OK, Json(ApiResponse::success(view))).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(e.to_string())),
        )
            .into_response(),
    }
}

/// Channel options handler
async fn channels_handler(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> impl IntoResponse {
    match handlers::list_channels(&state.dataset, &query) {
        Ok(channels) => (StatusCode::OK, Json(ApiResponse::success(channels))).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(e.to_string())),
        )
            .into_response(),
    }
}

/// Date slider bounds handler
async fn bounds_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse::success(handlers::get_bounds(&state.dataset))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Row;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::{TimeZone, Utc};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let row = |id: &str, channel: &str, day: u32| Row {
            id: id.to_string(),
            title: format!("Video {}", id),
            channel: channel.to_string(),
            duration_seconds: 90.0,
            published_at: Some(Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()),
            liked_at: None,
            category_id: Some(10),
            tags: Vec::new(),
        };
        let dataset = Dataset::new(vec![row("a", "A", 1), row("b", "B", 10), row("c", "A", 20)]);
        router(Arc::new(dataset), Arc::new(Config::default()))
    }

    async fn get(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_view_route_applies_filters() {
        let (status, body) = get("/api/view?published_from=2024-01-05&channel=A").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["counts"]["total_row_count"], 3);
        assert_eq!(body["data"]["counts"]["filtered_row_count"], 1);
        assert_eq!(body["data"]["rows"][0]["id"], "c");
    }

    #[tokio::test]
    async fn test_view_route_rejects_inverted_range() {
        let (status, body) = get("/api/view?published_from=2024-02-01&published_to=2024-01-01").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("starts after it ends"));
    }

    #[tokio::test]
    async fn test_health_route() {
        let (status, body) = get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["videos"], 3);
    }
}
