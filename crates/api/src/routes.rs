use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use matchvision_services::{ChatProxyService, FootballApiService, MetricsCollector, MetricsSnapshot, PredictionService};
use serde::Serialize;
use std::sync::Arc;

use crate::handlers::{chat_proxy, football_proxy, predict_proxy};
use crate::middleware::{cors_layer, trace_layer};

#[derive(Clone)]
pub struct AppState {
    pub football: Arc<FootballApiService>,
    pub predictor: Arc<PredictionService>,
    pub assistant: Arc<ChatProxyService>,
    pub metrics: MetricsCollector,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime: String,
}

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Health and status
        .route("/health", get(health_check))
        .route("/api/v1/status", get(get_gateway_status))

        // Gateways
        .route("/api/v1/football", post(football_proxy))
        .route("/api/v1/predict", post(predict_proxy))
        .route("/api/v1/chat", post(chat_proxy))
}

pub fn create_app(state: AppState) -> Router {
    create_routes()
        .layer(cors_layer())
        .layer(trace_layer())
        .with_state(state)
}

// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: format!("{}s", state.metrics.uptime().as_secs()),
    })
}

// Request counters and latency per gateway
async fn get_gateway_status(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot().await)
}
