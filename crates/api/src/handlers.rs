use axum::{
    body::{Body, Bytes},
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use matchvision_models::{ChatRequest, FootballQuery, GatewayError, PredictRequest};
use matchvision_services::{Gateway, LatencyTracker, MetricsCollector, Outcome};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, info_span, Instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::AppState;

// Data proxy: forwards {endpoint, params} to the football provider
pub async fn football_proxy(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let tracker = state.metrics.start_latency_tracking(Gateway::Football);
    let result = async {
        let query: FootballQuery = parse_body(&body)?;
        state.football.query(&query).await
    }
    .instrument(request_span(Gateway::Football))
    .await;

    settle(tracker, &state.metrics, Gateway::Football, result)
        .await
        .map(Json)
}

// Prediction proxy: squads in, model-generated prediction out
pub async fn predict_proxy(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let tracker = state.metrics.start_latency_tracking(Gateway::Prediction);
    let result = async {
        let request: PredictRequest = parse_body(&body)?;
        state.predictor.predict(&request).await
    }
    .instrument(request_span(Gateway::Prediction))
    .await;

    settle(tracker, &state.metrics, Gateway::Prediction, result)
        .await
        .map(Json)
}

// Chat relay: the upstream event stream is passed through untouched
pub async fn chat_proxy(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let tracker = state.metrics.start_latency_tracking(Gateway::Chat);
    let result = async {
        let request: ChatRequest = parse_body(&body)?;
        state.assistant.open(&request.messages).await
    }
    .instrument(request_span(Gateway::Chat))
    .await;

    let upstream = settle(tracker, &state.metrics, Gateway::Chat, result).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(upstream.bytes_stream()),
    )
        .into_response())
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, GatewayError> {
    serde_json::from_slice(body).map_err(|e| GatewayError::InvalidRequest(e.to_string()))
}

fn request_span(gateway: Gateway) -> tracing::Span {
    info_span!("gateway", name = gateway.as_str(), request_id = %Uuid::new_v4())
}

async fn settle<T>(
    tracker: LatencyTracker,
    metrics: &MetricsCollector,
    gateway: Gateway,
    result: Result<T, GatewayError>,
) -> Result<T, ApiError> {
    match result {
        Ok(value) => {
            tracker.finish(metrics, Outcome::Success).await;
            Ok(value)
        }
        Err(e) => {
            error!("❌ {} gateway error: {}", gateway.as_str(), e);
            tracker.finish(metrics, Outcome::from_status(e.status_code())).await;
            Err(ApiError(e))
        }
    }
}
