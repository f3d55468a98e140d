mod config;

use std::sync::Arc;

use anyhow::Result;
use config::AppConfig;
use matchvision_api::{create_app, AppState};
use matchvision_services::{
    AiGatewayClient, ChatProxyService, FootballApiService, MetricsCollector, PredictionService,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matchvision=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting MatchVision gateways");

    let config = AppConfig::new()?;
    info!("✅ Configuration loaded successfully");
    info!("⚽ Football data: {}", config.football_api.base_url);
    info!("🤖 AI gateway: {} ({})", config.ai_gateway.url, config.ai_gateway.model);
    if config.football_api.api_key.is_none() {
        warn!("⚠️  API_FOOTBALL_KEY is not configured; football requests will fail");
    }
    if config.ai_gateway.api_key.is_none() {
        warn!("⚠️  AI_GATEWAY_API_KEY is not configured; predictions and chat will fail");
    }

    let http = reqwest::Client::builder()
        .connect_timeout(config.connect_timeout())
        .build()?;

    let gateway = AiGatewayClient::new(http.clone(), config.ai_gateway());
    let state = AppState {
        football: Arc::new(FootballApiService::new(http, config.football_api())),
        predictor: Arc::new(PredictionService::new(gateway.clone(), config.prediction.strict_validation)),
        assistant: Arc::new(ChatProxyService::new(gateway)),
        metrics: MetricsCollector::new(),
    };

    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(config.server_addr()).await?;
    info!("🌐 Listening on {}", listener.local_addr()?);
    info!("⌨️  Press Ctrl+C to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("👋 Shutting down gracefully");
            }
        })
        .await?;

    Ok(())
}
