use config::{Config, ConfigError, Environment, File};
use matchvision_services::{
    AiGatewayConfig, FootballApiConfig, DEFAULT_AI_GATEWAY_URL, DEFAULT_AI_MODEL, DEFAULT_FOOTBALL_API_URL,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub football_api: FootballApiSettings,
    pub ai_gateway: AiGatewaySettings,
    pub prediction: PredictionSettings,
    pub http: HttpSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FootballApiSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiGatewaySettings {
    pub url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionSettings {
    pub strict_validation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    pub connect_timeout_seconds: u64,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("football_api.base_url", DEFAULT_FOOTBALL_API_URL)?
            .set_default("football_api.timeout_seconds", 15)?
            .set_default("ai_gateway.url", DEFAULT_AI_GATEWAY_URL)?
            .set_default("ai_gateway.model", DEFAULT_AI_MODEL)?
            .set_default("ai_gateway.timeout_seconds", 90)?
            .set_default("prediction.strict_validation", true)?
            .set_default("http.connect_timeout_seconds", 10)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // MATCHVISION__SERVER__PORT=9000 and friends
            .add_source(Environment::with_prefix("MATCHVISION").separator("__"))
            // Secrets keep their conventional names
            .set_override_option("football_api.api_key", env::var("API_FOOTBALL_KEY").ok())?
            .set_override_option("ai_gateway.api_key", env::var("AI_GATEWAY_API_KEY").ok())?
            .build()?;

        config.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.http.connect_timeout_seconds)
    }

    pub fn football_api(&self) -> FootballApiConfig {
        FootballApiConfig {
            base_url: self.football_api.base_url.clone(),
            api_key: self.football_api.api_key.clone(),
            timeout: Duration::from_secs(self.football_api.timeout_seconds),
        }
    }

    pub fn ai_gateway(&self) -> AiGatewayConfig {
        AiGatewayConfig {
            url: self.ai_gateway.url.clone(),
            api_key: self.ai_gateway.api_key.clone(),
            model: self.ai_gateway.model.clone(),
            timeout: Duration::from_secs(self.ai_gateway.timeout_seconds),
        }
    }
}
