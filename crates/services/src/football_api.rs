use std::time::Duration;

use matchvision_models::{FootballQuery, GatewayError};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, warn};

pub const API_KEY_HEADER: &str = "x-apisports-key";
pub const DEFAULT_FOOTBALL_API_URL: &str = "https://v3.football.api-sports.io";

#[derive(Debug, Clone)]
pub struct FootballApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for FootballApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FOOTBALL_API_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Clone)]
pub struct FootballApiService {
    client: Client,
    config: FootballApiConfig,
}

impl FootballApiService {
    pub fn new(client: Client, config: FootballApiConfig) -> Self {
        Self { client, config }
    }

    pub fn build_url(&self, query: &FootballQuery) -> Result<Url, GatewayError> {
        let raw = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            query.endpoint.trim_start_matches('/')
        );
        let mut url = Url::parse(&raw)
            .map_err(|e| GatewayError::InvalidRequest(format!("bad endpoint {}: {e}", query.endpoint)))?;

        let pairs = query.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    pub async fn query(&self, query: &FootballQuery) -> Result<Value, GatewayError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(GatewayError::MissingCredential("API_FOOTBALL_KEY"))?;

        let url = self.build_url(query)?;
        debug!("⚽ Football API request: {}", url.path());

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, api_key)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("⚠️  Football API answered {} for {}", status, query.endpoint);
        }

        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(serde_json::from_str(&body)?)
    }
}
