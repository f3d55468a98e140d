use crate::client::ClientError;

pub const FOOTBALL_PATH: &str = "/api/v1/football";
pub const PREDICT_PATH: &str = "/api/v1/predict";
pub const CHAT_PATH: &str = "/api/v1/chat";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub public_key: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            public_key: public_key.into(),
        }
    }

    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = dotenvy::var("MATCHVISION_PUBLIC_URL")
            .map_err(|_| ClientError::MissingConfig("MATCHVISION_PUBLIC_URL"))?;
        let public_key = dotenvy::var("MATCHVISION_PUBLIC_KEY")
            .map_err(|_| ClientError::MissingConfig("MATCHVISION_PUBLIC_KEY"))?;
        Ok(Self::new(base_url, public_key))
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn chat_url(&self) -> String {
        self.url(CHAT_PATH)
    }
}
