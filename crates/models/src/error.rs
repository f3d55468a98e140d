use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0} is not configured")]
    MissingCredential(&'static str),

    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    #[error("Rate limited. Please try again shortly.")]
    RateLimited,

    #[error("AI credits exhausted. Please add funds.")]
    CreditsExhausted,

    #[error("AI gateway error")]
    UpstreamStatus { status: u16 },

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Model output violated the prediction contract: {0}")]
    ContractViolation(String),
}

impl GatewayError {
    // Only quota errors pass their status through
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::RateLimited => 429,
            GatewayError::CreditsExhausted => 402,
            _ => 500,
        }
    }

    pub fn from_ai_status(status: u16) -> Self {
        match status {
            429 => GatewayError::RateLimited,
            402 => GatewayError::CreditsExhausted,
            status => GatewayError::UpstreamStatus { status },
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
