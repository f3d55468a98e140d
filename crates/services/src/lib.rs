pub mod football_api;
pub mod ai_gateway;
pub mod predictor;
pub mod assistant;
pub mod metrics;

pub use football_api::*;
pub use ai_gateway::*;
pub use predictor::*;
pub use assistant::*;
pub use metrics::*;
