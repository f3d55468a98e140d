// Chat relay: forwards a transcript to the AI gateway and hands back the raw event stream

use matchvision_models::{ChatMessage, GatewayError};
use reqwest::Response;
use tracing::info;

use crate::ai_gateway::{AiGatewayClient, PromptMessage};

pub const CHAT_SYSTEM_PROMPT: &str = "You are MatchVision AI, a friendly football expert. \
Answer questions about matches, predictions, player stats, team tactics and transfer news. \
Keep answers concise and use markdown where it helps readability.";

pub struct ChatProxyService {
    gateway: AiGatewayClient,
}

impl ChatProxyService {
    pub fn new(gateway: AiGatewayClient) -> Self {
        Self { gateway }
    }

    pub fn prompt_for(messages: &[ChatMessage]) -> Vec<PromptMessage> {
        std::iter::once(PromptMessage::system(CHAT_SYSTEM_PROMPT))
            .chain(messages.iter().map(PromptMessage::from))
            .collect()
    }

    pub async fn open(&self, messages: &[ChatMessage]) -> Result<Response, GatewayError> {
        info!("💬 Chat request with {} messages", messages.len());
        self.gateway.stream(&Self::prompt_for(messages)).await
    }
}
