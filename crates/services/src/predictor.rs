// Prediction proxy: prompt assembly and model output handling

use matchvision_models::{GatewayError, Player, PredictRequest, Prediction};
use serde_json::Value;
use tracing::{info, warn};

use crate::ai_gateway::{AiGatewayClient, PromptMessage};

pub const PREDICTION_SYSTEM_PROMPT: &str = r#"You are MatchVision AI, an expert football/soccer analyst. You analyze team data and player squads to generate match predictions.

You MUST respond with ONLY valid JSON, no markdown, no code blocks, no explanations. The JSON must follow this exact structure:

{
  "matchScore": { "home": <number>, "away": <number>, "confidence": <number 0-100> },
  "winner": "<team name or Draw>",
  "winConfidence": <number 0-100>,
  "stats": {
    "possession": { "home": <number>, "away": <number>, "confidence": <number> },
    "passes": { "home": <number>, "away": <number>, "confidence": <number> },
    "shots": { "home": <number>, "away": <number>, "confidence": <number> },
    "shotsOnTarget": { "home": <number>, "away": <number>, "confidence": <number> },
    "corners": { "home": <number>, "away": <number>, "confidence": <number> },
    "fouls": { "home": <number>, "away": <number>, "confidence": <number> }
  },
  "homeLineup": {
    "formation": "<e.g. 4-3-3>",
    "starting": [{"name": "<player name>", "position": "<GK/DEF/MID/FWD>", "number": <number>}],
    "substitutes": [{"name": "<player name>", "position": "<GK/DEF/MID/FWD>", "number": <number>}]
  },
  "awayLineup": {
    "formation": "<e.g. 4-2-3-1>",
    "starting": [{"name": "<player name>", "position": "<GK/DEF/MID/FWD>", "number": <number>}],
    "substitutes": [{"name": "<player name>", "position": "<GK/DEF/MID/FWD>", "number": <number>}]
  },
  "bestPerformers": {
    "home": [{"name": "<player name>", "rating": <number 1-10>, "reason": "<short reason>"}],
    "away": [{"name": "<player name>", "rating": <number 1-10>, "reason": "<short reason>"}]
  }
}

Rules:
- Use ONLY players from the provided squad lists
- Select 11 starters and up to 7 substitutes per team from the provided players
- Pick top 3 best performers per team
- Possession must add up to 100
- Be realistic based on team strength and player quality
- Confidence values should reflect uncertainty (60-90 range typically)"#;

pub struct PredictionService {
    gateway: AiGatewayClient,
    strict_validation: bool,
}

impl PredictionService {
    pub fn new(gateway: AiGatewayClient, strict_validation: bool) -> Self {
        Self { gateway, strict_validation }
    }

    pub async fn predict(&self, request: &PredictRequest) -> Result<Value, GatewayError> {
        info!(
            "🎯 Predicting {} ({} players) vs {} ({} players)",
            request.home_team.name,
            request.home_players.len(),
            request.away_team.name,
            request.away_players.len()
        );

        let messages = [
            PromptMessage::system(PREDICTION_SYSTEM_PROMPT),
            PromptMessage::user(build_user_prompt(request)),
        ];
        let content = self.gateway.complete(&messages).await?;

        let prediction: Value = serde_json::from_str(&strip_code_fences(&content))?;
        self.check_contract(&prediction)?;
        Ok(prediction)
    }

    // Lenient mode passes any JSON through; strict mode checks shape and rules
    fn check_contract(&self, value: &Value) -> Result<(), GatewayError> {
        if !self.strict_validation {
            return Ok(());
        }

        let prediction: Prediction = serde_json::from_value(value.clone())
            .map_err(|e| GatewayError::ContractViolation(e.to_string()))?;

        let violations = prediction.contract_violations();
        if !violations.is_empty() {
            warn!("⚠️  Model output broke {} prediction rules", violations.len());
            return Err(GatewayError::ContractViolation(violations.join("; ")));
        }
        Ok(())
    }
}

pub fn build_user_prompt(request: &PredictRequest) -> String {
    let home = &request.home_team.name;
    let away = &request.away_team.name;
    format!(
        "Predict the match: {home} (Home) vs {away} (Away)\n\n\
         Home Team Squad ({home}):\n{}\n\n\
         Away Team Squad ({away}):\n{}\n\n\
         Generate a complete match prediction with lineups using ONLY these players.",
        squad_lines(&request.home_players),
        squad_lines(&request.away_players),
    )
}

fn squad_lines(players: &[Player]) -> String {
    players
        .iter()
        .map(|p| format!("- {} ({}, #{})", p.name, p.position, p.number))
        .collect::<Vec<_>>()
        .join("\n")
}

// Strip ```json fences, then trim
pub fn strip_code_fences(content: &str) -> String {
    let mut out = content.to_string();
    for fence in ["```json", "```"] {
        out = out.replace(&format!("{fence}\n"), "").replace(fence, "");
    }
    out.trim().to_string()
}
