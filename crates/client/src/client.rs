use std::future::Future;

use matchvision_models::{FootballQuery, Player, Position, PredictRequest, Prediction, Team};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::{ClientConfig, FOOTBALL_PATH, PREDICT_PATH};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{message}")]
    Proxy { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0} is not set")]
    MissingConfig(&'static str),
}

pub trait TeamSearch: Send + Sync {
    fn search_teams(&self, query: &str) -> impl Future<Output = Result<Vec<Team>, ClientError>> + Send;
}

pub trait MatchData {
    fn get_squad(&self, team_id: u64) -> impl Future<Output = Result<Vec<Player>, ClientError>> + Send;

    fn get_prediction(
        &self,
        home_team: &Team,
        away_team: &Team,
        home_players: &[Player],
        away_players: &[Player],
    ) -> impl Future<Output = Result<Prediction, ClientError>> + Send;
}

// Provider payload shapes (api-sports v3), only the fields we read
#[derive(Debug, Deserialize)]
struct ProviderEnvelope<T> {
    response: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
struct ProviderTeamItem {
    team: ProviderTeam,
    venue: Option<ProviderVenue>,
}

#[derive(Debug, Deserialize)]
struct ProviderTeam {
    id: u64,
    name: String,
    logo: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderVenue {
    city: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderSquad {
    players: Option<Vec<ProviderPlayer>>,
}

#[derive(Debug, Deserialize)]
struct ProviderPlayer {
    id: u64,
    name: String,
    position: Option<String>,
    number: Option<u32>,
    photo: Option<String>,
    age: Option<u32>,
}

// Venue city wins over team country
pub fn teams_from_response(payload: Value) -> Result<Vec<Team>, serde_json::Error> {
    let envelope: ProviderEnvelope<ProviderTeamItem> = serde_json::from_value(payload)?;
    Ok(envelope
        .response
        .unwrap_or_default()
        .into_iter()
        .map(|item| {
            let city = item.venue.and_then(|venue| venue.city).filter(|city| !city.is_empty());
            let country = city
                .or(item.team.country.filter(|country| !country.is_empty()))
                .unwrap_or_default();
            Team {
                id: item.team.id,
                name: item.team.name,
                logo: item.team.logo.unwrap_or_default(),
                country,
            }
        })
        .collect())
}

// The provider wraps the squad in a one-element array
pub fn squad_from_response(payload: Value) -> Result<Vec<Player>, serde_json::Error> {
    let envelope: ProviderEnvelope<ProviderSquad> = serde_json::from_value(payload)?;
    let players = envelope
        .response
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|squad| squad.players)
        .unwrap_or_default();

    Ok(players
        .into_iter()
        .map(|p| Player {
            id: p.id,
            name: p.name,
            position: Position::from_provider(p.position.as_deref().unwrap_or_default()),
            number: p.number.unwrap_or(0),
            photo: p.photo.unwrap_or_default(),
            age: p.age.unwrap_or(0),
        })
        .collect())
}

#[derive(Clone)]
pub struct MatchVisionClient {
    client: Client,
    config: ClientConfig,
}

impl MatchVisionClient {
    pub fn new(client: Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn invoke<B>(&self, path: &str, body: &B) -> Result<Value, ClientError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let response = self
            .client
            .post(self.config.url(path))
            .bearer_auth(&self.config.public_key)
            .header("apikey", &self.config.public_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| format!("Gateway returned status {status}"));
            debug!("Gateway {} failed with {}: {}", path, status, message);
            return Err(ClientError::Proxy { status: status.as_u16(), message });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

impl TeamSearch for MatchVisionClient {
    async fn search_teams(&self, query: &str) -> Result<Vec<Team>, ClientError> {
        let request = FootballQuery::new("teams").with_param("search", query);
        let payload = self.invoke(FOOTBALL_PATH, &request).await?;
        Ok(teams_from_response(payload)?)
    }
}

impl MatchData for MatchVisionClient {
    async fn get_squad(&self, team_id: u64) -> Result<Vec<Player>, ClientError> {
        let request = FootballQuery::new("players/squads").with_param("team", team_id);
        let payload = self.invoke(FOOTBALL_PATH, &request).await?;
        Ok(squad_from_response(payload)?)
    }

    async fn get_prediction(
        &self,
        home_team: &Team,
        away_team: &Team,
        home_players: &[Player],
        away_players: &[Player],
    ) -> Result<Prediction, ClientError> {
        let request = PredictRequest {
            home_team: home_team.clone(),
            away_team: away_team.clone(),
            home_players: home_players.to_vec(),
            away_players: away_players.to_vec(),
        };
        let payload = self.invoke(PREDICT_PATH, &request).await?;
        Ok(serde_json::from_value(payload)?)
    }
}
