// Shared test utilities: canned upstream servers, gateway state and sample payloads
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{json, Value};

use matchvision_api::AppState;
use matchvision_services::{
    AiGatewayClient, AiGatewayConfig, ChatProxyService, FootballApiConfig, FootballApiService, MetricsCollector,
    PredictionService,
};

pub const TEST_FOOTBALL_KEY: &str = "football-test-key";
pub const TEST_AI_KEY: &str = "ai-test-key";
pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";
// Nothing listens here
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.headers.get(name).map(|v| v.to_str().unwrap().to_string())
    }
}

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    content_type: &'static str,
    body: String,
}

#[derive(Clone, Default)]
pub struct FakeUpstream {
    responses: HashMap<String, Canned>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, path: &str, status: StatusCode, content_type: &'static str, body: impl Into<String>) -> Self {
        self.responses.insert(
            path.to_string(),
            Canned { status, content_type, body: body.into() },
        );
        self
    }

    pub fn json(self, path: &str, status: StatusCode, body: Value) -> Self {
        self.respond(path, status, "application/json", body.to_string())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub async fn spawn(&self) -> String {
        let app = Router::new().fallback(answer).with_state(self.clone());
        format!("http://{}", serve(app).await)
    }
}

async fn answer(
    State(fake): State<FakeUpstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Exact path and query first, then the bare path
    let canned = uri
        .path_and_query()
        .and_then(|pq| fake.responses.get(pq.as_str()))
        .or_else(|| fake.responses.get(uri.path()))
        .cloned();
    fake.requests
        .lock()
        .unwrap()
        .push(RecordedRequest { method, uri, headers, body });

    match canned {
        Some(canned) => (canned.status, [(header::CONTENT_TYPE, canned.content_type)], canned.body).into_response(),
        None => (StatusCode::NOT_FOUND, "no canned response").into_response(),
    }
}

pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub fn football_config(base_url: &str) -> FootballApiConfig {
    FootballApiConfig {
        base_url: base_url.to_string(),
        api_key: Some(TEST_FOOTBALL_KEY.to_string()),
        ..Default::default()
    }
}

pub fn ai_config(base_url: &str) -> AiGatewayConfig {
    AiGatewayConfig {
        url: format!("{base_url}{COMPLETIONS_PATH}"),
        api_key: Some(TEST_AI_KEY.to_string()),
        ..Default::default()
    }
}

pub fn create_test_app_state(football: FootballApiConfig, ai: AiGatewayConfig) -> AppState {
    let http = reqwest::Client::new();
    let gateway = AiGatewayClient::new(http.clone(), ai);
    AppState {
        football: Arc::new(FootballApiService::new(http, football)),
        predictor: Arc::new(PredictionService::new(gateway.clone(), true)),
        assistant: Arc::new(ChatProxyService::new(gateway)),
        metrics: MetricsCollector::new(),
    }
}

pub fn sample_prediction() -> Value {
    let lineup = |prefix: &str| {
        let positions = ["GK", "DEF", "DEF", "DEF", "DEF", "MID", "MID", "MID", "FWD", "FWD", "FWD"];
        let starting: Vec<Value> = positions
            .iter()
            .enumerate()
            .map(|(i, pos)| json!({"name": format!("{prefix} Starter {i}"), "position": pos, "number": i + 1}))
            .collect();
        let substitutes: Vec<Value> = (0..7)
            .map(|i| json!({"name": format!("{prefix} Sub {i}"), "position": "MID", "number": i + 12}))
            .collect();
        json!({"formation": "4-3-3", "starting": starting, "substitutes": substitutes})
    };
    let performers = |prefix: &str| {
        (0..3_u8)
            .map(|i| json!({"name": format!("{prefix} Starter {}", i + 8), "rating": 8.5 - f64::from(i), "reason": "Sharp in the box"}))
            .collect::<Vec<_>>()
    };

    json!({
        "matchScore": {"home": 2, "away": 1, "confidence": 72},
        "winner": "Arsenal",
        "winConfidence": 68,
        "stats": {
            "possession": {"home": 56, "away": 44, "confidence": 78},
            "passes": {"home": 540, "away": 430, "confidence": 70},
            "shots": {"home": 15, "away": 9, "confidence": 68},
            "shotsOnTarget": {"home": 6, "away": 3, "confidence": 65},
            "corners": {"home": 7, "away": 4, "confidence": 62},
            "fouls": {"home": 10, "away": 13, "confidence": 60}
        },
        "homeLineup": lineup("Arsenal"),
        "awayLineup": lineup("Chelsea"),
        "bestPerformers": {"home": performers("Arsenal"), "away": performers("Chelsea")}
    })
}

pub fn completion(content: &str) -> Value {
    json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
}

pub fn sse_event(content: &str) -> String {
    format!("data: {}\n\n", json!({"choices": [{"delta": {"content": content}}]}))
}

pub fn teams_payload() -> Value {
    json!({
        "get": "teams",
        "results": 1,
        "response": [{
            "team": {"id": 42, "name": "Arsenal", "logo": "https://media.api-sports.io/football/teams/42.png", "country": "England"},
            "venue": {"id": 494, "name": "Emirates Stadium", "city": "London"}
        }]
    })
}

pub fn squad_payload(team_id: u64, size: usize) -> Value {
    let positions = ["Goalkeeper", "Defender", "Midfielder", "Attacker"];
    let players: Vec<Value> = (0..size)
        .map(|i| {
            json!({
                "id": team_id * 100 + i as u64,
                "name": format!("Player {team_id}-{i}"),
                "age": 20 + i,
                "number": i + 1,
                "position": positions[i % positions.len()],
                "photo": format!("https://media.api-sports.io/football/players/{i}.png")
            })
        })
        .collect();
    json!({"get": "players/squads", "response": [{"team": {"id": team_id}, "players": players}]})
}
