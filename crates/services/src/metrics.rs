use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gateway {
    Football,
    Prediction,
    Chat,
}

impl Gateway {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gateway::Football => "football",
            Gateway::Prediction => "prediction",
            Gateway::Chat => "chat",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GatewayStats {
    pub requests: u64,
    pub failures: u64,
    pub rate_limited: u64,
    pub last_latency_ms: f64,
    pub avg_latency_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub gateways: HashMap<&'static str, GatewayStats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    RateLimited,
    Failed,
}

impl Outcome {
    pub fn from_status(status: u16) -> Self {
        match status {
            200..=299 => Outcome::Success,
            429 | 402 => Outcome::RateLimited,
            _ => Outcome::Failed,
        }
    }
}

#[derive(Debug)]
pub struct LatencyTracker {
    start_time: Instant,
    gateway: Gateway,
}

impl LatencyTracker {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            start_time: Instant::now(),
            gateway,
        }
    }

    pub async fn finish(self, metrics: &MetricsCollector, outcome: Outcome) {
        metrics
            .record(self.gateway, outcome, self.start_time.elapsed())
            .await;
    }
}

#[derive(Clone)]
pub struct MetricsCollector {
    start_time: Instant,
    gateways: Arc<RwLock<HashMap<Gateway, GatewayStats>>>,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            gateways: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn start_latency_tracking(&self, gateway: Gateway) -> LatencyTracker {
        LatencyTracker::new(gateway)
    }

    pub async fn record(&self, gateway: Gateway, outcome: Outcome, latency: Duration) {
        let latency_ms = latency.as_secs_f64() * 1000.0;
        let mut gateways = self.gateways.write().await;
        let stats = gateways.entry(gateway).or_default();

        stats.requests += 1;
        match outcome {
            Outcome::Success => {}
            Outcome::RateLimited => stats.rate_limited += 1,
            Outcome::Failed => stats.failures += 1,
        }
        stats.last_latency_ms = latency_ms;
        // Running mean over every request seen so far
        stats.avg_latency_ms += (latency_ms - stats.avg_latency_ms) / stats.requests as f64;
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub async fn snapshot(&self) -> MetricsSnapshot {
        let gateways = self.gateways.read().await;
        MetricsSnapshot {
            timestamp: Utc::now(),
            uptime_seconds: self.uptime().as_secs(),
            gateways: gateways
                .iter()
                .map(|(gateway, stats)| (gateway.as_str(), stats.clone()))
                .collect(),
        }
    }
}
