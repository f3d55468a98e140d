use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::team::Position;

pub const STARTERS_PER_SIDE: usize = 11;
pub const MAX_SUBSTITUTES_PER_SIDE: usize = 7;
pub const PERFORMERS_PER_SIDE: usize = 3;
pub const DRAW: &str = "Draw";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub match_score: ScorePrediction,
    // Team name or "Draw"
    pub winner: String,
    pub win_confidence: f64,
    pub stats: HashMap<String, StatLine>,
    pub home_lineup: Lineup,
    pub away_lineup: Lineup,
    pub best_performers: BestPerformers,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScorePrediction {
    pub home: u32,
    pub away: u32,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StatLine {
    pub home: f64,
    pub away: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lineup {
    pub formation: String,
    pub starting: Vec<LineupPlayer>,
    pub substitutes: Vec<LineupPlayer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineupPlayer {
    pub name: String,
    pub position: Position,
    pub number: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BestPerformers {
    pub home: Vec<Performer>,
    pub away: Vec<Performer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Performer {
    pub name: String,
    pub rating: f64,
    pub reason: String,
}

impl Prediction {
    pub fn is_draw(&self) -> bool {
        self.winner == DRAW
    }

    pub fn stat(&self, key: &str) -> Option<&StatLine> {
        self.stats.get(key)
    }

    /// Check the rules the prompt imposes on the model. Returns every violation found.
    pub fn contract_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        for (side, lineup) in [("home", &self.home_lineup), ("away", &self.away_lineup)] {
            if lineup.starting.len() != STARTERS_PER_SIDE {
                violations.push(format!(
                    "{side} lineup has {} starters, expected {STARTERS_PER_SIDE}",
                    lineup.starting.len()
                ));
            }
            if lineup.substitutes.len() > MAX_SUBSTITUTES_PER_SIDE {
                violations.push(format!(
                    "{side} lineup has {} substitutes, at most {MAX_SUBSTITUTES_PER_SIDE} allowed",
                    lineup.substitutes.len()
                ));
            }
            for player in lineup.starting.iter().chain(&lineup.substitutes) {
                if !player.position.is_canonical() {
                    violations.push(format!(
                        "{side} player {} has unknown position {}",
                        player.name, player.position
                    ));
                }
            }
        }

        for (side, performers) in [("home", &self.best_performers.home), ("away", &self.best_performers.away)] {
            if performers.len() != PERFORMERS_PER_SIDE {
                violations.push(format!(
                    "{side} has {} best performers, expected {PERFORMERS_PER_SIDE}",
                    performers.len()
                ));
            }
            for performer in performers {
                if !(1.0..=10.0).contains(&performer.rating) {
                    violations.push(format!(
                        "{side} performer {} rated {} outside 1-10",
                        performer.name, performer.rating
                    ));
                }
            }
        }

        match self.stats.get("possession") {
            Some(possession) if (possession.home + possession.away - 100.0).abs() > 0.5 => {
                violations.push(format!(
                    "possession totals {}, expected 100",
                    possession.home + possession.away
                ));
            }
            Some(_) => {}
            None => violations.push("possession statistic missing".to_string()),
        }

        violations
    }
}
