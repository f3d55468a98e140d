use matchvision_models::{Prediction, Team};
use thiserror::Error;
use tracing::{info, warn};

use crate::client::{ClientError, MatchData};

#[derive(Error, Debug)]
pub enum PredictFlowError {
    #[error("Select a home team and an away team first.")]
    TeamsNotSelected,

    #[error("Could not fetch squad data for one or both teams.")]
    MissingSquad,

    #[error(transparent)]
    Client(#[from] ClientError),
}

// An empty squad on either side aborts before the prediction call
pub async fn predict_match<D>(data: &D, home: &Team, away: &Team) -> Result<Prediction, PredictFlowError>
where
    D: MatchData,
{
    let (home_players, away_players) = tokio::try_join!(data.get_squad(home.id), data.get_squad(away.id))?;

    if home_players.is_empty() || away_players.is_empty() {
        warn!(
            "⚠️  Empty squad: {} has {} players, {} has {}",
            home.name,
            home_players.len(),
            away.name,
            away_players.len()
        );
        return Err(PredictFlowError::MissingSquad);
    }

    info!("🎯 Requesting prediction for {} vs {}", home.name, away.name);
    Ok(data
        .get_prediction(home, away, &home_players, &away_players)
        .await?)
}

#[derive(Debug, Clone, Default)]
pub struct MatchSetup {
    pub home: Option<Team>,
    pub away: Option<Team>,
}

impl MatchSetup {
    pub fn is_ready(&self) -> bool {
        self.home.is_some() && self.away.is_some()
    }

    pub async fn predict<D>(&self, data: &D) -> Result<Prediction, PredictFlowError>
    where
        D: MatchData,
    {
        match (&self.home, &self.away) {
            (Some(home), Some(away)) => predict_match(data, home, away).await,
            _ => Err(PredictFlowError::TeamsNotSelected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchvision_models::{BestPerformers, Lineup, Player, Position, ScorePrediction};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeData {
        squad_sizes: HashMap<u64, usize>,
        prediction_calls: AtomicUsize,
    }

    impl FakeData {
        fn new(home_size: usize, away_size: usize) -> Self {
            Self {
                squad_sizes: HashMap::from([(1, home_size), (2, away_size)]),
                prediction_calls: AtomicUsize::new(0),
            }
        }
    }

    impl MatchData for FakeData {
        async fn get_squad(&self, team_id: u64) -> Result<Vec<Player>, ClientError> {
            if team_id == 99 {
                return Err(ClientError::Proxy { status: 500, message: "squad lookup failed".into() });
            }
            let size = self.squad_sizes.get(&team_id).copied().unwrap_or(0);
            Ok((0..size)
                .map(|i| Player {
                    id: i as u64,
                    name: format!("Player {i}"),
                    position: Position::Midfielder,
                    number: i as u32 + 1,
                    photo: String::new(),
                    age: 24,
                })
                .collect())
        }

        async fn get_prediction(
            &self,
            home_team: &Team,
            _away_team: &Team,
            home_players: &[Player],
            _away_players: &[Player],
        ) -> Result<Prediction, ClientError> {
            self.prediction_calls.fetch_add(1, Ordering::SeqCst);
            let lineup = Lineup { formation: "4-4-2".into(), starting: vec![], substitutes: vec![] };
            Ok(Prediction {
                match_score: ScorePrediction { home: home_players.len() as u32, away: 0, confidence: 70.0 },
                winner: home_team.name.clone(),
                win_confidence: 65.0,
                stats: HashMap::new(),
                home_lineup: lineup.clone(),
                away_lineup: lineup,
                best_performers: BestPerformers { home: vec![], away: vec![] },
            })
        }
    }

    fn team(id: u64, name: &str) -> Team {
        Team { id, name: name.into(), logo: String::new(), country: String::new() }
    }

    #[tokio::test]
    async fn test_predict_match_with_full_squads() {
        let data = FakeData::new(25, 23);
        let prediction = predict_match(&data, &team(1, "Arsenal"), &team(2, "Chelsea")).await.unwrap();

        assert_eq!(prediction.winner, "Arsenal");
        assert_eq!(prediction.match_score.home, 25);
        assert_eq!(data.prediction_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_squad_never_calls_prediction() {
        for (home_size, away_size) in [(0, 20), (20, 0), (0, 0)] {
            let data = FakeData::new(home_size, away_size);
            let err = predict_match(&data, &team(1, "Home"), &team(2, "Away")).await.unwrap_err();

            assert!(matches!(err, PredictFlowError::MissingSquad));
            assert_eq!(err.to_string(), "Could not fetch squad data for one or both teams.");
            assert_eq!(data.prediction_calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_squad_error_propagates() {
        let data = FakeData::new(20, 20);
        let err = predict_match(&data, &team(99, "Broken"), &team(2, "Away")).await.unwrap_err();

        assert_eq!(err.to_string(), "squad lookup failed");
        assert_eq!(data.prediction_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_setup_requires_both_teams() {
        let data = FakeData::new(20, 20);
        let setup = MatchSetup { home: Some(team(1, "Home")), away: None };

        assert!(!setup.is_ready());
        assert!(matches!(setup.predict(&data).await, Err(PredictFlowError::TeamsNotSelected)));
    }
}
