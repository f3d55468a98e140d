// Presentation of a prediction

use std::fmt;

use matchvision_models::{Lineup, LineupPlayer, Performer, Position, Prediction, StatLine, Team};

// Keys outside this table are not shown
pub const STAT_LABELS: [(&str, &str); 6] = [
    ("possession", "Possession %"),
    ("passes", "Passes"),
    ("shots", "Shots"),
    ("shotsOnTarget", "Shots on Target"),
    ("corners", "Corners"),
    ("fouls", "Fouls"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct StatBar {
    pub key: &'static str,
    pub label: &'static str,
    pub home: f64,
    pub away: f64,
    pub confidence: f64,
    pub home_percent: f64,
}

impl StatBar {
    pub fn away_percent(&self) -> f64 {
        100.0 - self.home_percent
    }
}

// Possession is out of 100, other stats out of home + away
pub fn home_percent(key: &str, stat: &StatLine) -> f64 {
    let total = if key == "possession" { 100.0 } else { stat.home + stat.away };
    if total > 0.0 {
        stat.home * 100.0 / total
    } else {
        50.0
    }
}

pub fn stat_bars(prediction: &Prediction) -> Vec<StatBar> {
    STAT_LABELS
        .iter()
        .filter_map(|&(key, label)| {
            prediction.stat(key).map(|stat| StatBar {
                key,
                label,
                home: stat.home,
                away: stat.away,
                confidence: stat.confidence,
                home_percent: home_percent(key, stat),
            })
        })
        .collect()
}

pub fn score_banner(prediction: &Prediction) -> String {
    let headline = if prediction.is_draw() {
        "Predicted Draw".to_string()
    } else {
        format!("{} to Win", prediction.winner)
    };
    format!("{headline} — {}% Confidence", fmt_number(prediction.win_confidence))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Goalkeeper,
    Defence,
    Midfield,
    Attack,
    Neutral,
}

pub fn badge_tone(position: &Position) -> BadgeTone {
    match position {
        Position::Goalkeeper => BadgeTone::Goalkeeper,
        Position::Defender => BadgeTone::Defence,
        Position::Midfielder => BadgeTone::Midfield,
        Position::Forward => BadgeTone::Attack,
        Position::Other(_) => BadgeTone::Neutral,
    }
}

pub fn ranked(performers: &[Performer]) -> impl Iterator<Item = (usize, &Performer)> {
    performers.iter().enumerate().map(|(i, p)| (i + 1, p))
}

pub fn fmt_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

pub struct MatchReport<'a> {
    pub prediction: &'a Prediction,
    pub home: &'a Team,
    pub away: &'a Team,
}

impl<'a> MatchReport<'a> {
    pub fn new(prediction: &'a Prediction, home: &'a Team, away: &'a Team) -> Self {
        Self { prediction, home, away }
    }

    fn write_lineup(f: &mut fmt::Formatter<'_>, team: &Team, lineup: &Lineup, side: &str) -> fmt::Result {
        writeln!(f, "{} ({} • {})", team.name, lineup.formation, side)?;
        writeln!(f, "  Starting XI")?;
        for player in &lineup.starting {
            Self::write_player(f, player)?;
        }
        writeln!(f, "  Substitutes")?;
        for player in &lineup.substitutes {
            Self::write_player(f, player)?;
        }
        Ok(())
    }

    fn write_player(f: &mut fmt::Formatter<'_>, player: &LineupPlayer) -> fmt::Result {
        writeln!(f, "    {:>2} {} [{}]", player.number, player.name, player.position)
    }
}

impl fmt::Display for MatchReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.prediction;

        writeln!(
            f,
            "{} {} - {} {}",
            self.home.name, p.match_score.home, p.match_score.away, self.away.name
        )?;
        writeln!(f, "{}", score_banner(p))?;

        writeln!(f)?;
        writeln!(f, "Predicted Stats")?;
        for bar in stat_bars(p) {
            writeln!(
                f,
                "  {:>5}  {} ({}%)  {}",
                fmt_number(bar.home),
                bar.label,
                fmt_number(bar.confidence),
                fmt_number(bar.away)
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Predicted Best Performers")?;
        for (team, performers) in [(self.home, &p.best_performers.home), (self.away, &p.best_performers.away)] {
            writeln!(f, "{}", team.name)?;
            for (rank, performer) in ranked(performers) {
                writeln!(
                    f,
                    "  {}. {} {}/10 — {}",
                    rank,
                    performer.name,
                    fmt_number(performer.rating),
                    performer.reason
                )?;
            }
        }

        writeln!(f)?;
        Self::write_lineup(f, self.home, &p.home_lineup, "Home")?;
        Self::write_lineup(f, self.away, &p.away_lineup, "Away")
    }
}
