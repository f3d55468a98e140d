use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Team {
    pub id: u64,
    pub name: String,
    pub logo: String,
    // Venue city when known, otherwise the country
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: u64,
    pub name: String,
    pub position: Position,
    pub number: u32,
    pub photo: String,
    pub age: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    Other(String),
}

impl Position {
    pub fn as_str(&self) -> &str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
            Position::Other(raw) => raw,
        }
    }

    pub fn from_provider(raw: &str) -> Self {
        match raw {
            "Goalkeeper" => Position::Goalkeeper,
            "Defender" => Position::Defender,
            "Midfielder" => Position::Midfielder,
            "Attacker" => Position::Forward,
            other => Position::Other(other.to_string()),
        }
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, Position::Other(_))
    }
}

impl From<String> for Position {
    fn from(code: String) -> Self {
        match code.as_str() {
            "GK" => Position::Goalkeeper,
            "DEF" => Position::Defender,
            "MID" => Position::Midfielder,
            "FWD" => Position::Forward,
            _ => Position::Other(code),
        }
    }
}

impl From<Position> for String {
    fn from(position: Position) -> Self {
        match position {
            Position::Other(raw) => raw,
            canonical => canonical.as_str().to_string(),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn map_position(raw: &str) -> String {
    Position::from_provider(raw).as_str().to_string()
}
