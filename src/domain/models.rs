use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ValidationError;

/// Game variants that keep a leaderboard
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum GameId {
    Dice,
    Guess,
}

impl GameId {
    pub const ALL: [GameId; 2] = [GameId::Dice, GameId::Guess];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::Dice => "dice",
            GameId::Guess => "guess",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GameId::Dice => "Dice Roll",
            GameId::Guess => "Guess the Number",
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A display name that is non-empty after trimming.
///
/// Stored trimmed; comparisons are exact and case-sensitive. Deserializing
/// goes through [`PlayerName::parse`], so stored names obey the same rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::BlankName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for PlayerName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl TryFrom<String> for PlayerName {
    type Error = ValidationError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> Self {
        name.0
    }
}

/// One recorded result. Never edited once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player: PlayerName,
    pub score: i64,
    #[serde(rename = "date", with = "chrono::serde::ts_milliseconds")]
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TournamentId(pub u32);

impl fmt::Display for TournamentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TournamentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TournamentId)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub game: GameId,
    pub date: NaiveDate,
    /// Join order; a name never appears twice
    #[serde(default)]
    pub players: Vec<PlayerName>,
}

impl Tournament {
    pub fn new(id: u32, name: &str, game: GameId, date: NaiveDate) -> Self {
        Self {
            id: TournamentId(id),
            name: name.to_string(),
            game,
            date,
            players: Vec::new(),
        }
    }

    pub fn has_player(&self, player: &PlayerName) -> bool {
        self.players.contains(player)
    }
}
