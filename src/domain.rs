use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Server-assigned game handle.
pub type GameId = u64;

/// A registered identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamerData {
    pub username: String,
    pub birth_date: NaiveDate,
}

/// Constraints the server declares once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDefaultData {
    #[serde(rename = "minSeqSize")]
    pub min_seq_len: u32,
    #[serde(rename = "maxSeqSize")]
    pub max_seq_len: u32,
    #[serde(rename = "defSeqSize")]
    pub def_seq_len: u32,
    #[serde(rename = "minAge")]
    pub min_age: u32,
}

/// One turn of a game: the guess and how it scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveData {
    pub sequence: String,
    pub bulls: u32,
    pub cows: u32,
}

impl fmt::Display for MoveData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  bulls: {}  cows: {}", self.sequence, self.bulls, self.cows)
    }
}

/// Payload of `moveProcessing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceGameGamer {
    pub sequence: String,
    pub game_id: GameId,
    pub username: String,
}
