use chrono::{DateTime, Utc};
use log::{debug, info};
use std::collections::BTreeMap;

use super::{load_document, save_document};
use crate::domain::{GameId, PlayerName, ScoreEntry};
use crate::errors::{ScoreError, StorageError};
use crate::storage::KeyValueStorage;

pub const LEADERBOARD_KEY: &str = "gamezone_leaderboard";

/// Entries kept per board
pub const TOP_SCORES: usize = 10;

/// Board per game identifier, keyed by the identifier string so that boards
/// for games this build does not know about survive a rewrite.
type LeaderboardDocument = BTreeMap<String, Vec<ScoreEntry>>;

/// Top scores per game, persisted as a single document
pub struct ScoreStore<S> {
    storage: S,
    clock: fn() -> DateTime<Utc>,
}

impl<S: KeyValueStorage> ScoreStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            clock: Utc::now,
        }
    }

    /// Replace the timestamp source used for new entries
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Write an empty board for every known game unless a valid document exists
    pub fn initialize(&self) -> Result<(), StorageError> {
        if load_document::<LeaderboardDocument, _>(&self.storage, LEADERBOARD_KEY)?.is_some() {
            return Ok(());
        }

        save_document(&self.storage, LEADERBOARD_KEY, &empty_document())?;
        info!("Initialized leaderboard for {} games", GameId::ALL.len());
        Ok(())
    }

    pub fn submit_score(&self, game: GameId, player: &str, score: i64) -> Result<(), ScoreError> {
        let player = PlayerName::parse(player)?;

        let mut document = self.load()?;
        let board = document.entry(game.as_str().to_string()).or_default();
        board.push(ScoreEntry {
            player,
            score,
            recorded_at: (self.clock)(),
        });
        rank(board);

        save_document(&self.storage, LEADERBOARD_KEY, &document)?;
        debug!("Recorded score {} for {}", score, game);
        Ok(())
    }

    /// Current top entries for `game`, best first
    pub fn board(&self, game: GameId) -> Result<Vec<ScoreEntry>, StorageError> {
        let mut document = self.load()?;
        Ok(document.remove(game.as_str()).unwrap_or_default())
    }

    fn load(&self) -> Result<LeaderboardDocument, StorageError> {
        let mut document: LeaderboardDocument =
            load_document(&self.storage, LEADERBOARD_KEY)?.unwrap_or_else(empty_document);
        // A hand-edited document may hold unsorted or overlong boards
        document.values_mut().for_each(rank);
        Ok(document)
    }
}

fn empty_document() -> LeaderboardDocument {
    GameId::ALL
        .into_iter()
        .map(|game| (game.as_str().to_string(), Vec::new()))
        .collect()
}

/// Sort best first and drop everything past the top entries.
///
/// `sort_by` is stable, so equal scores keep the order they were added in.
fn rank(board: &mut Vec<ScoreEntry>) {
    board.sort_by(|a, b| b.score.cmp(&a.score));
    board.truncate(TOP_SCORES);
}
