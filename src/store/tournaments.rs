use chrono::NaiveDate;
use log::{info, warn};
use std::collections::HashSet;

use super::{load_document, save_document};
use crate::domain::{GameId, PlayerName, Tournament, TournamentId};
use crate::errors::{JoinError, StorageError};
use crate::storage::KeyValueStorage;

pub const TOURNAMENTS_KEY: &str = "gamezone_tournaments";

/// Tournaments written on first access
pub fn seed_tournaments() -> Vec<Tournament> {
    vec![
        Tournament::new(
            1,
            "Spring Showdown",
            GameId::Dice,
            NaiveDate::from_ymd_opt(2024, 12, 1).unwrap_or_default(),
        ),
        Tournament::new(
            2,
            "Summer Slam",
            GameId::Guess,
            NaiveDate::from_ymd_opt(2024, 12, 15).unwrap_or_default(),
        ),
    ]
}

/// Tournament list and rosters, persisted as a single document
pub struct TournamentStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> TournamentStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Write the seed list unless a valid document exists
    pub fn initialize(&self) -> Result<(), StorageError> {
        if load_document::<Vec<Tournament>, _>(&self.storage, TOURNAMENTS_KEY)?.is_some() {
            return Ok(());
        }

        let seed = seed_tournaments();
        save_document(&self.storage, TOURNAMENTS_KEY, &seed)?;
        info!("Seeded {} tournaments", seed.len());
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<Tournament>, StorageError> {
        self.load()
    }

    pub fn find(&self, id: TournamentId) -> Result<Option<Tournament>, StorageError> {
        Ok(self.load()?.into_iter().find(|t| t.id == id))
    }

    /// Add `player` to the roster of tournament `id`, returning the updated tournament
    pub fn join(&self, id: TournamentId, player: &str) -> Result<Tournament, JoinError> {
        let player = PlayerName::parse(player)?;

        let mut tournaments = self.load()?;
        let tournament = tournaments
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(JoinError::TournamentNotFound(id))?;

        if tournament.has_player(&player) {
            return Err(JoinError::AlreadyJoined {
                tournament: id,
                player,
            });
        }

        tournament.players.push(player.clone());
        let joined = tournament.clone();

        save_document(&self.storage, TOURNAMENTS_KEY, &tournaments)?;
        info!("{} joined {}", player, joined.name);
        Ok(joined)
    }

    fn load(&self) -> Result<Vec<Tournament>, StorageError> {
        let mut tournaments: Vec<Tournament> =
            load_document(&self.storage, TOURNAMENTS_KEY)?.unwrap_or_else(seed_tournaments);
        tournaments.iter_mut().for_each(dedupe_roster);
        Ok(tournaments)
    }
}

/// Drop repeated names from a hand-edited roster, keeping the first join
fn dedupe_roster(tournament: &mut Tournament) {
    let before = tournament.players.len();
    let mut seen = HashSet::new();
    tournament.players.retain(|p| seen.insert(p.clone()));

    if tournament.players.len() != before {
        warn!("Removed duplicate players from tournament {}", tournament.id);
    }
}
