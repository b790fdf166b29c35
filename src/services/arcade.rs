use anyhow::{Context, Result};
use log::{debug, info};
use rand::Rng;
use std::io::{BufRead, Write};
use std::sync::Arc;

use crate::config::{AppConfig, StorageBackend};
use crate::database::SqliteStorage;
use crate::domain::{GameId, PlayerName, ScoreEntry, Tournament, TournamentId};
use crate::errors::{JoinError, ScoreError, ValidationError, load_context, store_context};
use crate::games::{self, GuessError, GuessGame, GuessOutcome};
use crate::storage::{FileStorage, KeyValueStorage};
use crate::store::scores::LEADERBOARD_KEY;
use crate::store::tournaments::TOURNAMENTS_KEY;
use crate::store::{ScoreStore, TournamentStore};

pub type SharedStorage = Arc<dyn KeyValueStorage>;

/// Result of a join request coming from the front-end
#[derive(Debug)]
pub enum JoinReply {
    Joined(Tournament),
    /// No tournament was picked
    NoSelection,
    Rejected(JoinError),
}

/// What happened to a finished guess game's score
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessSummary {
    Saved { player: PlayerName, score: i64 },
    Unsaved { score: i64 },
    /// Input ended before the number was found
    Abandoned,
}

/// Front-end facing service: both stores over one shared provider
pub struct ArcadeService {
    scores: ScoreStore<SharedStorage>,
    tournaments: TournamentStore<SharedStorage>,
}

impl ArcadeService {
    pub fn new(storage: SharedStorage) -> Self {
        Self {
            scores: ScoreStore::new(storage.clone()),
            tournaments: TournamentStore::new(storage),
        }
    }

    pub fn open(config: &AppConfig) -> Result<Self> {
        let settings = &config.storage;
        let capacity = Some(settings.capacity_bytes);

        let storage: SharedStorage = match settings.backend {
            StorageBackend::Sqlite => {
                let path = settings.path.display().to_string();
                Arc::new(SqliteStorage::open(&path, capacity)?)
            }
            StorageBackend::Files => Arc::new(
                FileStorage::new(&settings.path, capacity)
                    .context("Failed to open file storage")?,
            ),
        };

        Ok(Self::new(storage))
    }

    /// Must run once before any other call in a process
    pub fn initialize(&self) -> Result<()> {
        self.scores
            .initialize()
            .with_context(|| store_context(LEADERBOARD_KEY))?;
        self.tournaments
            .initialize()
            .with_context(|| store_context(TOURNAMENTS_KEY))?;
        debug!("Stores initialized");
        Ok(())
    }

    /// Roll for `player` and record the result.
    ///
    /// A blank name is rejected before the die is rolled.
    pub fn play_dice(&self, player: &str, rng: &mut impl Rng) -> Result<Result<u8, ValidationError>> {
        if let Err(e) = PlayerName::parse(player) {
            return Ok(Err(e));
        }

        let roll = games::roll(rng);
        self.submit(GameId::Dice, player, i64::from(roll))?;
        info!("Dice roll of {} recorded", roll);
        Ok(Ok(roll))
    }

    /// Play guess-the-number over line-oriented input until the number is
    /// found or input runs out.
    pub fn play_guess<R: BufRead, W: Write>(
        &self,
        mut game: GuessGame,
        player: Option<&str>,
        input: R,
        output: &mut W,
    ) -> Result<GuessSummary> {
        writeln!(output, "Guess a number between 1 and 100.")?;

        for line in input.lines() {
            let line = line.context("Failed to read guess")?;
            let outcome = match line.trim().parse::<u32>() {
                Ok(value) => game.guess(value),
                Err(_) => Err(GuessError::OutOfRange),
            };

            match outcome {
                Ok(GuessOutcome::TooLow) => writeln!(output, "Too low! Try again.")?,
                Ok(GuessOutcome::TooHigh) => writeln!(output, "Too high! Try again.")?,
                Ok(GuessOutcome::Correct { attempts, score }) => {
                    writeln!(output, "Correct! You guessed the number in {} attempts.", attempts)?;
                    return self.finish_guess(player, score, output);
                }
                Err(e) => writeln!(output, "{}", e)?,
            }
            writeln!(output, "Attempts: {}", game.attempts())?;
        }

        Ok(GuessSummary::Abandoned)
    }

    fn finish_guess<W: Write>(&self, player: Option<&str>, score: i64, output: &mut W) -> Result<GuessSummary> {
        let Some(player) = player.and_then(|p| PlayerName::parse(p).ok()) else {
            writeln!(output, "Enter your name to save your score next time.")?;
            return Ok(GuessSummary::Unsaved { score });
        };

        self.submit(GameId::Guess, player.as_str(), score)?;
        writeln!(output, "Score saved for {}.", player)?;
        Ok(GuessSummary::Saved { player, score })
    }

    pub fn leaderboard(&self, game: GameId) -> Result<Vec<ScoreEntry>> {
        self.scores
            .board(game)
            .with_context(|| load_context(LEADERBOARD_KEY))
    }

    pub fn tournaments(&self) -> Result<Vec<Tournament>> {
        self.tournaments
            .list()
            .with_context(|| load_context(TOURNAMENTS_KEY))
    }

    /// Business rejections come back as `JoinReply`; only storage failures are errors.
    pub fn join(&self, selection: Option<TournamentId>, player: &str) -> Result<JoinReply> {
        // The name is checked before the selection, as the form does
        if PlayerName::parse(player).is_err() {
            return Ok(JoinReply::Rejected(JoinError::InvalidName));
        }
        let Some(id) = selection else {
            return Ok(JoinReply::NoSelection);
        };

        match self.tournaments.join(id, player) {
            Ok(tournament) => Ok(JoinReply::Joined(tournament)),
            Err(rejection) if rejection.is_user_facing() => Ok(JoinReply::Rejected(rejection)),
            Err(e) => Err(e).with_context(|| store_context(TOURNAMENTS_KEY)),
        }
    }

    fn submit(&self, game: GameId, player: &str, score: i64) -> Result<()> {
        match self.scores.submit_score(game, player, score) {
            Ok(()) => Ok(()),
            Err(ScoreError::Validation(e)) => Err(e.into()),
            Err(ScoreError::Storage(e)) => Err(e).with_context(|| store_context(LEADERBOARD_KEY)),
        }
    }
}
