use rand::Rng;
use std::ops::RangeInclusive;
use thiserror::Error;

pub const SECRET_RANGE: RangeInclusive<u32> = 1..=100;

/// Score for a first-try win; every further attempt costs one point
const PERFECT_SCORE: i64 = 101;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    TooLow,
    TooHigh,
    Correct { attempts: u32, score: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GuessError {
    #[error("Please enter a valid number between 1 and 100.")]
    OutOfRange,
    #[error("Game over! Start a new game to play again.")]
    GameOver,
}

/// One round of guess-the-number
#[derive(Debug, Clone)]
pub struct GuessGame {
    secret: u32,
    attempts: u32,
    over: bool,
}

impl GuessGame {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self::with_secret(rng.gen_range(SECRET_RANGE))
    }

    pub fn with_secret(secret: u32) -> Self {
        Self {
            secret,
            attempts: 0,
            over: false,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Rejected guesses do not count as attempts.
    pub fn guess(&mut self, value: u32) -> Result<GuessOutcome, GuessError> {
        if self.over {
            return Err(GuessError::GameOver);
        }
        if !SECRET_RANGE.contains(&value) {
            return Err(GuessError::OutOfRange);
        }

        self.attempts += 1;
        let outcome = match value.cmp(&self.secret) {
            std::cmp::Ordering::Less => GuessOutcome::TooLow,
            std::cmp::Ordering::Greater => GuessOutcome::TooHigh,
            std::cmp::Ordering::Equal => {
                self.over = true;
                GuessOutcome::Correct {
                    attempts: self.attempts,
                    score: score_for_attempts(self.attempts),
                }
            }
        };
        Ok(outcome)
    }
}

/// Fewer attempts score higher; never drops below 1
pub fn score_for_attempts(attempts: u32) -> i64 {
    (PERFECT_SCORE - i64::from(attempts)).max(1)
}
