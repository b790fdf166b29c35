pub mod dice;
pub mod guess;

pub use dice::roll;
pub use guess::{GuessError, GuessGame, GuessOutcome};
