use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::StorageBackend;
use crate::domain::{GameId, TournamentId};

#[derive(Parser, Debug)]
#[command(author, version, about = "game-zone: dice, guessing, leaderboards and tournaments")]
pub struct Cli {
    /// Storage backend (defaults to GAME_ZONE_STORAGE, then sqlite)
    #[arg(long, value_enum, global = true)]
    pub storage: Option<StorageBackend>,

    /// Database file or data directory (defaults to GAME_ZONE_PATH)
    #[arg(long, global = true)]
    pub path: Option<PathBuf>,

    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Create the leaderboard and tournament documents if missing
    Init,
    /// Roll the dice and record the score
    Dice {
        /// Player name
        #[arg(short, long)]
        player: String,
    },
    /// Play guess-the-number on stdin
    Guess {
        /// Player name; the score is only saved when given
        #[arg(short, long)]
        player: Option<String>,
    },
    /// Show the top scores of a game
    Leaderboard {
        #[arg(short, long, value_enum, default_value_t = GameId::Dice)]
        game: GameId,
    },
    /// List tournaments and their players
    Tournaments,
    /// Join a tournament
    Join {
        /// Tournament id
        #[arg(short, long)]
        tournament: Option<TournamentId>,
        /// Player name
        #[arg(short, long)]
        player: String,
    },
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_join() {
        let cli = Cli::try_parse_from(["game_zone", "--storage", "files", "join", "-t", "2", "-p", "Alice"]).unwrap();

        assert_eq!(cli.storage, Some(StorageBackend::Files));
        assert_eq!(
            cli.command,
            Command::Join {
                tournament: Some(TournamentId(2)),
                player: "Alice".to_string()
            }
        );
    }

    #[test]
    fn test_join_without_tournament() {
        let cli = Cli::try_parse_from(["game_zone", "join", "--player", "Alice"]).unwrap();
        assert!(matches!(cli.command, Command::Join { tournament: None, .. }));
    }

    #[test]
    fn test_leaderboard_defaults_to_dice() {
        let cli = Cli::try_parse_from(["game_zone", "leaderboard"]).unwrap();
        assert_eq!(cli.command, Command::Leaderboard { game: GameId::Dice });
    }
}
