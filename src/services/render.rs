use colored::Colorize;

use super::arcade::JoinReply;
use crate::domain::{GameId, ScoreEntry, Tournament};
use crate::errors::JoinError;

/// Ranked table for one game
pub fn leaderboard(game: GameId, entries: &[ScoreEntry]) -> String {
    let mut lines = vec![format!("{} leaderboard", game.display_name()).bold().to_string()];

    if entries.is_empty() {
        lines.push("No scores yet for this game.".yellow().to_string());
    } else {
        lines.push(format!("{:>4}  {:<24} {:>6}", "#", "Player", "Score"));
        lines.extend(entries.iter().enumerate().map(|(index, entry)| {
            format!("{:>4}  {:<24} {:>6}", index + 1, entry.player.as_str(), entry.score)
        }));
    }

    lines.join("\n") + "\n"
}

pub fn tournaments(list: &[Tournament]) -> String {
    list.iter().map(tournament_card).collect()
}

fn tournament_card(tournament: &Tournament) -> String {
    let mut card = format!(
        "{}\n  Game: {}\n  Date: {}\n  Players Joined: {}\n",
        format!("[{}] {}", tournament.id, tournament.name).bold(),
        tournament.game.display_name(),
        tournament.date.format("%Y-%m-%d"),
        tournament.players.len()
    );
    for player in &tournament.players {
        card.push_str(&format!("    - {}\n", player));
    }
    card.push('\n');
    card
}

pub fn join_reply(reply: &JoinReply) -> String {
    match reply {
        JoinReply::Joined(tournament) => format!("Successfully joined {}!", tournament.name)
            .green()
            .to_string(),
        JoinReply::NoSelection => "Please select a tournament.".yellow().to_string(),
        JoinReply::Rejected(error) => rejection_message(error).yellow().to_string(),
    }
}

fn rejection_message(error: &JoinError) -> String {
    match error {
        JoinError::InvalidName => "Please enter your name.".to_string(),
        JoinError::TournamentNotFound(_) => "Tournament not found.".to_string(),
        JoinError::AlreadyJoined { .. } => "You have already joined this tournament.".to_string(),
        JoinError::Storage(e) => e.to_string(),
    }
}
