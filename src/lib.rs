pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod games;
pub mod services;
pub mod storage;
pub mod store;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::Cli;
use colored::Colorize;
use std::io;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::domain::{GameId, TournamentId};
use crate::games::GuessGame;
use crate::services::{ArcadeService, render};

pub fn interpret() -> Cli {
    Cli::parse()
}

/// Environment configuration with command-line overrides applied
pub fn build_config(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::from_env();
    if let Some(backend) = cli.storage {
        config.with_backend(backend);
    }
    if let Some(path) = &cli.path {
        config.storage.path = path.clone();
    }
    config
}

fn open_service(config: &AppConfig) -> Result<ArcadeService> {
    let service = ArcadeService::open(config)?;
    service.initialize()?;
    Ok(service)
}

pub fn handle_init(config: &AppConfig) -> Result<()> {
    open_service(config)?;
    println!("Game zone ready at {}", config.storage.path.display());
    Ok(())
}

pub fn handle_dice(config: &AppConfig, player: &str) -> Result<()> {
    let service = open_service(config)?;
    let mut rng = rand::thread_rng();

    match service.play_dice(player, &mut rng)? {
        Ok(roll) => {
            println!("{}", roll.to_string().magenta().bold());
            println!("Congrats {}! You scored {} points.", player.trim(), roll);
        }
        Err(_) => println!("{}", "Please enter your name to play.".yellow()),
    }
    Ok(())
}

pub fn handle_guess(config: &AppConfig, player: Option<&str>) -> Result<()> {
    let service = open_service(config)?;
    let game = GuessGame::new(&mut rand::thread_rng());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    service.play_guess(game, player, stdin.lock(), &mut stdout)?;
    Ok(())
}

pub fn handle_leaderboard(config: &AppConfig, game: GameId) -> Result<()> {
    let service = open_service(config)?;
    let entries = service.leaderboard(game)?;
    print!("{}", render::leaderboard(game, &entries));
    Ok(())
}

pub fn handle_tournaments(config: &AppConfig) -> Result<()> {
    let service = open_service(config)?;
    let tournaments = service.tournaments()?;
    print!("{}", render::tournaments(&tournaments));
    Ok(())
}

pub fn handle_join(config: &AppConfig, tournament: Option<TournamentId>, player: &str) -> Result<()> {
    let service = open_service(config)?;
    let reply = service.join(tournament, player)?;
    println!("{}", render::join_reply(&reply));
    Ok(())
}

pub fn handle_completions(shell: clap_complete::Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}

pub fn execute_command(config: &AppConfig, command: &Command) -> Result<()> {
    match command {
        Command::Init => handle_init(config),
        Command::Dice { player } => handle_dice(config, player),
        Command::Guess { player } => handle_guess(config, player.as_deref()),
        Command::Leaderboard { game } => handle_leaderboard(config, *game),
        Command::Tournaments => handle_tournaments(config),
        Command::Join { tournament, player } => handle_join(config, *tournament, player),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
