#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Lane Cascade in the terminal.

mod config;
mod render;

use std::{
    io::{self, BufRead},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use lane_cascade_core::{Direction, Event, Player};
use lane_cascade_session::Session;

use crate::config::GameConfig;

/// Two-player edge-insertion match-three.
#[derive(Debug, Parser)]
#[command(name = "lane-cascade", about = "Two-player edge-insertion match-three")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the seed for the opening board and pending pieces
    #[arg(long)]
    seed: Option<u64>,

    /// Override the board edge length
    #[arg(long)]
    size: Option<u32>,

    /// Moves such as `L2`, `U0` or `R4`; read from stdin when omitted
    moves: Vec<String>,
}

/// Entry point for the Lane Cascade command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let config = GameConfig::load(path)?;
            log::info!("loaded configuration from {}", path.display());
            config
        }
        None => GameConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(size) = cli.size {
        config.board.size = size;
    }
    config.validate()?;

    let mut session =
        Session::new(config.session_config()).context("failed to start a session")?;
    session.subscribe(Box::new(|event: &Event| {
        println!("  {}", render::describe(event));
    }));
    print_status(&session);

    if cli.moves.is_empty() {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line.context("failed to read move from stdin")?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if matches!(line, "q" | "quit") {
                break;
            }
            play(&mut session, line);
        }
    } else {
        for token in &cli.moves {
            play(&mut session, token);
        }
    }

    print_scores(&session);
    Ok(())
}

fn play(session: &mut Session, token: &str) {
    let (direction, lane) = match parse_move(token) {
        Ok(parsed) => parsed,
        Err(error) => {
            eprintln!("{error:#}");
            return;
        }
    };

    println!("> {token}");
    match session.request_insert(direction, lane) {
        Ok(events) => {
            log::debug!("{token} produced {} events", events.len());
            print_status(session);
        }
        Err(reason) => log::warn!("move {token} rejected: {reason}"),
    }
}

fn parse_move(token: &str) -> Result<(Direction, u32)> {
    let mut chars = token.chars();
    let Some(edge) = chars.next() else {
        bail!("empty move");
    };
    let direction = match edge.to_ascii_uppercase() {
        'U' => Direction::Up,
        'D' => Direction::Down,
        'L' => Direction::Left,
        'R' => Direction::Right,
        other => bail!("unknown edge `{other}` in move `{token}`; expected U, L or R"),
    };
    let lane = chars
        .as_str()
        .parse::<u32>()
        .with_context(|| format!("invalid lane index in move `{token}`"))?;
    Ok((direction, lane))
}

fn print_status(session: &Session) {
    print!("{}", render::board(session.board()));
    println!(
        "{:?} to move with {}",
        session.active_player(),
        render::kind_symbol(session.pending())
    );
}

fn print_scores(session: &Session) {
    let scoreboard = session.scoreboard();
    for player in Player::ALL {
        println!("{player:?}: {}", scoreboard.total(player));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_parse_edge_and_lane() {
        assert_eq!(parse_move("L2").expect("valid"), (Direction::Left, 2));
        assert_eq!(parse_move("u0").expect("valid"), (Direction::Up, 0));
        assert_eq!(parse_move("R14").expect("valid"), (Direction::Right, 14));
    }

    #[test]
    fn down_edge_parses_so_the_world_can_refuse_it() {
        assert_eq!(parse_move("D1").expect("valid"), (Direction::Down, 1));
    }

    #[test]
    fn malformed_moves_are_reported() {
        assert!(parse_move("").is_err());
        assert!(parse_move("X1").is_err());
        assert!(parse_move("L").is_err());
        assert!(parse_move("L-1").is_err());
    }
}
