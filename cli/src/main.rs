mod input;
mod render;

use std::{
    fs::File,
    io::stdout,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::read,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use game2048::{Game, GameConfig};
use tracing::{info, trace, warn};
use tracing_subscriber::EnvFilter;

use crate::{input::command_for, render::Board};

/// Slide the tiles, merge equal numbers, reach 2048.
#[derive(Parser, Debug)]
#[command(name = "game2048", version)]
struct Args {
    /// Consecutive undos allowed before another move is needed
    #[arg(short = 'u', long, default_value_t = 1)]
    max_undo: u32,

    /// Seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// raw mode + alternate screen for as long as this lives
struct Terminal;

impl Terminal {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("enabling raw mode")?;
        let guard = Terminal;
        execute!(stdout(), EnterAlternateScreen, Hide)?;
        Ok(guard)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Err(e) = execute!(stdout(), Show, LeaveAlternateScreen) {
            warn!("failed to restore screen: {e}");
        }
        if let Err(e) = disable_raw_mode() {
            warn!("failed to leave raw mode: {e}");
        }
    }
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    // the board owns stdout, so logs only go to a file when asked for
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn play_interactive(game: &mut Game) -> Result<()> {
    let _terminal = Terminal::enter()?;
    let mut stdout = stdout();

    stdout.execute(&Board(&game.snapshot()))?;
    while game.is_running() {
        let event = read()?;
        let Some(command) = command_for(&event) else {
            trace!(?event, "ignored");
            continue;
        };

        if game.play(command) {
            stdout.execute(&Board(&game.snapshot()))?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let mut game = Game::new(GameConfig {
        undo_limit: args.max_undo,
        seed: args.seed,
    });
    info!(undo_limit = args.max_undo, seed = ?args.seed, "starting game");

    let result = play_interactive(&mut game);

    let snapshot = serde_json::to_string(&game.snapshot())?;
    info!(%snapshot, "session finished");
    result
}
