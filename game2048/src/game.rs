use log::{debug, info, trace};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

use crate::{Direction, Grid, CELLS};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// How many undos may follow each other before a real move is needed.
    pub undo_limit: u32,
    /// Fixed seed for reproducible games; drawn from the OS when `None`.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            undo_limit: 1,
            seed: None,
        }
    }
}

/// Everything the input loop can ask of a game.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Undo,
    Reset,
    Quit,
}

/// One board in the game's history. Never modified once recorded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GameState {
    grid: Grid,
}

impl GameState {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

/// What a renderer needs to draw the current position.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub cells: [u32; CELLS],
    pub steps: u32,
    pub score: u32,
    pub game_over: bool,
    pub game_won: bool,
}

pub struct Game {
    // oldest first, never empty; `scores` runs parallel to it
    history: Vec<GameState>,
    scores: Vec<u32>,
    steps: u32,
    game_over: bool,
    game_won: bool,
    undo_count: u32,
    undo_limit: u32,
    running: bool,
    rng: StdRng,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let grid = Grid::initial(&mut rng);
        Self::with_rng(grid, config.undo_limit, rng)
    }

    /// Starts from a chosen board instead of a random one.
    pub fn from_grid(grid: Grid, config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(grid, config.undo_limit, rng)
    }

    fn with_rng(grid: Grid, undo_limit: u32, rng: StdRng) -> Self {
        Game {
            history: vec![GameState { grid }],
            scores: vec![0],
            steps: 0,
            game_over: false,
            game_won: false,
            undo_count: 0,
            undo_limit,
            running: true,
            rng,
        }
    }

    /// Applies one input command and reports whether anything visible
    /// changed, i.e. whether the board needs to be redrawn.
    pub fn play(&mut self, command: Command) -> bool {
        match command {
            Command::Move(direction) => self.apply_move(direction),
            Command::Undo => self.undo(),
            Command::Reset => {
                self.reset();
                true
            }
            Command::Quit => {
                self.running = false;
                false
            }
        }
    }

    pub fn apply_move(&mut self, direction: Direction) -> bool {
        if self.game_over {
            trace!("ignoring {direction:?}, game is over");
            return false;
        }

        let current = *self.grid();
        let (moved, gained) = current.shifted(direction);
        if moved == current {
            trace!("{direction:?} does not change the board");
            return false;
        }

        // a changed line always leaves a gap at its far end
        let next = moved.with_random_tile(&mut self.rng);
        let score = self.score() + gained;
        self.history.push(GameState { grid: next });
        self.scores.push(score);
        self.steps += 1;
        self.undo_count = 0;
        self.update_status();

        debug!(
            "step {}: {direction:?} scored {gained}, total {score}",
            self.steps
        );
        true
    }

    fn update_status(&mut self) {
        let grid = *self.grid();
        if !self.game_won && grid.has_won() {
            info!("2048 reached after {} steps", self.steps);
            self.game_won = true;
        }
        self.game_over = grid.is_stuck();
        if self.game_over {
            info!("no moves left, final score {}", self.score());
        }
    }

    pub fn undo(&mut self) -> bool {
        if self.undo_count >= self.undo_limit || self.history.len() <= 1 {
            trace!(
                "undo refused ({} of {} used, {} states)",
                self.undo_count,
                self.undo_limit,
                self.history.len()
            );
            return false;
        }

        self.history.pop();
        self.scores.pop();
        self.steps -= 1;
        self.game_over = false;
        self.undo_count += 1;

        debug!("undo back to step {}", self.steps);
        true
    }

    /// Throws away the whole game and deals a fresh board. The undo limit
    /// and the random generator carry over.
    pub fn reset(&mut self) {
        let grid = Grid::initial(&mut self.rng);
        self.history.clear();
        self.history.push(GameState { grid });
        self.scores.clear();
        self.scores.push(0);
        self.steps = 0;
        self.undo_count = 0;
        self.game_over = false;
        self.game_won = false;
        self.running = true;

        debug!("new game");
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cells: self.grid().values(),
            steps: self.steps,
            score: self.score(),
            game_over: self.game_over,
            game_won: self.game_won,
        }
    }

    pub fn grid(&self) -> &Grid {
        // history is never empty
        &self.history[self.history.len() - 1].grid
    }

    pub fn history(&self) -> &[GameState] {
        &self.history
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn score(&self) -> u32 {
        self.scores.last().copied().unwrap_or_default()
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_won(&self) -> bool {
        self.game_won
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn undo_limit(&self) -> u32 {
        self.undo_limit
    }
}
