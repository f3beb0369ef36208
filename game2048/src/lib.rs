//! Game engine for the 2048 sliding-tile puzzle: board resolution, tile
//! spawning, win/loss detection and a bounded undo history.

mod error;
mod game;
mod grid;
mod tile;

pub use error::GridError;
pub use game::{Command, Game, GameConfig, GameState, Snapshot};
pub use grid::{Direction, Grid, CELLS, LINES, SIZE};
pub use tile::{Tile, MAX_TILE_VALUE, WINNING_VALUE};
