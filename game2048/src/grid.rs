use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::{tile::WINNING_VALUE, GridError, Tile};

pub const SIZE: usize = 4;
pub const CELLS: usize = SIZE * SIZE;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Cell indices of every line, listed in the order tiles compact
    /// towards: the first index is where the line's tiles end up.
    pub fn lines(self) -> &'static [[usize; SIZE]; SIZE] {
        &LINES[self as usize]
    }
}

/// Compaction orderings, indexed by `Direction as usize`.
pub static LINES: [[[usize; SIZE]; SIZE]; 4] = [
    // up
    [[0, 4, 8, 12], [1, 5, 9, 13], [2, 6, 10, 14], [3, 7, 11, 15]],
    // down
    [[12, 8, 4, 0], [13, 9, 5, 1], [14, 10, 6, 2], [15, 11, 7, 3]],
    // left
    [[0, 1, 2, 3], [4, 5, 6, 7], [8, 9, 10, 11], [12, 13, 14, 15]],
    // right
    [[3, 2, 1, 0], [7, 6, 5, 4], [11, 10, 9, 8], [15, 14, 13, 12]],
];

/// A 4x4 board, row-major. Boards are values: every operation returns a
/// new grid and leaves `self` untouched.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [Option<Tile>; CELLS],
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl Grid {
    pub const fn empty() -> Self {
        Grid {
            cells: [None; CELLS],
        }
    }

    /// Two tiles on two distinct random cells of an empty board.
    pub fn initial<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Grid::empty().with_random_tile(rng).with_random_tile(rng)
    }

    /// Builds a grid from plain cell values, 0 meaning empty.
    pub fn from_values(values: [u32; CELLS]) -> Result<Self, GridError> {
        let mut cells = [None; CELLS];
        for (index, &value) in values.iter().enumerate() {
            if value != 0 {
                let tile = Tile::from_value(value)
                    .map_err(|_| GridError::InvalidCell { index, value })?;
                cells[index] = Some(tile);
            }
        }
        Ok(Grid { cells })
    }

    pub fn values(&self) -> [u32; CELLS] {
        self.cells.map(|t| t.map_or(0, |t| t.value()))
    }

    pub fn get(&self, index: usize) -> Option<Tile> {
        self.cells.get(index).copied().flatten()
    }

    pub fn rows(&self) -> [[Option<Tile>; SIZE]; SIZE] {
        std::array::from_fn(|row| std::array::from_fn(|col| self.cells[row * SIZE + col]))
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|t| t.is_none()).count()
    }

    pub fn max_tile(&self) -> Option<Tile> {
        self.cells.iter().flatten().max().copied()
    }

    /// Slides every line towards `direction`, returning the resulting grid
    /// and the points scored by its merges. No tile is spawned.
    pub fn shifted(&self, direction: Direction) -> (Grid, u32) {
        let mut next = Grid::empty();
        let mut gained = 0;
        for line in direction.lines() {
            let (resolved, points) = resolve_line(line.map(|idx| self.cells[idx]));
            for (&idx, tile) in line.iter().zip(resolved) {
                next.cells[idx] = tile;
            }
            gained += points;
        }
        (next, gained)
    }

    /// Places a random tile on a random empty cell, sampling cells until an
    /// empty one turns up. A full grid is returned as is.
    pub fn with_random_tile<R: Rng + ?Sized>(&self, rng: &mut R) -> Grid {
        debug_assert!(self.empty_count() > 0, "spawning on a full grid");
        if self.empty_count() == 0 {
            return *self;
        }

        loop {
            let idx = rng.random_range(0..CELLS);
            if self.cells[idx].is_none() {
                let mut next = *self;
                next.cells[idx] = Some(rng.random());
                return next;
            }
        }
    }

    /// Full, and no two neighbouring cells (horizontally or vertically)
    /// hold the same tile.
    pub fn is_stuck(&self) -> bool {
        if self.cells.iter().any(Option::is_none) {
            return false;
        }

        for idx in 0..CELLS {
            let (row, col) = (idx / SIZE, idx % SIZE);
            if col + 1 < SIZE && self.cells[idx] == self.cells[idx + 1] {
                return false;
            }
            if row + 1 < SIZE && self.cells[idx] == self.cells[idx + SIZE] {
                return false;
            }
        }
        true
    }

    pub fn has_won(&self) -> bool {
        self.cells
            .iter()
            .flatten()
            .any(|t| t.value() >= WINNING_VALUE)
    }
}

// tiles arrive in compaction order, so index 0 is where the line piles up
fn resolve_line(line: [Option<Tile>; SIZE]) -> ([Option<Tile>; SIZE], u32) {
    let mut out = [None; SIZE];
    let mut filled = 0;
    let mut points = 0;

    let mut i = 0;
    while i < SIZE {
        let Some(tile) = line[i] else {
            i += 1;
            continue;
        };

        let blocker = (i + 1..SIZE).find(|&j| line[j].is_some());
        match blocker {
            Some(j) if line[j] == Some(tile) => {
                let merged = tile.double();
                points += merged.value();
                out[filled] = Some(merged);
                // the merged pair is consumed; it can't merge again this move
                i = j + 1;
            }
            _ => {
                out[filled] = Some(tile);
                i += 1;
            }
        }
        filled += 1;
    }

    (out, points)
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows().iter() {
            for tile in row.iter() {
                match tile {
                    Some(tile) => write!(f, "|{: ^6}", tile.value())?,
                    None => write!(f, "|{: ^6}", " ")?,
                }
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, SeedableRng};

    use super::{resolve_line, Direction, Grid, CELLS, LINES};
    use crate::{GridError, Tile, MAX_TILE_VALUE};

    fn line(values: [u32; 4]) -> [Option<Tile>; 4] {
        values.map(|v| (v != 0).then(|| Tile::from_value(v).unwrap()))
    }

    fn resolved(values: [u32; 4]) -> ([u32; 4], u32) {
        let (out, points) = resolve_line(line(values));
        (out.map(|t| t.map_or(0, |t| t.value())), points)
    }

    #[test]
    fn lines_cover_every_cell_once() {
        for lines in LINES.iter() {
            let mut seen = [0; CELLS];
            for idx in lines.iter().flatten() {
                seen[*idx] += 1;
            }
            assert_eq!(seen, [1; CELLS]);
        }
    }

    #[test]
    fn no_double_merge() {
        assert_eq!(resolved([2, 2, 2, 2]), ([4, 4, 0, 0], 8));
        assert_eq!(resolved([4, 4, 8, 0]), ([8, 8, 0, 0], 8));
    }

    #[test]
    fn merges_across_gaps() {
        assert_eq!(resolved([2, 0, 0, 2]), ([4, 0, 0, 0], 4));
        assert_eq!(resolved([0, 2, 0, 2]), ([4, 0, 0, 0], 4));
        assert_eq!(resolved([2, 0, 2, 2]), ([4, 2, 0, 0], 4));
    }

    #[test]
    fn blocked_tiles_only_slide() {
        assert_eq!(resolved([2, 4, 2, 4]), ([2, 4, 2, 4], 0));
        assert_eq!(resolved([0, 0, 0, 8]), ([8, 0, 0, 0], 0));
        assert_eq!(resolved([2, 4, 4, 0]), ([2, 8, 0, 0], 8));
        assert_eq!(resolved([0, 0, 0, 0]), ([0, 0, 0, 0], 0));
    }

    // column top-to-bottom [2, 2, 4, 4] moved up becomes [4, 8, 0, 0]
    #[test]
    fn up_move_merges_column() {
        #[rustfmt::skip]
        let grid = Grid::from_values([
            2, 2, 0, 2,
            2, 0, 0, 4,
            4, 0, 0, 0,
            4, 2, 2, 4,
        ])
        .unwrap();

        let (next, points) = grid.shifted(Direction::Up);
        #[rustfmt::skip]
        assert_eq!(next.values(), [
            4, 4, 2, 2,
            8, 0, 0, 8,
            0, 0, 0, 0,
            0, 0, 0, 0,
        ]);
        assert_eq!(points, 4 + 8 + 4 + 8);
    }

    #[test]
    fn every_direction() {
        #[rustfmt::skip]
        let grid = Grid::from_values([
            2, 2, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 4,
        ])
        .unwrap();

        let values = |d| grid.shifted(d).0.values();
        #[rustfmt::skip]
        assert_eq!(values(Direction::Left), [
            4, 0, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 0,
            4, 0, 0, 0,
        ]);
        #[rustfmt::skip]
        assert_eq!(values(Direction::Right), [
            0, 0, 0, 4,
            0, 0, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 4,
        ]);
        #[rustfmt::skip]
        assert_eq!(values(Direction::Down), [
            0, 0, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 0,
            2, 2, 0, 4,
        ]);
        assert_eq!(grid.shifted(Direction::Up).0.get(3), Some(Tile::FOUR));
    }

    #[test]
    fn blocked_move_is_identity() {
        #[rustfmt::skip]
        let grid = Grid::from_values([
            128, 64, 32, 8,
            8,   4,  8,  4,
            0,   0,  0,  0,
            0,   0,  0,  0,
        ])
        .unwrap();
        assert_eq!(grid.shifted(Direction::Right), (grid, 0));
        assert_eq!(grid.shifted(Direction::Up), (grid, 0));
        assert_ne!(grid.shifted(Direction::Down).0, grid);
    }

    #[test]
    fn stuck_detection() {
        let distinct: [u32; 16] = std::array::from_fn(|i| 2 << i);
        let grid = Grid::from_values(distinct).unwrap();
        assert!(grid.is_stuck());

        // one equal pair anywhere frees the board: try every adjacent pair
        for idx in 0..CELLS {
            let mut neighbours = vec![];
            if idx % 4 < 3 {
                neighbours.push(idx + 1);
            }
            if idx / 4 < 3 {
                neighbours.push(idx + 4);
            }
            for n in neighbours {
                let mut values = distinct;
                values[n] = values[idx];
                assert!(!Grid::from_values(values).unwrap().is_stuck(), "{idx}-{n}");
            }
        }

        let mut values = distinct;
        values[9] = 0;
        assert!(!Grid::from_values(values).unwrap().is_stuck());
    }

    #[test]
    fn diagonal_pair_is_still_stuck() {
        let mut values: [u32; 16] = std::array::from_fn(|i| 2 << i);
        values[5] = values[0];
        assert!(Grid::from_values(values).unwrap().is_stuck());
    }

    #[test]
    fn spawning() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let grid = Grid::initial(&mut rng);
            assert_eq!(grid.empty_count(), CELLS - 2);
            assert!(grid
                .values()
                .iter()
                .all(|v| matches!(v, 0 | 2 | 4)));
        }

        let mut values = [2; 16];
        values[10] = 0;
        let grid = Grid::from_values(values).unwrap().with_random_tile(&mut rng);
        assert_eq!(grid.empty_count(), 0);
        assert!(grid.get(10).is_some());
    }

    #[test]
    fn largest_tiles_merge() {
        let mut values = [0; 16];
        values[0] = MAX_TILE_VALUE;
        values[1] = MAX_TILE_VALUE;
        let (next, points) = Grid::from_values(values).unwrap().shifted(Direction::Left);
        assert_eq!(next.get(0).map(|t| t.value()), Some(MAX_TILE_VALUE * 2));
        assert_eq!(points, MAX_TILE_VALUE * 2);

        values[2] = 1 << 31;
        assert_eq!(
            Grid::from_values(values),
            Err(GridError::InvalidCell { index: 2, value: 1 << 31 })
        );
    }

    // every empty cell should be hit about equally often
    #[test]
    fn spawn_cell_is_uniform() {
        let mut values = [2; 16];
        let empty = [0, 3, 6, 9, 12, 15];
        for idx in empty {
            values[idx] = 0;
        }
        let grid = Grid::from_values(values).unwrap();

        let mut rng = StdRng::seed_from_u64(42);
        let mut hits = [0u32; CELLS];
        let draws = 12_000;
        for _ in 0..draws {
            let next = grid.with_random_tile(&mut rng);
            let idx = (0..CELLS)
                .find(|&i| grid.get(i).is_none() && next.get(i).is_some())
                .unwrap();
            hits[idx] += 1;
        }

        // expected 2000 each
        for (idx, &count) in hits.iter().enumerate() {
            if empty.contains(&idx) {
                assert!((1800..2200).contains(&count), "cell {idx}: {count}");
            } else {
                assert_eq!(count, 0, "cell {idx} was occupied");
            }
        }
    }

    #[test]
    fn from_values_reports_cell() {
        let mut values = [0; 16];
        values[6] = 12;
        assert_eq!(
            Grid::from_values(values),
            Err(GridError::InvalidCell { index: 6, value: 12 })
        );
    }

    #[test]
    fn display() {
        let mut values = [0; 16];
        values[0] = 2;
        values[15] = 2048;
        let grid = Grid::from_values(values).unwrap();
        assert_eq!(grid.max_tile().map(|t| t.value()), Some(2048));
        let text = grid.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("|  2   |"));
        assert!(lines[3].ends_with("| 2048 |"));
    }
}
