use std::{fmt, num::NonZeroU32};

use rand::{
    distr::{Distribution, StandardUniform},
    Rng,
};

use crate::GridError;

/// Value that marks a won game.
pub const WINNING_VALUE: u32 = 2048;

/// Largest value a tile may be built with. Merges can go past it, but a
/// board of such tiles can never reach a value that overflows a `u32`.
pub const MAX_TILE_VALUE: u32 = 1 << 17;

// which power of two. NonZero because two is the lowest
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tile(NonZeroU32);

impl Tile {
    pub const TWO: Tile = Tile(NonZeroU32::MIN);
    pub const FOUR: Tile = Tile::TWO.double();

    pub const fn double(&self) -> Tile {
        Tile(self.0.saturating_add(1))
    }

    pub const fn value(&self) -> u32 {
        1 << self.0.get()
    }

    pub const fn exponent(&self) -> u32 {
        self.0.get()
    }

    pub fn from_value(value: u32) -> Result<Tile, GridError> {
        if value < 2 || !value.is_power_of_two() {
            return Err(GridError::InvalidTile { value });
        }
        if value > MAX_TILE_VALUE {
            return Err(GridError::TileTooLarge { value });
        }
        NonZeroU32::new(value.trailing_zeros())
            .map(Tile)
            .ok_or(GridError::InvalidTile { value })
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tile({})", self.value())
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value(), f)
    }
}

/// New tiles are a 2 nine times out of ten, otherwise a 4.
impl Distribution<Tile> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Tile {
        if rng.random_bool(0.9) {
            Tile::TWO
        } else {
            Tile::FOUR
        }
    }
}
