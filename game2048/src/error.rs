use derive_more::{Display, Error};

/// Rejected input when building tiles or grids from raw cell values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum GridError {
    #[display("{value} is not a tile value (expected a power of two >= 2)")]
    InvalidTile { value: u32 },
    #[display("{value} is above the largest tile value 131072")]
    TileTooLarge { value: u32 },
    #[display("cell {index} holds {value}, which is not 0 or a power of two from 2 to 131072")]
    InvalidCell { index: usize, value: u32 },
}
