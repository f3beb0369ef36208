use std::fmt;

use crossterm::{
    cursor::MoveTo,
    style::{Color, Stylize},
    terminal::{Clear, ClearType},
    Command,
};
use game2048::{Snapshot, SIZE, WINNING_VALUE};

const TILE_WIDTH: usize = 8;
const TILE_HEIGHT: usize = 3;

/// Redraws the whole screen from a snapshot: the board, then the stats.
pub struct Board<'a>(pub &'a Snapshot);

impl<'a> Command for Board<'a> {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        MoveTo(0, 0).write_ansi(f)?;
        Clear(ClearType::All).write_ansi(f)?;

        for row in self.0.cells.chunks(SIZE) {
            for line in 0..TILE_HEIGHT {
                for &value in row {
                    print_tile_line(f, value, line == TILE_HEIGHT / 2)?;
                }
                write!(f, "\r\n")?;
            }
        }
        write!(f, "\r\n")?;
        print_stats(f, self.0)
    }
}

// 256-colour background per tile value
fn tile_color(value: u32) -> Color {
    Color::AnsiValue(match value {
        0 => 231,
        2 => 230,
        4 => 228,
        8 => 220,
        16 => 215,
        32 => 202,
        64 => 169,
        128 => 221,
        256 => 214,
        512 => 178,
        1024 => 172,
        2048 => 136,
        _ => 236,
    })
}

fn print_tile_line(f: &mut impl fmt::Write, value: u32, with_label: bool) -> fmt::Result {
    let text = if with_label && value != 0 {
        format!("{: ^width$}", value, width = TILE_WIDTH)
    } else {
        " ".repeat(TILE_WIDTH)
    };
    let fg = if value > WINNING_VALUE {
        Color::AnsiValue(255)
    } else {
        Color::AnsiValue(232)
    };
    write!(f, "{}", text.with(fg).on(tile_color(value)))
}

fn print_stats(f: &mut impl fmt::Write, snapshot: &Snapshot) -> fmt::Result {
    write!(f, "Round {}\r\n", snapshot.steps)?;
    write!(f, "Points: {}\r\n", snapshot.score)?;
    if snapshot.game_over {
        write!(f, "{}\r\n", "GAME OVER".bold())?;
    }
    if snapshot.game_won {
        write!(f, "You've reached {WINNING_VALUE} and won! Yay!\r\n")?;
    }
    write!(f, "\r\narrows: move  u: undo  n: new game  q: quit\r\n")
}
