use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use game2048::{Command, Direction};

/// Maps a terminal event to a game command. Anything that isn't a key
/// press we know about is ignored.
pub fn command_for(event: &Event) -> Option<Command> {
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        ..
    }) = event
    else {
        return None;
    };

    let command = match (code, *modifiers) {
        (KeyCode::Left, KeyModifiers::NONE) => Command::Move(Direction::Left),
        (KeyCode::Right, KeyModifiers::NONE) => Command::Move(Direction::Right),
        (KeyCode::Up, KeyModifiers::NONE) => Command::Move(Direction::Up),
        (KeyCode::Down, KeyModifiers::NONE) => Command::Move(Direction::Down),
        (KeyCode::Char('u'), KeyModifiers::NONE) => Command::Undo,
        (KeyCode::Char('n'), KeyModifiers::NONE) => Command::Reset,
        (KeyCode::Esc | KeyCode::Char('q'), KeyModifiers::NONE) => Command::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Command::Quit,
        _ => return None,
    };
    Some(command)
}
