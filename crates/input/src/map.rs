//! Key mapping from terminal events to game commands.

use crate::types::GameCommand;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map a key press to a game command.
///
/// The soft drop key maps to [`GameCommand::SoftDropPress`]; releases are
/// tracked by [`crate::InputHandler`].
pub fn map_key(key: KeyEvent) -> Option<GameCommand> {
    if should_quit(key) {
        return None;
    }
    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(GameCommand::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(GameCommand::MoveRight),
        code if is_soft_drop_key(code) => Some(GameCommand::SoftDropPress),

        // Rotation
        KeyCode::Up
        | KeyCode::Char('e')
        | KeyCode::Char('E')
        | KeyCode::Char('w')
        | KeyCode::Char('W') => Some(GameCommand::RotateCw),
        KeyCode::Char('q')
        | KeyCode::Char('Q')
        | KeyCode::Char('z')
        | KeyCode::Char('Z') => Some(GameCommand::RotateCcw),

        // Session
        KeyCode::Char('p') | KeyCode::Char('P') => Some(GameCommand::Pause),
        KeyCode::Char('g') | KeyCode::Char('G') => Some(GameCommand::Save),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(GameCommand::Load),
        KeyCode::Enter => Some(GameCommand::StartOrRestart),

        _ => None,
    }
}

/// Keys that hold the soft drop
pub fn is_soft_drop_key(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S')
    )
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
            && key.modifiers.contains(KeyModifiers::CONTROL))
}
