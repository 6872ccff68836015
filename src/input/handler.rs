use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::game::{Command, Direction};

/// Maps terminal key presses onto game commands
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// `None` for keys the game does not use, and for release/repeat events
    pub fn handle_key_event(&self, key: KeyEvent) -> Option<Command> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let command = match key.code {
            // Movement - Arrow keys
            KeyCode::Up => Command::Turn(Direction::Up),
            KeyCode::Down => Command::Turn(Direction::Down),
            KeyCode::Left => Command::Turn(Direction::Left),
            KeyCode::Right => Command::Turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => Command::Turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => Command::Turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => Command::Turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => Command::Turn(Direction::Right),

            // Controls
            KeyCode::Enter | KeyCode::Char(' ') => Command::Start,
            KeyCode::Char('r') | KeyCode::Char('R') => Command::Restart,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Command::Quit,

            _ => return None,
        };

        Some(command)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
