use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Command, Direction};

/// What a key press asks the driver to do
///
/// The mapping is context free; the driver decides what a key means given the
/// current session state (for example any key starts an idle session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Forward to the engine
    Command(Command),
    /// Ask to throw away the current session
    Restart,
    /// Answer yes to a pending question
    Confirm,
    Quit,
    /// Any other key
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => Self::turn(Direction::Up),
            KeyCode::Down => Self::turn(Direction::Down),
            KeyCode::Left => Self::turn(Direction::Left),
            KeyCode::Right => Self::turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => Self::turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => Self::turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => Self::turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => Self::turn(Direction::Right),

            // Controls
            KeyCode::Enter | KeyCode::Char(' ') => KeyAction::Command(Command::TogglePause),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
            KeyCode::Char('y') | KeyCode::Char('Y') => KeyAction::Confirm,

            _ => KeyAction::None,
        }
    }

    fn turn(direction: Direction) -> KeyAction {
        KeyAction::Command(Command::Turn(direction))
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyAction {
        InputHandler::new().handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(press(KeyCode::Up), KeyAction::Command(Command::Turn(Direction::Up)));
        assert_eq!(
            press(KeyCode::Down),
            KeyAction::Command(Command::Turn(Direction::Down))
        );
        assert_eq!(
            press(KeyCode::Left),
            KeyAction::Command(Command::Turn(Direction::Left))
        );
        assert_eq!(
            press(KeyCode::Right),
            KeyAction::Command(Command::Turn(Direction::Right))
        );
    }

    #[test]
    fn test_wasd_keys() {
        assert_eq!(
            press(KeyCode::Char('w')),
            KeyAction::Command(Command::Turn(Direction::Up))
        );
        assert_eq!(
            press(KeyCode::Char('a')),
            KeyAction::Command(Command::Turn(Direction::Left))
        );
        assert_eq!(
            press(KeyCode::Char('s')),
            KeyAction::Command(Command::Turn(Direction::Down))
        );
        assert_eq!(
            press(KeyCode::Char('d')),
            KeyAction::Command(Command::Turn(Direction::Right))
        );
    }

    #[test]
    fn test_wasd_uppercase() {
        let handler = InputHandler::new();

        let w_upper = KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(w_upper),
            KeyAction::Command(Command::Turn(Direction::Up))
        );
    }

    #[test]
    fn test_pause_keys() {
        assert_eq!(press(KeyCode::Enter), KeyAction::Command(Command::TogglePause));
        assert_eq!(
            press(KeyCode::Char(' ')),
            KeyAction::Command(Command::TogglePause)
        );
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(press(KeyCode::Char('q')), KeyAction::Quit);
        assert_eq!(press(KeyCode::Char('Q')), KeyAction::Quit);
        assert_eq!(press(KeyCode::Esc), KeyAction::Quit);
    }

    #[test]
    fn test_restart_and_confirm_keys() {
        assert_eq!(press(KeyCode::Char('r')), KeyAction::Restart);
        assert_eq!(press(KeyCode::Char('R')), KeyAction::Restart);
        assert_eq!(press(KeyCode::Char('y')), KeyAction::Confirm);
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(press(KeyCode::Char('x')), KeyAction::None);
        assert_eq!(press(KeyCode::Char('n')), KeyAction::None);
    }

    #[test]
    fn test_ctrl_c() {
        let handler = InputHandler::new();

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }
}
