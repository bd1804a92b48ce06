use serde::{Deserialize, Serialize};

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }

    /// The geometric reverse of this direction
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
        }
    }

    /// Map a browser-style arrow key code (37..=40) to a direction
    ///
    /// Any other value is rejected.
    pub fn from_key_code(code: u32) -> Option<Direction> {
        match code {
            37 => Some(Direction::Left),
            38 => Some(Direction::Up),
            39 => Some(Direction::Right),
            40 => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Commands that mutate a running session, pushed by input handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Steer the snake
    Turn(Direction),
    /// Flip between running and paused
    TogglePause,
    /// Throw the session away and start a fresh one
    Reset,
}

impl From<Direction> for Command {
    fn from(direction: Direction) -> Self {
        Command::Turn(direction)
    }
}
