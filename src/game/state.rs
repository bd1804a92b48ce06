use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::grid::{Cell, Grid};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Constructed, not yet started
    Idle,
    Running,
    Paused,
    /// Terminal until the next reset
    Over,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// No free cell left for food
    BoardFull,
}

/// Notifications emitted by a tick, in the order they happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    ScoreChanged { score: u32, gained: u32 },
    /// Speed changed; `cadence` is the new time between ticks
    SpeedChanged { speed: u32, cadence: Duration },
    /// Fired exactly once per session
    GameEnded { reason: CollisionType, score: u32 },
}

/// Read-only copy of everything a renderer needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub grid: Grid,
    /// Snake segments, head first
    pub snake: Vec<Cell>,
    pub food: Option<Cell>,
    pub score: u32,
    pub speed: u32,
    pub status: GameStatus,
    pub end_reason: Option<CollisionType>,
}

impl GameSnapshot {
    pub fn head(&self) -> Option<Cell> {
        self.snake.first().copied()
    }

    pub fn is_snake(&self, cell: Cell) -> bool {
        self.snake.contains(&cell)
    }
}
