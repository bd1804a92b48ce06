//! Core game logic module for Snake
//!
//! This module contains the simulation without any I/O, timers or rendering.
//! A driver owns a [`GameEngine`], calls [`GameEngine::tick`] at the engine's
//! cadence and reads [`GameSnapshot`]s back out.

pub mod action;
pub mod config;
pub mod engine;
pub mod food;
pub mod grid;
pub mod snake;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use config::GameConfig;
pub use engine::{GameEngine, TickResult};
pub use food::{FoodSpawner, SpawnPolicy};
pub use grid::{Cell, Grid};
pub use snake::SnakeBody;
pub use state::{CollisionType, GameEvent, GameSnapshot, GameStatus};
