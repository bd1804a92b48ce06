//! Grid Snake - a single-player snake game
//!
//! This library provides:
//! - Headless simulation engine (game module)
//! - Terminal input mapping (input module)
//! - TUI rendering (render module)
//! - In-memory play statistics (metrics module)
//! - The interactive driver (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod telemetry;
