use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use super::food::SpawnPolicy;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid in cells
    pub grid_width: u32,
    /// Height of the game grid in cells
    pub grid_height: u32,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    // Difficulty
    /// Ticks per second at the start of a session
    pub start_speed: u32,
    /// Speed gained per food eaten
    pub speed_increment: u32,
    /// Speed never rises above this
    pub max_speed: u32,
    /// Base points per food; scaled by how far speed has risen
    pub score_multiplier: u32,

    /// Food placement policy
    pub food_policy: SpawnPolicy,
    /// Fixed RNG seed for reproducible food placement
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            initial_snake_length: 8,
            start_speed: 15,
            speed_increment: 1,
            max_speed: 40,
            score_multiplier: 3,
            food_policy: SpawnPolicy::Resample,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self {
            initial_snake_length: 3,
            ..Self::new(10, 10)
        }
    }

    /// Read a configuration from a JSON file; missing fields take defaults
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that a session can be built from this configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_width > 0 && self.grid_height > 0,
            "grid must be at least 1x1, got {}x{}",
            self.grid_width,
            self.grid_height
        );
        ensure!(
            self.initial_snake_length >= 1,
            "initial snake length must be at least 1"
        );
        ensure!(
            self.initial_snake_length <= self.grid_width as usize,
            "initial snake length {} does not fit a grid {} cells wide",
            self.initial_snake_length,
            self.grid_width
        );
        ensure!(self.start_speed > 0, "start speed must be positive");
        ensure!(
            self.max_speed >= self.start_speed,
            "max speed {} is below start speed {}",
            self.max_speed,
            self.start_speed
        );
        Ok(())
    }
}
