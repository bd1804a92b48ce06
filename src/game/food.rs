use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Grid};
use super::snake::SnakeBody;

/// Random draws tried before falling back to scanning for free cells
const MAX_DRAWS: usize = 64;

/// How food placement treats cells already covered by the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// Redraw until the cell is free of the snake
    #[default]
    Resample,
    /// Take a single uniform draw, even if it lands on the snake
    AllowOverlap,
}

impl fmt::Display for SpawnPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnPolicy::Resample => write!(f, "resample"),
            SpawnPolicy::AllowOverlap => write!(f, "allow-overlap"),
        }
    }
}

impl FromStr for SpawnPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "resample" => Ok(SpawnPolicy::Resample),
            "allow-overlap" => Ok(SpawnPolicy::AllowOverlap),
            other => Err(format!(
                "unknown food policy '{other}' (expected 'resample' or 'allow-overlap')"
            )),
        }
    }
}

/// Places food on the grid
pub struct FoodSpawner {
    rng: StdRng,
    policy: SpawnPolicy,
}

impl FoodSpawner {
    /// Create a spawner; a fixed `seed` makes placement reproducible
    pub fn new(policy: SpawnPolicy, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, policy }
    }

    pub fn policy(&self) -> SpawnPolicy {
        self.policy
    }

    /// Pick the next food cell
    ///
    /// Under [`SpawnPolicy::Resample`] the result never overlaps the snake and
    /// is `None` only when the snake covers every cell of the grid. Under
    /// [`SpawnPolicy::AllowOverlap`] a cell is always returned.
    pub fn spawn(&mut self, grid: &Grid, snake: &SnakeBody) -> Option<Cell> {
        match self.policy {
            SpawnPolicy::AllowOverlap => Some(self.random_cell(grid)),
            SpawnPolicy::Resample => {
                for _ in 0..MAX_DRAWS {
                    let cell = self.random_cell(grid);
                    if !snake.occupies(cell) {
                        return Some(cell);
                    }
                }

                // Crowded board: choose uniformly among whatever is left
                let free: Vec<Cell> = grid.cells().filter(|&c| !snake.occupies(c)).collect();
                free.choose(&mut self.rng).copied()
            }
        }
    }

    fn random_cell(&mut self, grid: &Grid) -> Cell {
        let x = self.rng.gen_range(0..grid.width()) as i32;
        let y = self.rng.gen_range(0..grid.height()) as i32;
        Cell::new(x, y)
    }
}
