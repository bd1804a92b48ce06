use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, trace};

use super::{
    action::{Command, Direction},
    config::GameConfig,
    food::FoodSpawner,
    grid::{Cell, Grid},
    snake::SnakeBody,
    state::{CollisionType, GameEvent, GameSnapshot, GameStatus},
};

/// What happened during a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    /// Whether the snake advanced (false when not running)
    pub moved: bool,
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision: Option<CollisionType>,
    /// Notifications raised by this tick
    pub events: Vec<GameEvent>,
}

/// The game engine that owns a session and advances it one tick at a time
///
/// The engine holds no timer. The caller drives [`GameEngine::tick`] at
/// [`GameEngine::cadence`] and re-reads the cadence after every tick, since
/// eating food speeds the game up.
pub struct GameEngine {
    config: GameConfig,
    grid: Grid,
    spawner: FoodSpawner,
    snake: SnakeBody,
    food: Option<Cell>,
    direction: Direction,
    speed: u32,
    score: u32,
    ticks: u64,
    status: GameStatus,
    end_reason: Option<CollisionType>,
}

impl GameEngine {
    /// Create an idle engine; the first [`start`](Self::start) begins play
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;

        let grid = Grid::new(config.grid_width, config.grid_height);
        let mut spawner = FoodSpawner::new(config.food_policy, config.seed);
        let snake = Self::initial_snake(&config);
        let food = spawner.spawn(&grid, &snake);

        Ok(Self {
            direction: Direction::Right,
            speed: config.start_speed,
            score: 0,
            ticks: 0,
            status: GameStatus::Idle,
            end_reason: None,
            config,
            grid,
            spawner,
            snake,
            food,
        })
    }

    fn initial_snake(config: &GameConfig) -> SnakeBody {
        let head = Cell::new(config.initial_snake_length as i32 - 1, 0);
        SnakeBody::new(head, config.initial_snake_length)
    }

    /// Leave `Idle` and begin the first session
    pub fn start(&mut self) {
        if self.status == GameStatus::Idle {
            self.reset();
        }
    }

    /// Discard the current session and start a fresh one, from any state
    pub fn reset(&mut self) {
        self.snake = Self::initial_snake(&self.config);
        self.food = self.spawner.spawn(&self.grid, &self.snake);
        self.direction = Direction::Right;
        self.speed = self.config.start_speed;
        self.score = 0;
        self.ticks = 0;
        self.end_reason = None;
        self.status = GameStatus::Running;

        if self.food.is_none() {
            self.status = GameStatus::Over;
            self.end_reason = Some(CollisionType::BoardFull);
        }

        info!(
            width = self.grid.width(),
            height = self.grid.height(),
            speed = self.speed,
            food_policy = %self.spawner.policy(),
            "session reset"
        );
    }

    /// Advance the session by one cell
    ///
    /// Does nothing unless the session is running.
    pub fn tick(&mut self) -> TickResult {
        let mut result = TickResult::default();
        if self.status != GameStatus::Running {
            return result;
        }

        let vacated = self.snake.move_towards(self.direction);
        self.ticks += 1;
        result.moved = true;

        let collision = if self.snake.wall_collision(&self.grid) {
            Some(CollisionType::Wall)
        } else if self.snake.self_collision() {
            Some(CollisionType::SelfCollision)
        } else {
            None
        };

        if let Some(reason) = collision {
            result.collision = Some(reason);
            self.end(reason, &mut result.events);
            return result;
        }

        if self.food == Some(self.snake.head()) {
            result.ate_food = true;
            self.eat(vacated, &mut result.events);
        }

        result
    }

    /// Grow, then score, speed up and place the next food
    ///
    /// The new tail takes the cell the tail just left. When the head itself
    /// moved into that cell (or the tail did not move), growth waits for the
    /// next move so no cell is ever shared.
    fn eat(&mut self, vacated: Option<Cell>, events: &mut Vec<GameEvent>) {
        match vacated {
            Some(cell) if cell != self.snake.head() => self.snake.grow_into(cell),
            _ => self.snake.grow_on_next_move(),
        }

        let level = self.speed.saturating_sub(self.config.start_speed) + 1;
        let gained = self.config.score_multiplier.saturating_mul(level);
        self.score = self.score.saturating_add(gained);
        events.push(GameEvent::ScoreChanged {
            score: self.score,
            gained,
        });

        let speed = self
            .speed
            .saturating_add(self.config.speed_increment)
            .min(self.config.max_speed);
        if speed != self.speed {
            self.speed = speed;
            events.push(GameEvent::SpeedChanged {
                speed,
                cadence: self.cadence(),
            });
        }

        debug!(
            score = self.score,
            speed = self.speed,
            length = self.snake.len(),
            "food eaten"
        );

        self.food = self.spawner.spawn(&self.grid, &self.snake);
        if self.food.is_none() {
            self.end(CollisionType::BoardFull, events);
        }
    }

    fn end(&mut self, reason: CollisionType, events: &mut Vec<GameEvent>) {
        if self.status == GameStatus::Over {
            return;
        }

        self.status = GameStatus::Over;
        self.end_reason = Some(reason);
        events.push(GameEvent::GameEnded {
            reason,
            score: self.score,
        });
        info!(?reason, score = self.score, ticks = self.ticks, "game over");
    }

    /// Steer the snake; ignored unless running
    ///
    /// Reversing onto the neck is accepted and ends the game on the next tick.
    pub fn set_direction(&mut self, direction: Direction) {
        if self.status == GameStatus::Running {
            if direction == self.direction.opposite() {
                debug!(?direction, "reversing onto the neck");
            } else {
                trace!(?direction, "direction set");
            }
            self.direction = direction;
        }
    }

    /// Flip between running and paused; no effect when idle or over
    pub fn toggle_pause(&mut self) {
        self.status = match self.status {
            GameStatus::Running => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Running,
            other => other,
        };
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Turn(direction) => self.set_direction(direction),
            Command::TogglePause => self.toggle_pause(),
            Command::Reset => self.reset(),
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Current speed in ticks per second
    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Time between ticks at the current speed
    pub fn cadence(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.speed))
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Ticks taken since the last reset
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn snake(&self) -> &SnakeBody {
        &self.snake
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn end_reason(&self) -> Option<CollisionType> {
        self.end_reason
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            grid: self.grid,
            snake: self.snake.cells().collect(),
            food: self.food,
            score: self.score,
            speed: self.speed,
            status: self.status,
            end_reason: self.end_reason,
        }
    }
}
