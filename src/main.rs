use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use grid_snake::game::{GameConfig, SpawnPolicy};
use grid_snake::modes::HumanMode;
use grid_snake::telemetry;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Grid-based snake game for the terminal")]
struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<u32>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<u32>,

    /// Initial snake length
    #[arg(long)]
    length: Option<usize>,

    /// Ticks per second at the start of a session
    #[arg(long)]
    start_speed: Option<u32>,

    /// Upper bound for ticks per second
    #[arg(long)]
    max_speed: Option<u32>,

    /// Food placement policy: 'resample' or 'allow-overlap'
    #[arg(long)]
    food_policy: Option<SpawnPolicy>,

    /// Seed for reproducible food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level used with --log-file
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(length) = self.length {
            config.initial_snake_length = length;
        }
        if let Some(speed) = self.start_speed {
            config.start_speed = speed;
        }
        if let Some(speed) = self.max_speed {
            config.max_speed = speed;
        }
        if let Some(policy) = self.food_policy {
            config.food_policy = policy;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_file) = &cli.log_file {
        let level = telemetry::parse_level(&cli.log_level)?;
        telemetry::init(log_file, level)?;
    }

    let config = cli.game_config()?;
    tracing::info!(?config, "starting");

    let mut human_mode = HumanMode::new(config)?;
    human_mode.run().await?;

    Ok(())
}
