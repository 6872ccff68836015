use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tick_snake::game::GameConfig;
use tick_snake::logging::{LogSink, init_tracing};
use tick_snake::modes::{HeadlessMode, PlayMode};
use tracing::info;

#[derive(Parser)]
#[command(name = "tick_snake")]
#[command(version, about = "Snake on a fixed-tick grid")]
struct Cli {
    /// Game mode
    #[arg(long, value_enum, default_value = "play")]
    mode: Mode,

    /// JSON game config; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Milliseconds between ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Log file used by play mode
    #[arg(long, default_value = "tick_snake.log")]
    log_file: PathBuf,

    /// Headless command script (U/D/L/R turn then tick, `.` ticks)
    #[arg(long, default_value = "")]
    script: String,

    /// Headless: keep ticking after the script until this many ticks
    #[arg(long, default_value = "0")]
    max_ticks: usize,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Play,
    /// Run a scripted game and print a JSON report
    Headless,
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
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let sink = match cli.mode {
        Mode::Play => LogSink::File(&cli.log_file),
        Mode::Headless => LogSink::Stderr,
    };
    init_tracing(sink)?;

    let config = cli.game_config()?;
    info!(
        width = config.grid_width,
        height = config.grid_height,
        tick_ms = config.tick_interval_ms,
        "config loaded"
    );

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Play => {
            let mut play_mode = PlayMode::new(config, cli.seed);
            play_mode.run().await?;
        }
        Mode::Headless => {
            let mut headless = HeadlessMode::new(config, cli.seed);
            let report = headless.run(&cli.script, cli.max_ticks);
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            println!("{json}");
        }
    }

    Ok(())
}
