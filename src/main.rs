//! Headless soak driver
//!
//! Plays one seeded game with random inputs at a fixed frame rate, logging
//! engine events to a file, then prints the final stats as JSON.
//! Usage: `tetrs-engine [config.toml]`

use anyhow::Context;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::time::Duration;
use tetrs_engine::{EngineConfig, Game, GameEvent, RotationDirection};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);
/// Stop after ten minutes of simulated play
const MAX_FRAMES: u64 = TARGET_FPS * 60 * 10;

/// Get the log directory, creating it if needed
fn log_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("tetrs-engine");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> anyhow::Result<()> {
    let session_id: u32 = rand::random();
    let log_dir = log_dir();
    let log_file = format!("{:08x}.log", session_id);

    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tetrs_engine=debug".parse()?),
        )
        .with_ansi(false)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from(path.as_ref())?,
        None => EngineConfig::load(),
    };
    let seed = config.game.seed.unwrap_or_else(rand::random);
    tracing::info!(
        session = %format!("{:08x}", session_id),
        seed,
        log = %log_dir.join(&log_file).display(),
        "soak driver starting"
    );

    let mut game = Game::with_seed(config, seed).context("failed to build engine")?;
    let mut input_rng = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed);
    game.start();

    let mut frames = 0;
    let mut level_ups = 0;
    while game.is_running() && frames < MAX_FRAMES {
        // Roughly one input every eight frames
        match input_rng.gen_range(0..64) {
            0..=1 => {
                game.move_tetromino(-1, 0);
            }
            2..=3 => {
                game.move_tetromino(1, 0);
            }
            4 => {
                game.rotate_tetromino(RotationDirection::Clockwise);
            }
            5 => {
                game.rotate_tetromino(RotationDirection::CounterClockwise);
            }
            6 => {
                game.soft_drop();
            }
            7 => {
                game.hard_drop();
            }
            _ => {}
        }
        game.tick(FRAME_DURATION);
        frames += 1;

        for event in game.drain_events() {
            if let GameEvent::LevelUpdated { new, old } = event {
                level_ups += new - old;
            }
        }
    }

    let stats = game.stats();
    tracing::info!(frames, level_ups, "soak driver finished");
    println!("seed: {}", seed);
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
