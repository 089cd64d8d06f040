// Framework bootstrap for the headless game runtime.

use crate::domain::{GamePhase, Tuning, World, WorldSettings};
use crate::frameworks::arena;
use crate::frameworks::config::{self, ConfigError};
use crate::interface_adapters::{KeyStack, frame_serializer, play_script};
use crate::use_cases::{GameError, GameHandle, start_game};
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Loads `.env`, installs the tracing subscriber and routes panics into the log.
pub fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config::DEFAULT_LOG_FILTER));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match config::log_format() {
        config::LogFormat::Json => subscriber.json().with_current_span(true).init(),
        config::LogFormat::Compact => subscriber.compact().init(),
    }

    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, %location, ?backtrace, "simulation panicked");
    }));
}

/// Tuning from `GAME_TUNING_PATH`, or defaults when unset or the file is missing.
fn tuning() -> Result<Tuning, ConfigError> {
    let Some(path) = config::tuning_path() else {
        return Ok(Tuning::default());
    };
    match config::load_tuning(&path) {
        Ok(tuning) => {
            info!(path = %path.display(), "tuning loaded");
            Ok(tuning)
        }
        Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "tuning file not found; using defaults");
            Ok(Tuning::default())
        }
        Err(e) => Err(e),
    }
}

pub async fn run_with_config() -> Result<(), RunError> {
    init_runtime();

    let tuning = tuning()?;
    let map = Arc::new(arena::arena_map().map_err(ConfigError::from)?);
    let settings = config::game_settings();
    let seed = config::seed();

    let world = World::new(
        map,
        tuning,
        WorldSettings {
            tick_seconds: 1.0 / f64::from(settings.tick_rate),
            seed,
        },
    );
    let game = start_game(world, KeyStack::new(), &settings)?;

    // Headless render: keep the latest serialized frame, log the HUD periodically.
    let (frame_tx, _frame_rx) = watch::channel(String::new());
    let serializer = tokio::spawn(frame_serializer(
        game.world_rx.clone(),
        game.phase_rx.clone(),
        frame_tx,
        config::hud_log_every(),
    ));

    let steps = match config::script_path() {
        Some(path) => config::load_script(&path)?,
        None => arena::demo_script(),
    };
    let script = tokio::spawn(play_script(steps, game.input_tx.clone()));

    info!(seed, tick_rate = settings.tick_rate, "game running");
    let ticks = drive(game).await;

    script.abort();
    let _ = serializer.await;

    let ticks = ticks?;
    info!(ticks, "run finished");
    Ok(())
}

/// Runs until game over, the configured run time, or Ctrl-C, whichever comes first.
async fn drive(game: GameHandle) -> Result<u64, GameError> {
    let mut phase_rx = game.phase_rx.clone();
    let game_over = async move {
        // An error means the loop is gone; joining reports why.
        let _ = phase_rx.wait_for(|phase| *phase == GamePhase::GameOver).await;
    };
    let deadline = async {
        match config::run_duration() {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        _ = game_over => game.join().await,
        _ = deadline => {
            info!("run time elapsed");
            game.stop().await
        }
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted");
            game.stop().await
        }
    }
}
