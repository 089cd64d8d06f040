use crate::domain::{MapError, Tuning};
use crate::interface_adapters::{ScriptStep, parse_script};
use crate::use_cases::GameSettings;
use std::path::{Path, PathBuf};
use std::{env, fs, io, time::Duration};
use thiserror::Error;

// Runtime constants (not gameplay tuning).

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const MAX_CATCH_UP_TICKS: u32 = 8;

/// Used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid tuning in {}: {source}", .path.display())]
    Tuning {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid input script in {}: {source}", .path.display())]
    Script {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid map: {0}")]
    Map(#[from] MapError),
}

/// `LOG_FORMAT=json` switches to structured output.
pub fn log_format() -> LogFormat {
    LogFormat::parse(env::var("LOG_FORMAT").ok().as_deref())
}

pub fn tick_rate() -> u32 {
    env::var("GAME_TICK_RATE")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|rate| *rate > 0)
        .unwrap_or(60)
}

/// Seed for enemy AI. Random when unset; the chosen value is logged at startup.
pub fn seed() -> u64 {
    env::var("GAME_SEED")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(rand::random)
}

/// How long the headless run lasts. `0` runs until game over.
pub fn run_duration() -> Option<Duration> {
    let seconds = env::var("GAME_RUN_SECONDS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(30);
    (seconds > 0).then(|| Duration::from_secs(seconds))
}

pub fn tuning_path() -> Option<PathBuf> {
    env::var_os("GAME_TUNING_PATH").map(PathBuf::from)
}

pub fn script_path() -> Option<PathBuf> {
    env::var_os("GAME_SCRIPT_PATH").map(PathBuf::from)
}

/// Ticks between HUD log lines; `0` disables them.
pub fn hud_log_every() -> u64 {
    env::var("GAME_HUD_LOG_EVERY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(60)
}

pub fn game_settings() -> GameSettings {
    GameSettings {
        tick_rate: tick_rate(),
        input_channel_capacity: INPUT_CHANNEL_CAPACITY,
        max_catch_up_ticks: MAX_CATCH_UP_TICKS,
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a TOML tuning file. Missing keys keep their defaults.
pub fn load_tuning(path: &Path) -> Result<Tuning, ConfigError> {
    let text = read(path)?;
    toml::from_str(&text).map_err(|source| ConfigError::Tuning {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>, ConfigError> {
    let text = read(path)?;
    parse_script(&text).map_err(|source| ConfigError::Script {
        path: path.to_path_buf(),
        source,
    })
}
