use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_TICK_MS: u64 = 50;
pub const DEFAULT_AUTO_STOP_TITLE: &str = "Lucky draw";

/// Runtime knobs for a [`DrawEngine`](crate::engine::DrawEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawConfig {
    /// Period of the animation timer.
    pub tick_interval: Duration,
    /// Stop a running draw on its own after this long. `None` means the
    /// operator always stops it by hand.
    pub auto_stop_after: Option<Duration>,
    /// Title recorded when a draw stops itself.
    pub auto_stop_title: String,
    /// Fixed RNG seed for reproducible draws.
    pub seed: Option<u64>,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            auto_stop_after: None,
            auto_stop_title: DEFAULT_AUTO_STOP_TITLE.to_string(),
            seed: None,
        }
    }
}

impl DrawConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup. Missing keys fall
    /// back to their defaults; present but malformed values are rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("DRAW_TICK_MS") {
            let ms = parse_u64("DRAW_TICK_MS", &raw)?;
            if ms == 0 {
                return Err(ConfigError::InvalidValue { key: "DRAW_TICK_MS", value: raw });
            }
            config.tick_interval = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup("DRAW_AUTO_STOP_MS") {
            let ms = parse_u64("DRAW_AUTO_STOP_MS", &raw)?;
            // 0 turns auto-stop off rather than stopping instantly
            config.auto_stop_after = (ms > 0).then(|| Duration::from_millis(ms));
        }

        if let Some(title) = lookup("DRAW_AUTO_STOP_TITLE") {
            config.auto_stop_title = title;
        }

        if let Some(raw) = lookup("DRAW_SEED") {
            config.seed = Some(parse_u64("DRAW_SEED", &raw)?);
        }

        Ok(config)
    }
}

fn parse_u64(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}
