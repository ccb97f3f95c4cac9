//! Gesture configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::env::VarError;
use std::time::Duration;

use crate::consts::{DEFAULT_FRAME_INTERVAL, WHEEL_SETTLE};

pub const WHEEL_SETTLE_VAR: &str = "GESTURE_WHEEL_SETTLE_MS";
pub const DRAG_THROTTLE_VAR: &str = "GESTURE_DRAG_THROTTLE";
pub const FRAME_INTERVAL_VAR: &str = "GESTURE_FRAME_INTERVAL_MS";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a whole number of milliseconds, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must be greater than zero")]
    NonPositive { var: &'static str },
    #[error("{var} must be one of true|false|1|0|on|off, got {value:?}")]
    InvalidBool { var: &'static str, value: String },
    #[error("{var} is not valid unicode")]
    NotUnicode { var: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureConfig {
    /// Quiet period that ends a wheel burst.
    pub wheel_settle: Duration,
    /// Whether drag moves are coalesced to one per frame.
    pub drag_throttle: bool,
    /// Frame interval for schedulers not driven by a display.
    pub frame_interval: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self { wheel_settle: WHEEL_SETTLE, drag_throttle: true, frame_interval: DEFAULT_FRAME_INTERVAL }
    }
}

impl GestureConfig {
    /// Build config from environment variables.
    ///
    /// The library never reads these on its own: gestures use
    /// [`GestureConfig::default`] unless a host calls this and passes the
    /// result to `with_config`/`from_config`.
    ///
    /// Optional:
    /// - `GESTURE_WHEEL_SETTLE_MS`: default 250
    /// - `GESTURE_DRAG_THROTTLE`: `true` (default) or `false`; also `1|0|on|off`
    /// - `GESTURE_FRAME_INTERVAL_MS`: default 16
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            wheel_settle: parse_millis(WHEEL_SETTLE_VAR, env_value(WHEEL_SETTLE_VAR)?.as_deref())?
                .unwrap_or(defaults.wheel_settle),
            drag_throttle: parse_bool(DRAG_THROTTLE_VAR, env_value(DRAG_THROTTLE_VAR)?.as_deref())?
                .unwrap_or(defaults.drag_throttle),
            frame_interval: parse_millis(FRAME_INTERVAL_VAR, env_value(FRAME_INTERVAL_VAR)?.as_deref())?
                .unwrap_or(defaults.frame_interval),
        })
    }
}

/// Read a variable; unset is `None`, non-unicode is an error.
fn env_value(var: &'static str) -> Result<Option<String>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { var }),
    }
}

fn parse_millis(var: &'static str, raw: Option<&str>) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let millis = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidNumber { var, value: raw.to_string() })?;
    if millis == 0 {
        return Err(ConfigError::NonPositive { var });
    }
    Ok(Some(Duration::from_millis(millis)))
}

fn parse_bool(var: &'static str, raw: Option<&str>) -> Result<Option<bool>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" => Ok(Some(true)),
        "false" | "0" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidBool { var, value: raw.to_string() }),
    }
}
