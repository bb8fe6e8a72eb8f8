use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DEFAULT_WINDOW_DAYS: u32 = 7;
/// Extra records requested per window day, to cover rest days between runs
const DEFAULT_FETCH_MULTIPLIER: u32 = 2;
const DEFAULT_BRIDGE_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Missing configuration: {0}")]
  Missing(String),

  #[error("Invalid value for {var}: {value}")]
  Invalid { var: String, value: String },
}

/// Read an optional env var, falling back to `default` when unset
fn env_or<T: FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
  match env::var(var) {
    Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
      var: var.to_string(),
      value,
    }),
    Err(_) => Ok(default),
  }
}

fn env_required(var: &str) -> Result<String, ConfigError> {
  env::var(var).map_err(|_| ConfigError::Missing(var.to_string()))
}

/// ---------------------------------------------------------------------------
/// Heart Rate Bands
/// ---------------------------------------------------------------------------

/// Lower bounds (bpm) of the moderate, threshold and anaerobic bands.
/// Anything below `moderate` is easy aerobic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRateThresholds {
  pub moderate: u32,
  pub threshold: u32,
  pub anaerobic: u32,
}

impl Default for HeartRateThresholds {
  fn default() -> Self {
    Self {
      moderate: 140,
      threshold: 160,
      anaerobic: 175,
    }
  }
}

impl HeartRateThresholds {
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.moderate < self.threshold && self.threshold < self.anaerobic {
      Ok(())
    } else {
      Err(ConfigError::Invalid {
        var: "heart rate thresholds".to_string(),
        value: format!("{}/{}/{}", self.moderate, self.threshold, self.anaerobic),
      })
    }
  }
}

/// ---------------------------------------------------------------------------
/// Sync Settings
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
  /// Days of history to reconcile against
  pub window_days: u32,
  /// Records requested per window day
  pub fetch_multiplier: u32,
  pub heart_rate: HeartRateThresholds,
  /// Keep a shared handle to each raw payload on the normalized record
  pub retain_raw_payload: bool,
}

impl Default for SyncConfig {
  fn default() -> Self {
    Self {
      window_days: DEFAULT_WINDOW_DAYS,
      fetch_multiplier: DEFAULT_FETCH_MULTIPLIER,
      heart_rate: HeartRateThresholds::default(),
      retain_raw_payload: false,
    }
  }
}

impl SyncConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    let defaults = Self::default();
    let heart_rate = HeartRateThresholds {
      moderate: env_or("TRAINER_SYNC_HR_MODERATE", defaults.heart_rate.moderate)?,
      threshold: env_or("TRAINER_SYNC_HR_THRESHOLD", defaults.heart_rate.threshold)?,
      anaerobic: env_or("TRAINER_SYNC_HR_ANAEROBIC", defaults.heart_rate.anaerobic)?,
    };
    heart_rate.validate()?;

    Ok(Self {
      window_days: env_or("TRAINER_SYNC_WINDOW_DAYS", defaults.window_days)?,
      fetch_multiplier: env_or("TRAINER_SYNC_FETCH_MULTIPLIER", defaults.fetch_multiplier)?,
      heart_rate,
      retain_raw_payload: env_or("TRAINER_SYNC_RETAIN_RAW", defaults.retain_raw_payload)?,
    })
  }

  /// Load `.env` (if present) and then read the environment
  pub fn load() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();
    Self::from_env()
  }

  /// Number of records to request for a window of `window_days`
  pub fn fetch_limit(&self, window_days: u32) -> u32 {
    window_days.saturating_mul(self.fetch_multiplier)
  }
}

/// ---------------------------------------------------------------------------
/// Garmin Bridge Settings
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BridgeConfig {
  pub base_url: String,
  pub email: String,
  pub password: String,
  pub timeout_secs: u64,
}

impl BridgeConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    Ok(Self {
      base_url: env::var("GARMIN_BRIDGE_URL").unwrap_or_else(|_| DEFAULT_BRIDGE_URL.to_string()),
      email: env_required("GARMIN_EMAIL")?,
      password: env_required("GARMIN_PASSWORD")?,
      timeout_secs: env_or("GARMIN_BRIDGE_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
    })
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
