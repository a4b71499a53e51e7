//! TOML-backed session settings.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use turf_war_rendering::Resolution;
use turf_war_system_scheduler::{Config as SchedulerConfig, PeriodBounds};

/// Errors raised while loading or validating a [`SessionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The configuration text is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The tick period bounds are empty or start at zero.
    #[error("tick period bounds {min_ms}..={max_ms} ms are invalid")]
    InvalidPeriodBounds {
        /// Requested lower bound in milliseconds.
        min_ms: u64,
        /// Requested upper bound in milliseconds.
        max_ms: u64,
    },
    /// The animation clock cannot tick with a zero interval.
    #[error("frame interval must be positive")]
    ZeroFrameInterval,
}

/// Tunables for a [`crate::Session`]; every key is optional in TOML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Seed for the background skirmish generator.
    pub seed: u64,
    /// Initial delay between background skirmishes.
    pub tick_period_ms: u64,
    /// Shortest tick period an operator may choose.
    pub min_tick_period_ms: u64,
    /// Longest tick period an operator may choose.
    pub max_tick_period_ms: u64,
    /// Whether background skirmishes start enabled.
    pub simulating: bool,
    /// Interval between influence-field animation frames.
    pub frame_interval_ms: u64,
    /// Base side length of the rendered field before device scaling.
    pub quality: u32,
    /// Display pixel ratio applied to `quality`.
    pub device_pixel_ratio: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            tick_period_ms: 1200,
            min_tick_period_ms: 350,
            max_tick_period_ms: 2200,
            simulating: true,
            frame_interval_ms: 110,
            quality: 270,
            device_pixel_ratio: 1.0,
        }
    }
}

impl SessionConfig {
    /// Parses a configuration from TOML text and validates it.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses the configuration stored at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Checks the cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _ = self.period_bounds()?;
        let _ = self.frame_interval()?;
        Ok(())
    }

    /// Range the tick period is clamped into.
    pub fn period_bounds(&self) -> Result<PeriodBounds, ConfigError> {
        PeriodBounds::new(
            Duration::from_millis(self.min_tick_period_ms),
            Duration::from_millis(self.max_tick_period_ms),
        )
        .ok_or(ConfigError::InvalidPeriodBounds {
            min_ms: self.min_tick_period_ms,
            max_ms: self.max_tick_period_ms,
        })
    }

    /// Scheduler settings derived from this configuration.
    pub fn scheduler_config(&self) -> Result<SchedulerConfig, ConfigError> {
        Ok(
            SchedulerConfig::new(Duration::from_millis(self.tick_period_ms), self.seed)
                .with_bounds(self.period_bounds()?),
        )
    }

    /// Animation frame interval.
    pub fn frame_interval(&self) -> Result<Duration, ConfigError> {
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::ZeroFrameInterval);
        }
        Ok(Duration::from_millis(self.frame_interval_ms))
    }

    /// Raster size implied by `quality` and `device_pixel_ratio`.
    #[must_use]
    pub fn resolution(&self) -> Resolution {
        Resolution::scaled(self.quality, self.device_pixel_ratio)
    }
}
