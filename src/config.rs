use std::path::PathBuf;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::clock::{self, DEFAULT_RATE};
use crate::elements::DEFAULT_MAX_SATELLITES;
use crate::selection::InterestSets;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub elements: ElementsConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub tick: TickConfig,
    #[serde(default)]
    pub trajectory: TrajectoryConfig,
    #[serde(default)]
    pub interest: InterestSets,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementsConfig {
    pub path: PathBuf,
    #[serde(default = "default_max_satellites")]
    pub max_satellites: usize,
}

fn default_max_satellites() -> usize {
    DEFAULT_MAX_SATELLITES
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClockConfig {
    #[serde(default = "default_rate")]
    pub rate: f64,
    /// Defaults to the wall clock at startup
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            rate: default_rate(),
            start: None,
        }
    }
}

fn default_rate() -> f64 {
    DEFAULT_RATE
}

#[derive(Debug, Clone, Deserialize)]
pub struct TickConfig {
    #[serde(
        default = "default_tick_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub interval: StdDuration,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            interval: default_tick_interval(),
        }
    }
}

fn default_tick_interval() -> StdDuration {
    StdDuration::from_millis(50)
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrajectoryConfig {
    #[serde(
        default = "default_sample_step",
        deserialize_with = "deserialize_duration"
    )]
    pub step: StdDuration,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            step: default_sample_step(),
        }
    }
}

fn default_sample_step() -> StdDuration {
    StdDuration::from_secs(60)
}

impl TrajectoryConfig {
    pub fn step(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.step).unwrap_or(crate::scene::DEFAULT_SAMPLE_STEP)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<StdDuration, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    humantime::parse_duration(&text).map_err(serde::de::Error::custom)
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        clock::validate_rate(self.clock.rate)
            .map_err(|e| ConfigError::Invalid(format!("clock.rate: {}", e)))?;
        if self.elements.max_satellites == 0 {
            return Err(ConfigError::Invalid(
                "elements.max_satellites must be at least 1".to_string(),
            ));
        }
        if self.tick.interval.is_zero() {
            return Err(ConfigError::Invalid(
                "tick.interval must be greater than zero".to_string(),
            ));
        }
        if self.trajectory.step.is_zero() {
            return Err(ConfigError::Invalid(
                "trajectory.step must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
