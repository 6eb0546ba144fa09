//! Game configuration, loaded from YAML.
//!
//! Every section is optional; a missing section or field takes its default.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Smallest secret key length (bytes) accepted for commitments.
pub const MIN_KEY_BYTES: usize = 32;

/// The game offers a choice among the dice left after the first pick.
pub const MIN_GAME_DICE: usize = 3;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub dice: DiceConfig,
    #[serde(default)]
    pub fair: FairConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub transcript: TranscriptConfig,
}

/// Dice configuration rules enforced by the game (not by the dice model).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiceConfig {
    /// Minimum number of dice on the command line.
    #[serde(default = "default_min_dice")]
    pub min_dice: usize,
}

fn default_min_dice() -> usize {
    MIN_GAME_DICE
}

impl Default for DiceConfig {
    fn default() -> Self {
        Self {
            min_dice: default_min_dice(),
        }
    }
}

/// Commitment protocol settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FairConfig {
    /// Length in bytes of the per-commitment secret key.
    #[serde(default = "default_key_bytes")]
    pub key_bytes: usize,
}

fn default_key_bytes() -> usize {
    MIN_KEY_BYTES
}

impl Default for FairConfig {
    fn default() -> Self {
        Self {
            key_bytes: default_key_bytes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Decimal places in the probability table.
    #[serde(default = "default_precision")]
    pub precision: usize,
}

fn default_precision() -> usize {
    2
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
        }
    }
}

/// NDJSON transcript of every commitment and reveal.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscriptConfig {
    /// Transcript file. If None, no transcript is written.
    #[serde(default)]
    pub path: Option<String>,
    /// Flush every N lines (0 disables periodic flushing).
    #[serde(default = "default_flush_every_lines")]
    pub flush_every_lines: u64,
}

fn default_flush_every_lines() -> u64 {
    1
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            path: None,
            flush_every_lines: default_flush_every_lines(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dice.min_dice < MIN_GAME_DICE {
            return Err(ConfigError::Invalid(format!(
                "dice.min_dice must be >= {MIN_GAME_DICE}"
            )));
        }
        if self.fair.key_bytes < MIN_KEY_BYTES {
            return Err(ConfigError::Invalid(format!(
                "fair.key_bytes must be >= {MIN_KEY_BYTES}"
            )));
        }
        if self.display.precision > 12 {
            return Err(ConfigError::Invalid(
                "display.precision must be <= 12".to_string(),
            ));
        }
        if let Some(p) = &self.transcript.path {
            if p.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "transcript.path must be non-empty when set".to_string(),
                ));
            }
        }
        Ok(())
    }
}
