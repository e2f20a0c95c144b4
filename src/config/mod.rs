//! # Configuration
//!
//! TOML configuration for the Lamplighter CLI: game rules, where saves live,
//! and logging.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lamplighter::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Config::create_default("config.toml").await?;
//!     let config = Config::load("config.toml").await?;
//!     println!("Difficulty: {}", config.game.difficulty.label());
//!     Ok(())
//! }
//! ```
//!
//! ## File Format
//!
//! ```toml
//! [game]
//! difficulty = "hard"
//! recovery_oil = 10.0
//! autosave = true
//!
//! [storage]
//! data_dir = "./data"
//! max_save_slots = 5
//!
//! [logging]
//! level = "info"
//! file = "lamplighter.log"
//! ```
//!
//! Missing sections and fields fall back to the defaults above.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::cathedral::{Difficulty, FileSaveStore, SessionOptions, DEFAULT_RECOVERY_OIL};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    /// Oil percentage restored after a blackout. Must be in (0, 100].
    pub recovery_oil: f64,
    /// Write the autosave slot after every move and command.
    pub autosave: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            recovery_oil: DEFAULT_RECOVERY_OIL,
            autosave: true,
        }
    }
}

impl GameConfig {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions::new(self.difficulty).with_recovery_oil(self.recovery_oil)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub max_save_slots: u8,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            max_save_slots: 5,
        }
    }
}

impl StorageConfig {
    pub fn save_store(&self) -> FileSaveStore {
        FileSaveStore::new(&self.data_dir, self.max_save_slots)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some("lamplighter.log".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub game: GameConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub async fn load_or_default(path: &str) -> Result<Self> {
        if fs::try_exists(path).await.unwrap_or(false) {
            Self::load(path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let oil = self.game.recovery_oil;
        if !(oil.is_finite() && oil > 0.0 && oil <= 100.0) {
            return Err(anyhow!(
                "game.recovery_oil must be in (0, 100], got {}",
                oil
            ));
        }
        if self.storage.max_save_slots == 0 {
            return Err(anyhow!("storage.max_save_slots must be at least 1"));
        }
        if self.storage.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        if self
            .logging
            .level
            .parse::<log::LevelFilter>()
            .is_err()
        {
            return Err(anyhow!("logging.level '{}' is not a log level", self.logging.level));
        }
        Ok(())
    }
}
