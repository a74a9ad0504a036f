//! Game configuration
//!
//! Loaded from a JSON file when one is given; every field falls back to the
//! stock value so partial files work.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::puzzle::ShuffleGenerator;
use crate::sim::{CatalogError, ItemTypeSpec, default_catalog, validate_catalog};

/// Deployment profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" | "default" => Some(Environment::Development),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }

    pub fn debug(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Log filter used when `RUST_LOG` is unset
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Production => "info",
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid item catalogue: {0}")]
    Catalog(#[from] CatalogError),
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub environment: Environment,

    // === Play area ===
    pub play_width: f32,
    pub play_height: f32,
    pub catcher_width: f32,
    pub catcher_height: f32,
    pub item_size: f32,

    // === Catch phase ===
    /// Seconds allowed for the catch phase
    pub time_limit: f32,
    /// Spawn order and counts
    pub catalog: Vec<ItemTypeSpec>,

    // === Puzzle ===
    pub shuffle_moves: u32,
    pub reshuffle_batch: u32,

    /// Fixed RNG seed (random per session when unset)
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,

            play_width: SCREEN_WIDTH,
            play_height: SCREEN_HEIGHT,
            catcher_width: CATCHER_WIDTH,
            catcher_height: CATCHER_HEIGHT,
            item_size: ITEM_SIZE,

            time_limit: TIME_LIMIT,
            catalog: default_catalog(),

            shuffle_moves: SHUFFLE_MOVES,
            reshuffle_batch: RESHUFFLE_BATCH,

            seed: None,
        }
    }
}

impl GameConfig {
    /// Stock config for a deployment profile
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            ..Self::default()
        }
    }

    pub fn shuffle(&self) -> ShuffleGenerator {
        ShuffleGenerator::new(self.shuffle_moves, self.reshuffle_batch)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_catalog(&self.catalog)?;
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load a config file, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(path) => match Self::load(path) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Using default config ({})", e);
                    Self::default()
                }
            },
            None => {
                log::info!("Using default config");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }
}
