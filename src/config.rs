//! Configuration management with validation and defaults
//!
//! Values come from an optional TOML file, then `POLLA_*` environment variables,
//! and are validated last.

use crate::errors::{ConfigurationError, PollaResult};
use crate::lottery::{Amount, GameVariant, DEFAULT_TICKET_PRICE, PRIZE_SHARE};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Debounce window for pot writes, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;
const MAX_DEBOUNCE_MS: u64 = 60_000;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollaConfig {
    pub game: GameConfig,
    pub storage: StorageConfig,
    pub persistence: PersistenceConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub polla_ticket_price: Amount,
    pub micro_ticket_price: Amount,
    /// Fraction of collected fees paid into the prize pool
    pub prize_share: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            polla_ticket_price: DEFAULT_TICKET_PRICE,
            micro_ticket_price: DEFAULT_TICKET_PRICE,
            prize_share: PRIZE_SHARE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    /// Wipe all stored tickets, draws and pots on startup (testing only!)
    pub clear_on_start: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./DB/polla_data".to_string(),
            clear_on_start: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub debounce_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "polla=info".to_string(),
        }
    }
}

impl PollaConfig {
    pub fn ticket_price(&self, variant: GameVariant) -> Amount {
        match variant {
            GameVariant::Polla => self.game.polla_ticket_price,
            GameVariant::Micro => self.game.micro_ticket_price,
        }
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.persistence.debounce_ms)
    }
}

/// Configuration loader with environment variable support
#[derive(Default)]
pub struct ConfigLoader {
    config_path: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Load configuration from file and environment variables
    pub fn load(&self) -> PollaResult<PollaConfig> {
        let mut config = match self.config_path {
            Some(ref path) => self.load_from_file(path)?,
            None => PollaConfig::default(),
        };

        self.apply_overrides(&mut config, |name| env::var(name).ok())?;
        self.validate(&config)?;

        Ok(config)
    }

    fn load_from_file(&self, path: &str) -> PollaResult<PollaConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::LoadFailed(format!("Failed to read {}: {}", path, e)))?;

        toml::from_str(&content)
            .map_err(|e| ConfigurationError::LoadFailed(format!("Failed to parse TOML: {}", e)).into())
    }

    /// Apply `POLLA_*` overrides read through `lookup`
    fn apply_overrides<F>(&self, config: &mut PollaConfig, lookup: F) -> PollaResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(data_dir) = lookup("POLLA_DATA_DIR") {
            config.storage.data_dir = data_dir;
        }
        if let Some(price) = lookup("POLLA_TICKET_PRICE") {
            let price: Amount = parse_override("POLLA_TICKET_PRICE", price, "Invalid ticket price")?;
            config.game.polla_ticket_price = price;
            config.game.micro_ticket_price = price;
        }
        if let Some(share) = lookup("POLLA_PRIZE_SHARE") {
            config.game.prize_share = parse_override("POLLA_PRIZE_SHARE", share, "Invalid share")?;
        }
        if let Some(debounce) = lookup("POLLA_DEBOUNCE_MS") {
            config.persistence.debounce_ms =
                parse_override("POLLA_DEBOUNCE_MS", debounce, "Invalid debounce window")?;
        }
        if let Some(filter) = lookup("POLLA_LOG_FILTER") {
            config.logging.filter = filter;
        }

        Ok(())
    }

    pub fn validate(&self, config: &PollaConfig) -> PollaResult<()> {
        for variant in GameVariant::ALL {
            let price = config.ticket_price(variant);
            if price < 0 {
                return Err(ConfigurationError::InvalidValue {
                    field: format!("game.{}_ticket_price", variant),
                    value: price.to_string(),
                    reason: "Ticket price cannot be negative".to_string(),
                }
                .into());
            }
        }

        let share = config.game.prize_share;
        if !(0.0..=1.0).contains(&share) {
            return Err(ConfigurationError::InvalidValue {
                field: "game.prize_share".to_string(),
                value: share.to_string(),
                reason: "Share must be between 0 and 1".to_string(),
            }
            .into());
        }

        if config.storage.data_dir.trim().is_empty() {
            return Err(ConfigurationError::MissingRequired("storage.data_dir".to_string()).into());
        }

        let debounce = config.persistence.debounce_ms;
        if debounce == 0 || debounce > MAX_DEBOUNCE_MS {
            return Err(ConfigurationError::InvalidValue {
                field: "persistence.debounce_ms".to_string(),
                value: debounce.to_string(),
                reason: format!("Debounce window must be between 1 and {} ms", MAX_DEBOUNCE_MS),
            }
            .into());
        }

        Ok(())
    }

    pub fn save(&self, config: &PollaConfig, path: &str) -> PollaResult<()> {
        let toml_string = toml::to_string_pretty(config)
            .map_err(|e| ConfigurationError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, toml_string)
            .map_err(|e| ConfigurationError::SaveFailed(format!("Failed to write to {}: {}", path, e)).into())
    }
}

fn parse_override<T: std::str::FromStr>(field: &str, value: String, reason: &str) -> PollaResult<T> {
    value.trim().parse().map_err(|_| {
        ConfigurationError::InvalidValue {
            field: field.to_string(),
            value,
            reason: reason.to_string(),
        }
        .into()
    })
}

/// Builder pattern for creating configurations
pub struct ConfigBuilder {
    config: PollaConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: PollaConfig::default(),
        }
    }

    pub fn ticket_price(mut self, variant: GameVariant, price: Amount) -> Self {
        match variant {
            GameVariant::Polla => self.config.game.polla_ticket_price = price,
            GameVariant::Micro => self.config.game.micro_ticket_price = price,
        }
        self
    }

    pub fn prize_share(mut self, share: f64) -> Self {
        self.config.game.prize_share = share;
        self
    }

    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.storage.data_dir = path.as_ref().to_string_lossy().to_string();
        self
    }

    pub fn clear_on_start(mut self, clear: bool) -> Self {
        self.config.storage.clear_on_start = clear;
        self
    }

    pub fn debounce_ms(mut self, millis: u64) -> Self {
        self.config.persistence.debounce_ms = millis;
        self
    }

    pub fn log_filter(mut self, filter: &str) -> Self {
        self.config.logging.filter = filter.to_string();
        self
    }

    pub fn build(self) -> PollaConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a sample configuration file
pub fn generate_sample_config(path: &str) -> PollaResult<()> {
    ConfigLoader::new().save(&PollaConfig::default(), path)
}
