//! Configuration file support for quitlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/quitlog/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub pricing: PricingConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Cigarette pricing and the spend unit offered by the menu
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_pack_price")]
    pub pack_price: i64,

    #[serde(default = "default_pack_size")]
    pub pack_size: i64,

    #[serde(default = "default_spend_unit")]
    pub spend_unit: i64,

    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            pack_price: default_pack_price(),
            pack_size: default_pack_size(),
            spend_unit: default_spend_unit(),
            currency: default_currency(),
        }
    }
}

impl PricingConfig {
    /// Price of one cigarette, truncated to whole currency units.
    pub fn price_per_cigarette(&self) -> Result<i64> {
        if self.pack_size <= 0 {
            return Err(Error::Config(format!(
                "pack_size must be positive, got {}",
                self.pack_size
            )));
        }
        Ok(self.pack_price / self.pack_size)
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("quitlog")
}

fn default_pack_price() -> i64 {
    5000
}

fn default_pack_size() -> i64 {
    20
}

fn default_spend_unit() -> i64 {
    500
}

fn default_currency() -> String {
    "won".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.pricing.price_per_cigarette()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("quitlog").join("config.toml")
    }

    /// Render the configuration as the TOML that `load_from` reads back
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Save the configuration to the standard config path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save the configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
