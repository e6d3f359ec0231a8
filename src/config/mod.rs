//! # Configuration Management Module
//!
//! Central, TOML-backed configuration for the shopkeep tools. It covers where
//! the item library and character profiles live, how the curator model is
//! reached, and how logging behaves.
//!
//! ## Configuration Structure
//!
//! - [`ShopConfig`] - Shop identity (name, quartermaster NPC)
//! - [`StorageConfig`] - Data directory and file layout
//! - [`CuratorConfig`] - Model endpoint, timeout and generation hints
//! - [`LoggingConfig`] - Log level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use shopkeep::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration from file
//!     let config = Config::load("config.toml").await?;
//!     println!("Curator model: {}", config.curator.model);
//!
//!     // Create default configuration
//!     Config::create_default("config.toml").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [shop]
//! name = "Ironledger Quartermastery"
//! shopkeeper = "Grash Ironledger"
//!
//! [storage]
//! data_dir = "./data"
//! magic_item_files = ["magic_items/weapons.json", "magic_items/armor.json"]
//! characters_dir = "characters"
//! session_specials_file = "session_specials.json"
//!
//! [curator]
//! base_url = "http://localhost:11434"
//! model = "llama3.1:8b"
//! timeout_seconds = 300
//! context_length = 8192
//! items_per_character = 4
//!
//! [logging]
//! level = "info"
//! file = "shopkeep.log"
//! ```
//!
//! Relative storage paths resolve under `data_dir`.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::model::{DEFAULT_OLLAMA_BASE_URL, DEFAULT_OLLAMA_MODEL};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopConfig {
    pub name: String,
    /// Quartermaster NPC the shop listing is voiced by.
    pub shopkeeper: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    /// Item family files, read and flattened in this order.
    #[serde(default = "default_magic_item_files")]
    pub magic_item_files: Vec<String>,
    #[serde(default = "default_characters_dir")]
    pub characters_dir: String,
    #[serde(default = "default_session_specials_file")]
    pub session_specials_file: String,
}

fn default_magic_item_files() -> Vec<String> {
    vec![
        "magic_items/weapons.json".to_string(),
        "magic_items/armor.json".to_string(),
        "magic_items/potions.json".to_string(),
        "magic_items/wondrous.json".to_string(),
    ]
}

fn default_characters_dir() -> String {
    "characters".to_string()
}

fn default_session_specials_file() -> String {
    "session_specials.json".to_string()
}

impl StorageConfig {
    /// Resolve a configured path against `data_dir` unless it is absolute.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            Path::new(&self.data_dir).join(p)
        }
    }

    pub fn magic_item_paths(&self) -> Vec<PathBuf> {
        self.magic_item_files.iter().map(|f| self.resolve(f)).collect()
    }

    pub fn characters_path(&self) -> PathBuf {
        self.resolve(&self.characters_dir)
    }

    pub fn session_specials_path(&self) -> PathBuf {
        self.resolve(&self.session_specials_file)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuratorConfig {
    pub base_url: String,
    pub model: String,
    /// Upper bound on one model call. Large prompts on local hardware take minutes.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Context window hint sent as `num_ctx`. 0 omits it.
    #[serde(default = "default_context_length")]
    pub context_length: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default = "default_items_per_character")]
    pub items_per_character: usize,
}

fn default_timeout_seconds() -> u64 {
    300
}

fn default_context_length() -> u32 {
    8192
}

fn default_items_per_character() -> usize {
    4
}

impl CuratorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for CuratorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            timeout_seconds: default_timeout_seconds(),
            context_length: default_context_length(),
            temperature: None,
            items_per_character: default_items_per_character(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl LoggingConfig {
    /// Parsed level; unknown strings fall back to info.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub shop: ShopConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub curator: CuratorConfig,
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
        if self.storage.magic_item_files.is_empty() {
            return Err(anyhow!("storage.magic_item_files must list at least one file"));
        }
        if self.curator.items_per_character == 0 {
            return Err(anyhow!("curator.items_per_character must be at least 1"));
        }
        if self.curator.timeout_seconds == 0 {
            return Err(anyhow!("curator.timeout_seconds must be at least 1"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            shop: ShopConfig {
                name: "Ironledger Quartermastery".to_string(),
                shopkeeper: "Grash Ironledger".to_string(),
            },
            storage: StorageConfig {
                data_dir: "./data".to_string(),
                magic_item_files: default_magic_item_files(),
                characters_dir: default_characters_dir(),
                session_specials_file: default_session_specials_file(),
            },
            curator: CuratorConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("shopkeep.log".to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.curator.model, "llama3.1:8b");
        assert_eq!(parsed.storage.magic_item_files.len(), 4);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_minimal_file_fills_defaults() {
        let text = r#"
[shop]
name = "Test"
shopkeeper = "Grash"

[storage]
data_dir = "/srv/shop"

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(text).unwrap();
        assert_eq!(config.curator.timeout(), Duration::from_secs(300));
        assert_eq!(config.curator.context_length, 8192);
        assert_eq!(config.curator.items_per_character, 4);
        assert_eq!(
            config.storage.session_specials_path(),
            PathBuf::from("/srv/shop/session_specials.json")
        );
        assert_eq!(config.logging.level_filter(), log::LevelFilter::Debug);
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let mut storage = Config::default().storage;
        storage.session_specials_file = "/tmp/specials.json".to_string();
        assert_eq!(storage.session_specials_path(), PathBuf::from("/tmp/specials.json"));
        assert_eq!(storage.characters_path(), PathBuf::from("./data/characters"));
    }

    #[test]
    fn test_validate_rejects_zero_picks() {
        let mut config = Config::default();
        config.curator.items_per_character = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_log_level_defaults_to_info() {
        let logging = LoggingConfig {
            level: "loud".to_string(),
            file: None,
        };
        assert_eq!(logging.level_filter(), log::LevelFilter::Info);
    }
}
