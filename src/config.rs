use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::{LogConfig, LogFormat, LogLevel};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// General application settings
    pub settings: AppSettings,

    /// Presentation precision
    pub display: DisplaySettings,

    /// Logging setup
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// General application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// JSON file holding the logged entries
    pub data_file: PathBuf,

    /// Race goal shown on the dashboard
    pub goal: String,
}

/// Decimal places used when rendering means
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Weekly view and insights
    pub detail_precision: u32,

    /// Dashboard
    pub summary_precision: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            settings: AppSettings::default(),
            display: DisplaySettings::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            data_file: PathBuf::from("training_data.json"),
            goal: "2:32:00 Boston".to_string(),
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            detail_precision: 1,
            summary_precision: 0,
        }
    }
}

/// Keys understood by `get`/`set`
pub const CONFIG_KEYS: [&str; 6] = [
    "settings.data_file",
    "settings.goal",
    "display.detail_precision",
    "display.summary_precision",
    "logging.level",
    "logging.format",
];

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".trainlog")
            .join("config.toml")
    }

    /// Load configuration from `path`, falling back to defaults when the file is absent
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Read a value by dotted key
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "settings.data_file" => self.settings.data_file.display().to_string(),
            "settings.goal" => self.settings.goal.clone(),
            "display.detail_precision" => self.display.detail_precision.to_string(),
            "display.summary_precision" => self.display.summary_precision.to_string(),
            "logging.level" => self.logging.level.to_filter(),
            "logging.format" => format!("{:?}", self.logging.format).to_lowercase(),
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        };
        Ok(value)
    }

    /// Set a value by dotted key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "settings.data_file" => self.settings.data_file = PathBuf::from(value),
            "settings.goal" => self.settings.goal = value.to_string(),
            "display.detail_precision" => {
                self.display.detail_precision = parse_precision(key, value)?;
            }
            "display.summary_precision" => {
                self.display.summary_precision = parse_precision(key, value)?;
            }
            "logging.level" => {
                self.logging.level = value.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
            }
            "logging.format" => {
                self.logging.format = value.parse::<LogFormat>().map_err(anyhow::Error::msg)?;
            }
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }

        self.metadata.updated_at = Utc::now();
        Ok(())
    }
}

fn parse_precision(key: &str, value: &str) -> Result<u32> {
    let places: u32 = value
        .parse()
        .with_context(|| format!("{} must be a whole number, got '{}'", key, value))?;
    if places > 4 {
        anyhow::bail!("{} must be between 0 and 4, got {}", key, places);
    }
    Ok(places)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.metadata.version, deserialized.metadata.version);
        assert_eq!(config.display, deserialized.display);
        assert_eq!(config.settings, deserialized.settings);
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut original = AppConfig::default();
        original.set("settings.goal", "2:45:00 Chicago").unwrap();
        original.set("display.detail_precision", "2").unwrap();
        original.save_to_file(&config_path).unwrap();

        let loaded = AppConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.settings.goal, "2:45:00 Chicago");
        assert_eq!(loaded.display.detail_precision, 2);
    }

    #[test]
    fn test_load_or_default_when_missing() {
        let temp_dir = tempdir().unwrap();
        let config = AppConfig::load_or_default(temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.settings.data_file, PathBuf::from("training_data.json"));
        assert_eq!(config.display.summary_precision, 0);
    }

    #[test]
    fn test_get_and_set() {
        let mut config = AppConfig::default();
        for key in CONFIG_KEYS {
            assert!(config.get(key).is_ok(), "key {} should be readable", key);
        }

        config.set("logging.level", "debug").unwrap();
        assert_eq!(config.get("logging.level").unwrap(), "debug");
        config.set("logging.format", "json").unwrap();
        assert_eq!(config.get("logging.format").unwrap(), "json");

        assert!(config.set("display.summary_precision", "nine").is_err());
        assert!(config.set("display.summary_precision", "9").is_err());
        assert!(config.set("settings.unknown", "x").is_err());
        assert!(config.get("settings.unknown").is_err());
    }
}
