//! Configuration file support for stepsmith.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/stepsmith/config.toml`.

use crate::sport::ForcedSport;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub export: ExportConfig,
}

/// Default export behavior, overridable per invocation
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ExportConfig {
    /// Use lap-button completion for every exercise
    #[serde(default)]
    pub use_lap_button: bool,

    /// Skip sport detection and always export with this classification
    #[serde(default)]
    pub force_sport: Option<ForcedSport>,
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
        base.join("stepsmith").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.export.use_lap_button);
        assert!(config.export.force_sport.is_none());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config {
            export: ExportConfig {
                use_lap_button: true,
                force_sport: Some(ForcedSport::Cardio),
            },
        };
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert!(parsed.export.use_lap_button);
        assert_eq!(parsed.export.force_sport, Some(ForcedSport::Cardio));
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[export]
force_sport = "running"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.export.force_sport, Some(ForcedSport::Running));
        assert!(!config.export.use_lap_button); // default
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            export: ExportConfig {
                use_lap_button: true,
                force_sport: None,
            },
        };
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert!(reloaded.export.use_lap_button);
    }
}
