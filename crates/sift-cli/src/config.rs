//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use sift_pipeline::{ChunkingConfig, SiftConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
///
/// Each command reads its own pipeline section, so the classification and
/// extraction presets can be tuned independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Chunking used by `sift chunk`
    #[serde(default = "default_export")]
    pub export: ChunkingConfig,

    /// Pipeline used by `sift classify`
    #[serde(default)]
    pub classify: SiftConfig,

    /// Pipeline used by `sift extract`
    #[serde(default = "SiftConfig::financials_extraction")]
    pub extract: SiftConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    #[default]
    Table,
    /// JSON format
    Json,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".sift").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::load_from(&path)?
                } else {
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.export
            .validate()
            .map_err(|e| CliError::Config(format!("[export] {}", e)))?;
        self.classify
            .validate()
            .map_err(|e| CliError::Config(format!("[classify] {}", e)))?;
        self.extract
            .validate()
            .map_err(|e| CliError::Config(format!("[extract] {}", e)))?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            export: default_export(),
            classify: SiftConfig::default(),
            extract: SiftConfig::financials_extraction(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_export() -> ChunkingConfig {
    SiftConfig::chunk_export().chunking
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_pipeline::{BoundaryPreference, BreakThreshold};
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.export.boundary_preference, BoundaryPreference::PeriodFirst);
        assert_eq!(config.export.break_threshold, BreakThreshold::PastHalfway);
        assert_eq!(config.classify.inference.model, "phi3");
        assert_eq!(config.extract.chunking.overlap, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.settings.format = OutputFormat::Json;
        config.classify.inference.model = "mistral".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[settings]\ncolor = false\n\n[classify.inference]\nmodel = \"llama3.1\"\n")
            .unwrap();

        let loaded = Config::load(Some(path.as_path())).unwrap();
        assert!(!loaded.settings.color);
        assert_eq!(loaded.settings.format, OutputFormat::Table);
        assert_eq!(loaded.classify.inference.model, "llama3.1");
        assert_eq!(loaded.classify.chunking, ChunkingConfig::default());
        assert_eq!(loaded.extract, SiftConfig::financials_extraction());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let absent = dir.path().join("absent.toml");
        let result = Config::load(Some(absent.as_path()));
        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[test]
    fn test_invalid_section_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[classify.chunking]\ntarget_size = 100\noverlap = 100\n").unwrap();

        let err = Config::load(Some(path.as_path())).unwrap_err();
        assert!(err.to_string().contains("[classify]"));
    }
}
