//! Configuration file structure for `.specmatrix.toml`
//!
//! Configuration files can be placed in:
//! - User home directory: `~/.specmatrix.toml` (user defaults)
//! - Project directory: `./.specmatrix.toml` (project defaults)
//!
//! Precedence order (highest to lowest):
//! 1. Command-line arguments (`--model`, `--recognition`, ...)
//! 2. Project config (`./.specmatrix.toml`)
//! 3. User config (`~/.specmatrix.toml`)
//! 4. Built-in defaults

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use specmatrix_core::{CognitiveLevel, LevelConfig, MatrixConfig};
use specmatrix_gemini::ModelType;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of both the user and the project configuration.
pub const CONFIG_FILE_NAME: &str = ".specmatrix.toml";

/// Template written by `specmatrix config init`.
pub const DEFAULT_CONFIG: &str = r#"# specmatrix configuration file

# Default settings for the generate command
[generate]
# Model: flash or pro
# model = "flash"

# Directory for exported .docx files
# output_dir = "exports"

# Print discrepancies between counted rows and the reported summary
# check = false

# Alternative API endpoint (e.g. a proxy)
# endpoint = "https://generativelanguage.googleapis.com/v1beta"

# Requested question distribution, one table per cognitive level
[levels.recognition]
percent = 30
multiple_choice = 8
free_response = 1

[levels.understanding]
percent = 40
multiple_choice = 4
free_response = 3

[levels.application]
percent = 20
multiple_choice = 0
free_response = 4

[levels.high_application]
percent = 10
multiple_choice = 0
free_response = 1
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Default settings for the generate command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate: Option<GenerateConfig>,

    /// Requested distribution per cognitive level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub levels: Option<LevelsConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Default model (flash or pro)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Default directory for DOCX exports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Report summary discrepancies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<bool>,

    /// API base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recognition: Option<LevelConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub understanding: Option<LevelConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<LevelConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_application: Option<LevelConfig>,
}

impl LevelsConfig {
    #[must_use]
    pub const fn get(&self, level: CognitiveLevel) -> Option<LevelConfig> {
        match level {
            CognitiveLevel::Recognition => self.recognition,
            CognitiveLevel::Understanding => self.understanding,
            CognitiveLevel::Application => self.application,
            CognitiveLevel::HighApplication => self.high_application,
        }
    }

    fn set(&mut self, level: CognitiveLevel, value: LevelConfig) {
        let slot = match level {
            CognitiveLevel::Recognition => &mut self.recognition,
            CognitiveLevel::Understanding => &mut self.understanding,
            CognitiveLevel::Application => &mut self.application,
            CognitiveLevel::HighApplication => &mut self.high_application,
        };
        *slot = Some(value);
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file {}: {e}", path.display())
        })
    }

    /// Path of the user configuration file
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    /// Path of the project configuration file
    #[must_use]
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE_NAME)
    }

    /// Find and load configuration files
    /// Returns (`user_config`, `project_config`)
    #[must_use]
    pub fn discover_configs() -> (Option<Self>, Option<Self>) {
        let user_config = Self::user_config_path().and_then(|path| Self::load_optional(&path, "user"));
        let project_config = Self::load_optional(&Self::project_config_path(), "project");
        (user_config, project_config)
    }

    fn load_optional(path: &Path, scope: &str) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!(
                    "{} Failed to load {scope} config from {}: {e}",
                    "Warning:".yellow().bold(),
                    path.display(),
                );
                None
            }
        }
    }

    /// Merge configs with precedence
    /// CLI args > project config > user config > defaults
    #[must_use]
    pub fn merge(user_config: Option<Self>, project_config: Option<Self>) -> Self {
        let mut merged = Self::default();

        for config in [user_config, project_config].into_iter().flatten() {
            if let Some(generate) = config.generate {
                let target = merged.generate.get_or_insert_with(GenerateConfig::default);
                if let Some(model) = generate.model {
                    target.model = Some(model);
                }
                if let Some(output_dir) = generate.output_dir {
                    target.output_dir = Some(output_dir);
                }
                if let Some(check) = generate.check {
                    target.check = Some(check);
                }
                if let Some(endpoint) = generate.endpoint {
                    target.endpoint = Some(endpoint);
                }
            }

            if let Some(levels) = config.levels {
                let target = merged.levels.get_or_insert_with(LevelsConfig::default);
                for level in CognitiveLevel::ALL {
                    if let Some(value) = levels.get(level) {
                        target.set(level, value);
                    }
                }
            }
        }

        merged
    }

    /// Resolve the model from CLI, config, or default
    #[must_use]
    pub fn resolve_model(&self, cli_value: Option<ModelType>) -> ModelType {
        if let Some(model) = cli_value {
            return model;
        }

        let configured = self.generate.as_ref().and_then(|g| g.model.as_deref());
        match configured.map(str::parse::<ModelType>) {
            Some(Ok(model)) => model,
            Some(Err(e)) => {
                eprintln!("{} {e}; using {}", "Warning:".yellow().bold(), ModelType::default());
                ModelType::default()
            }
            None => ModelType::default(),
        }
    }

    /// Requested distribution: configured levels over the built-in defaults.
    #[must_use]
    pub fn matrix_config(&self) -> MatrixConfig {
        let mut config = MatrixConfig::default();
        if let Some(levels) = &self.levels {
            for level in CognitiveLevel::ALL {
                if let Some(value) = levels.get(level) {
                    *config.level_mut(level) = value;
                }
            }
        }
        config
    }

    #[must_use]
    pub fn check(&self) -> bool {
        self.generate.as_ref().and_then(|g| g.check).unwrap_or(false)
    }

    #[must_use]
    pub fn output_dir(&self) -> Option<&Path> {
        self.generate.as_ref().and_then(|g| g.output_dir.as_deref())
    }

    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.generate.as_ref().and_then(|g| g.endpoint.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Config {
        toml::from_str(text).unwrap()
    }

    #[test]
    fn test_default_template_parses() {
        let config = parse(DEFAULT_CONFIG);
        assert_eq!(config.matrix_config(), MatrixConfig::default());
        assert!(config.generate.is_some());
    }

    #[test]
    fn test_partial_level_uses_field_defaults() {
        let config = parse("[levels.application]\npercent = 25\n");
        let matrix = config.matrix_config();
        assert_eq!(matrix.application, LevelConfig::new(25, 0, 0));
        assert_eq!(matrix.recognition, LevelConfig::new(30, 8, 1));
    }

    #[test]
    fn test_project_overrides_user() {
        let user = parse(
            "[generate]\nmodel = \"pro\"\ncheck = true\n\n[levels.recognition]\npercent = 50\nmultiple_choice = 10\nfree_response = 0\n",
        );
        let project = parse("[generate]\nmodel = \"flash\"\n");

        let merged = Config::merge(Some(user), Some(project));
        assert_eq!(merged.resolve_model(None), ModelType::Flash);
        assert!(merged.check());
        assert_eq!(merged.matrix_config().recognition, LevelConfig::new(50, 10, 0));
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = parse("[generate]\nmodel = \"flash\"\n");
        assert_eq!(config.resolve_model(Some(ModelType::Pro)), ModelType::Pro);
    }

    #[test]
    fn test_invalid_model_falls_back() {
        let config = parse("[generate]\nmodel = \"gpt\"\n");
        assert_eq!(config.resolve_model(None), ModelType::Flash);
    }

    #[test]
    fn test_merge_of_nothing_is_default() {
        let merged = Config::merge(None, None);
        assert_eq!(merged, Config::default());
        assert!(!merged.check());
        assert!(merged.output_dir().is_none());
    }

    #[test]
    fn test_load_from_file_reports_syntax_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[generate\nmodel = 1").unwrap();
        let err = Config::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
