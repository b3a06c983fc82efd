//! Configuration management for the resume screener

use crate::error::{Result, ScreenerError};
use crate::processing::scoring::ScoreWeights;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub terms: TermsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    /// Catalogue id, Hugging Face repo id or local directory
    pub default_embedding_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub semantic_weight: f32,
    pub lexical_weight: f32,
    pub coverage_weight: f32,
    pub experience_weight: f32,
    /// Experience signal used until experience analysis exists
    pub experience_placeholder: f32,
    /// Treat negative semantic similarity as 0.0 before weighting
    #[serde(default)]
    pub clamp_negative_semantic: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TermsConfig {
    #[serde(default)]
    pub extra_vocabulary: Vec<String>,
    #[serde(default)]
    pub extra_stopwords: Vec<String>,
    /// Abbreviation -> expanded form
    #[serde(default)]
    pub extra_abbreviations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-screener")
            .join("models");

        let weights = ScoreWeights::default();

        Self {
            models: ModelConfig {
                models_dir,
                default_embedding_model: "minishlab/potion-base-8M".to_string(),
            },
            scoring: ScoringConfig {
                semantic_weight: weights.semantic,
                lexical_weight: weights.lexical,
                coverage_weight: weights.coverage,
                experience_weight: weights.experience,
                experience_placeholder: 1.0,
                clamp_negative_semantic: false,
            },
            terms: TermsConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl ScoringConfig {
    pub fn weights(&self) -> ScoreWeights {
        ScoreWeights {
            semantic: self.semantic_weight,
            lexical: self.lexical_weight,
            coverage: self.coverage_weight,
            experience: self.experience_weight,
        }
    }
}

impl Config {
    /// Load from `path`, writing defaults on first run
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ScreenerError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ScreenerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-screener")
            .join("config.toml")
    }

    /// Reject weights that are negative, non-finite or do not sum to 1.0
    pub fn validate(&self) -> Result<()> {
        self.scoring.weights().validate()?;

        let placeholder = self.scoring.experience_placeholder;
        if !placeholder.is_finite() || !(0.0..=1.0).contains(&placeholder) {
            return Err(ScreenerError::Configuration(format!(
                "scoring.experience_placeholder must be within [0, 1], got {}",
                placeholder
            )));
        }

        Ok(())
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.models.models_dir
    }

    /// Set a value by dotted key, e.g. "scoring.semantic_weight"
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = |e: String| ScreenerError::Configuration(format!("Invalid value for {}: {}", key, e));

        match key {
            "models.models_dir" => self.models.models_dir = PathBuf::from(value),
            "models.default_embedding_model" => self.models.default_embedding_model = value.to_string(),
            "scoring.semantic_weight" => {
                self.scoring.semantic_weight = value.parse().map_err(|e: std::num::ParseFloatError| invalid(e.to_string()))?
            }
            "scoring.lexical_weight" => {
                self.scoring.lexical_weight = value.parse().map_err(|e: std::num::ParseFloatError| invalid(e.to_string()))?
            }
            "scoring.coverage_weight" => {
                self.scoring.coverage_weight = value.parse().map_err(|e: std::num::ParseFloatError| invalid(e.to_string()))?
            }
            "scoring.experience_weight" => {
                self.scoring.experience_weight = value.parse().map_err(|e: std::num::ParseFloatError| invalid(e.to_string()))?
            }
            "scoring.experience_placeholder" => {
                self.scoring.experience_placeholder =
                    value.parse().map_err(|e: std::num::ParseFloatError| invalid(e.to_string()))?
            }
            "scoring.clamp_negative_semantic" => {
                self.scoring.clamp_negative_semantic =
                    value.parse().map_err(|e: std::str::ParseBoolError| invalid(e.to_string()))?
            }
            "output.format" => {
                self.output.format = match value.to_lowercase().as_str() {
                    "console" => OutputFormat::Console,
                    "json" => OutputFormat::Json,
                    other => return Err(invalid(format!("unknown format '{}'", other))),
                }
            }
            "output.detailed" => {
                self.output.detailed = value.parse().map_err(|e: std::str::ParseBoolError| invalid(e.to_string()))?
            }
            "output.color_output" => {
                self.output.color_output = value.parse().map_err(|e: std::str::ParseBoolError| invalid(e.to_string()))?
            }
            _ => {
                return Err(ScreenerError::Configuration(format!("Unknown configuration key: {}", key)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scoring.semantic_weight, 0.5);
        assert_eq!(config.scoring.experience_placeholder, 1.0);
        assert!(!config.scoring.clamp_negative_semantic);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        // First load writes defaults
        let mut config = Config::load_from(&path).unwrap();
        assert!(path.exists());

        config.terms.extra_abbreviations.insert("K8s".to_string(), "Kubernetes".to_string());
        config.set_value("output.format", "json").unwrap();
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.output.format, OutputFormat::Json);
        assert_eq!(
            reloaded.terms.extra_abbreviations.get("K8s").map(String::as_str),
            Some("Kubernetes")
        );
    }

    #[test]
    fn test_missing_terms_section_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[models]
models_dir = "/tmp/models"
default_embedding_model = "potion-base-8M"

[scoring]
semantic_weight = 0.5
lexical_weight = 0.2
coverage_weight = 0.2
experience_weight = 0.1
experience_placeholder = 1.0

[output]
format = "Json"
detailed = true
color_output = false
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.terms.extra_vocabulary.is_empty());
        assert!(config.terms.extra_abbreviations.is_empty());
        assert!(!config.scoring.clamp_negative_semantic);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let mut config = Config::default();
        config.set_value("scoring.semantic_weight", "0.9").unwrap();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scoring.experience_placeholder = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_set_value_errors() {
        let mut config = Config::default();
        assert!(config.set_value("scoring.unknown", "1").is_err());
        assert!(config.set_value("scoring.lexical_weight", "lots").is_err());
        assert!(config.set_value("output.format", "pdf").is_err());
        config.set_value("scoring.clamp_negative_semantic", "true").unwrap();
        assert!(config.scoring.clamp_negative_semantic);
    }
}
