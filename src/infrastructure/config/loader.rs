use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid corpus top_k: {0}. Must be at least 1")]
    InvalidTopK(usize),

    #[error("Invalid web max_results: {0}. Must be at least 1")]
    InvalidMaxResults(usize),

    #[error("Invalid max_iterations: {0}. Must be at least 1")]
    InvalidMaxIterations(u32),

    #[error("Invalid temperature: {0}. Must be within 0.0..=1.0")]
    InvalidTemperature(f32),

    #[error("Invalid chunking: chunk_size_words and max_chunks must be at least 1")]
    InvalidChunking,

    #[error("Corpus index path cannot be empty")]
    EmptyIndexPath,

    #[error("Completion model cannot be empty")]
    EmptyModel,

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .lara/config.yaml (project config)
    /// 3. .lara/local.yaml (project local overrides, optional)
    /// 4. Environment variables (LARA_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".lara/config.yaml"))
            .merge(Yaml::file(".lara/local.yaml"))
            .merge(Env::prefixed("LARA_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading.
    ///
    /// Credential presence is checked separately at wiring time, where env
    /// fallbacks are resolved.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if config.corpus.top_k == 0 {
            return Err(ConfigError::InvalidTopK(config.corpus.top_k));
        }

        if config.corpus.index_path.is_empty() {
            return Err(ConfigError::EmptyIndexPath);
        }

        if config.web_search.max_results == 0 {
            return Err(ConfigError::InvalidMaxResults(config.web_search.max_results));
        }

        if config.research_loop.max_iterations == 0 {
            return Err(ConfigError::InvalidMaxIterations(
                config.research_loop.max_iterations,
            ));
        }

        if config.completion.model.is_empty() {
            return Err(ConfigError::EmptyModel);
        }

        if !(0.0..=1.0).contains(&config.completion.temperature) {
            return Err(ConfigError::InvalidTemperature(config.completion.temperature));
        }

        if config.summarizer.chunk_size_words == 0 || config.summarizer.max_chunks == 0 {
            return Err(ConfigError::InvalidChunking);
        }

        if config.completion.retry.initial_backoff_ms >= config.completion.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.completion.retry.initial_backoff_ms,
                config.completion.retry.max_backoff_ms,
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::DigestStrategy;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.corpus.top_k, 5);
        assert_eq!(config.web_search.max_results, 5);
        assert_eq!(config.research_loop.max_iterations, 5);
        assert_eq!(config.completion.model, "llama-3.1-8b-instant");
        assert!((config.completion.temperature - 0.2).abs() < f32::EPSILON);
        ConfigLoader::validate(&config).expect("default config should be valid");
    }

    #[test]
    fn yaml_parsing_honors_nested_overrides() {
        let yaml = r"
summarizer:
  strategy: chunk
  max_chunks: 2
research_loop:
  max_iterations: 8
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.summarizer.strategy, DigestStrategy::Chunk);
        assert_eq!(config.summarizer.max_chunks, 2);
        assert_eq!(config.research_loop.max_iterations, 8);
        assert_eq!(config.logging.level, "debug");
        // Untouched fields keep their defaults.
        assert_eq!(config.summarizer.chunk_size_words, 1_200);

        ConfigLoader::validate(&config).expect("parsed config should be valid");
    }

    #[test]
    fn rejects_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidLogLevel(_)
        ));
    }

    #[test]
    fn rejects_zero_iterations() {
        let mut config = Config::default();
        config.research_loop.max_iterations = 0;

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidMaxIterations(0)
        ));
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        let mut config = Config::default();
        config.completion.temperature = 1.5;

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidTemperature(_)
        ));
    }

    #[test]
    fn rejects_inverted_backoff() {
        let mut config = Config::default();
        config.completion.retry.initial_backoff_ms = 60_000;
        config.completion.retry.max_backoff_ms = 30_000;

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidBackoff(60_000, 30_000)
        ));
    }

    #[test]
    fn hierarchical_merging_prefers_later_sources() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(
            base_file,
            "research_loop:\n  max_iterations: 2\nlogging:\n  level: info\n  format: json"
        )
        .unwrap();
        base_file.flush().unwrap();

        let mut override_file = NamedTempFile::new().unwrap();
        writeln!(override_file, "research_loop:\n  max_iterations: 7").unwrap();
        override_file.flush().unwrap();

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.research_loop.max_iterations, 7, "override should win");
        assert_eq!(config.logging.format, "json", "base should persist");
    }
}
