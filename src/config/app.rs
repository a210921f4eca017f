//! Main application configuration
//!
//! This module defines the primary configuration structures for the rating
//! engine, including file and environment variable loading and validation.

use crate::config::rating::RatingConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub input: InputSettings,
    pub rating: RatingConfig,
    pub output: OutputSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Where match rows come from and how they are read
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// CSV file holding one match per row, oldest first
    pub games_path: PathBuf,
    /// Whether the first row is a header
    pub has_headers: bool,
    /// chrono format of the date column
    pub date_format: String,
    /// Cell value marking that a team switched roles
    pub switched_marker: String,
    /// Score substituted for a cell that is not a number
    pub forfeit_score: u32,
}

/// Where reports are written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory receiving the ratings table and both leaderboards
    pub directory: PathBuf,
    /// Exposed rating below which players leave the role leaderboards
    pub leaderboard_threshold: f64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "foosball-ratings".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            games_path: PathBuf::from("games.csv"),
            has_headers: true,
            date_format: "%d/%m/%Y".to_string(),
            switched_marker: "Ja".to_string(),
            forfeit_score: 9,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("reports"),
            leaderboard_threshold: 1.0,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Input settings
        if let Ok(path) = env::var("GAMES_PATH") {
            self.input.games_path = PathBuf::from(path);
        }
        if let Ok(date_format) = env::var("DATE_FORMAT") {
            self.input.date_format = date_format;
        }
        if let Ok(marker) = env::var("SWITCHED_MARKER") {
            self.input.switched_marker = marker;
        }
        if let Ok(has_headers) = env::var("HAS_HEADERS") {
            self.input.has_headers = has_headers
                .parse()
                .map_err(|_| anyhow!("Invalid HAS_HEADERS value: {}", has_headers))?;
        }
        if let Ok(score) = env::var("FORFEIT_SCORE") {
            self.input.forfeit_score = score
                .parse()
                .map_err(|_| anyhow!("Invalid FORFEIT_SCORE value: {}", score))?;
        }

        // Rating settings
        if let Ok(strategy) = env::var("K_STRATEGY") {
            self.rating.strategy = strategy
                .parse()
                .map_err(|_| anyhow!("Invalid K_STRATEGY value: {}", strategy))?;
        }
        if let Ok(probability) = env::var("DRAW_PROBABILITY") {
            self.rating.draw_probability = probability
                .parse()
                .map_err(|_| anyhow!("Invalid DRAW_PROBABILITY value: {}", probability))?;
        }
        if let Ok(beta) = env::var("BETA") {
            self.rating.beta = beta
                .parse()
                .map_err(|_| anyhow!("Invalid BETA value: {}", beta))?;
        }
        if let Ok(factor) = env::var("EXPOSURE_FACTOR") {
            self.rating.exposure_factor = factor
                .parse()
                .map_err(|_| anyhow!("Invalid EXPOSURE_FACTOR value: {}", factor))?;
        }
        if let Ok(tolerance) = env::var("CHANGE_TOLERANCE") {
            self.rating.change_tolerance = tolerance
                .parse()
                .map_err(|_| anyhow!("Invalid CHANGE_TOLERANCE value: {}", tolerance))?;
        }

        // Output settings
        if let Ok(dir) = env::var("OUTPUT_DIR") {
            self.output.directory = PathBuf::from(dir);
        }
        if let Ok(threshold) = env::var("LEADERBOARD_THRESHOLD") {
            self.output.leaderboard_threshold = threshold
                .parse()
                .map_err(|_| anyhow!("Invalid LEADERBOARD_THRESHOLD value: {}", threshold))?;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate input settings
    if config.input.games_path.as_os_str().is_empty() {
        return Err(anyhow!("Games path cannot be empty"));
    }
    if config.input.date_format.is_empty() {
        return Err(anyhow!("Date format cannot be empty"));
    }

    // Validate rating environment
    let rating = &config.rating;
    if rating.beta <= 0.0 {
        return Err(anyhow!("Beta must be positive"));
    }
    if rating.initial_uncertainty <= 0.0 {
        return Err(anyhow!("Initial uncertainty must be positive"));
    }
    if rating.default_dynamics < 0.0 {
        return Err(anyhow!("Dynamics factor must be non-negative"));
    }
    if !(0.0..1.0).contains(&rating.draw_probability) {
        return Err(anyhow!("Draw probability must be in [0, 1)"));
    }
    if rating.exposure_factor < 0.0 {
        return Err(anyhow!("Exposure factor must be non-negative"));
    }
    if rating.change_tolerance < 0.0 {
        return Err(anyhow!("Change tolerance must be non-negative"));
    }

    // Validate output settings
    if config.output.directory.as_os_str().is_empty() {
        return Err(anyhow!("Output directory cannot be empty"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::k_factor::KStrategy;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.input.forfeit_score, 9);
        assert_eq!(config.input.switched_marker, "Ja");
        assert_eq!(config.output.leaderboard_threshold, 1.0);
        assert_eq!(config.rating.strategy, KStrategy::ShutoutDoubleGame);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.service.log_level = "loud".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.rating.beta = 0.0;
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.rating.draw_probability = 1.0;
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.rating.change_tolerance = -0.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [rating]
            strategy = "by_margin"

            [output]
            directory = "out"
            "#,
        )
        .unwrap();

        assert_eq!(config.rating.strategy, KStrategy::ByMargin);
        assert_eq!(config.output.directory, PathBuf::from("out"));
        assert_eq!(config.output.leaderboard_threshold, 1.0);
        assert_eq!(config.input.date_format, "%d/%m/%Y");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_env_overrides_rating_and_input_settings() {
        let vars = [
            ("HAS_HEADERS", "false"),
            ("BETA", "3.5"),
            ("EXPOSURE_FACTOR", "2"),
            ("CHANGE_TOLERANCE", "0.5"),
        ];
        for (key, value) in vars {
            env::set_var(key, value);
        }

        let mut config = AppConfig::default();
        let applied = config.apply_env();

        env::set_var("BETA", "steep");
        let rejected = AppConfig::default().apply_env();

        for (key, _) in vars {
            env::remove_var(key);
        }

        applied.unwrap();
        assert!(!config.input.has_headers);
        assert_eq!(config.rating.beta, 3.5);
        assert_eq!(config.rating.exposure_factor, 2.0);
        assert_eq!(config.rating.change_tolerance, 0.5);
        assert!(rejected.is_err());
    }
}
