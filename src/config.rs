use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::{AlertSettings, DEFAULT_MIN_SCORE};
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_path")]
    pub path: String,
    /// Zero keeps a loaded catalog until an explicit refresh
    #[serde(default)]
    pub cache_ttl_secs: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            cache_ttl_secs: 0,
        }
    }
}

fn default_catalog_path() -> String { "data/schemes.csv".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_min_score")]
    pub min_score: u32,
    pub default_limit: Option<usize>,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            default_limit: None,
            max_limit: default_max_limit(),
        }
    }
}

fn default_min_score() -> u32 { DEFAULT_MIN_SCORE }
fn default_max_limit() -> usize { 100 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_base_weight")]
    pub base: u32,
    #[serde(default = "default_category_weight")]
    pub category: u32,
    #[serde(default = "default_category_related_weight")]
    pub category_related: u32,
    #[serde(default = "default_age_weight")]
    pub age: u32,
    #[serde(default = "default_caste_weight")]
    pub caste: u32,
    #[serde(default = "default_caste_generic_weight")]
    pub caste_generic: u32,
    #[serde(default = "default_state_weight")]
    pub state: u32,
    #[serde(default = "default_state_nationwide_weight")]
    pub state_nationwide: u32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            base: default_base_weight(),
            category: default_category_weight(),
            category_related: default_category_related_weight(),
            age: default_age_weight(),
            caste: default_caste_weight(),
            caste_generic: default_caste_generic_weight(),
            state: default_state_weight(),
            state_nationwide: default_state_nationwide_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        ScoringWeights {
            base: config.base,
            category: config.category,
            category_related: config.category_related,
            age: config.age,
            caste: config.caste,
            caste_generic: config.caste_generic,
            state: config.state,
            state_nationwide: config.state_nationwide,
        }
    }
}

fn default_base_weight() -> u32 { 25 }
fn default_category_weight() -> u32 { 25 }
fn default_category_related_weight() -> u32 { 10 }
fn default_age_weight() -> u32 { 20 }
fn default_caste_weight() -> u32 { 20 }
fn default_caste_generic_weight() -> u32 { 15 }
fn default_state_weight() -> u32 { 10 }
fn default_state_nationwide_weight() -> u32 { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_recent_days")]
    pub recent_days: i64,
    pub recent_limit: Option<usize>,
    #[serde(default = "default_new_scheme_days")]
    pub new_scheme_days: i64,
    #[serde(default = "default_new_scheme_limit")]
    pub new_scheme_limit: usize,
    #[serde(default = "default_deadline_limit")]
    pub deadline_limit: usize,
    #[serde(default = "default_priority_limit")]
    pub priority_limit: usize,
    #[serde(default = "default_category_limit")]
    pub category_limit: usize,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            recent_days: default_recent_days(),
            recent_limit: None,
            new_scheme_days: default_new_scheme_days(),
            new_scheme_limit: default_new_scheme_limit(),
            deadline_limit: default_deadline_limit(),
            priority_limit: default_priority_limit(),
            category_limit: default_category_limit(),
        }
    }
}

impl From<&AlertsConfig> for AlertSettings {
    fn from(config: &AlertsConfig) -> Self {
        AlertSettings {
            recent_days: config.recent_days,
            recent_limit: config.recent_limit,
            new_scheme_days: config.new_scheme_days,
            new_scheme_limit: config.new_scheme_limit,
            deadline_limit: config.deadline_limit,
            priority_limit: config.priority_limit,
            category_limit: config.category_limit,
        }
    }
}

fn default_recent_days() -> i64 { 30 }
fn default_new_scheme_days() -> i64 { 60 }
fn default_new_scheme_limit() -> usize { 10 }
fn default_deadline_limit() -> usize { 5 }
fn default_priority_limit() -> usize { 10 }
fn default_category_limit() -> usize { 15 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with SCHEME_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Local overrides for development
            .add_source(File::with_name("config/local").required(false))
            // e.g., SCHEME__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SCHEME")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SCHEME")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Scoring weights, checked to total 100 points
    pub fn scoring_weights(&self) -> Result<ScoringWeights, ConfigError> {
        let weights = ScoringWeights::from(&self.scoring.weights);
        weights.validate().map_err(ConfigError::Message)?;
        Ok(weights)
    }

    pub fn alert_settings(&self) -> AlertSettings {
        AlertSettings::from(&self.alerts)
    }
}

/// Apply well-known environment variables that sit outside the prefix
///
/// `CATALOG_PATH` wins over `catalog.path` from any file.
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Ok(path) = std::env::var("CATALOG_PATH") {
        builder = builder.set_override("catalog.path", path)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::from(&WeightsConfig::default());
        assert_eq!(weights, ScoringWeights::default());
        assert_eq!(weights.total(), 100);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_default_alerts_match_generator() {
        assert_eq!(AlertSettings::from(&AlertsConfig::default()), AlertSettings::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("Failed to create temp file");
        writeln!(
            file,
            r#"
[server]
host = "127.0.0.1"
port = 9090

[catalog]
path = "fixtures/schemes.csv"

[matching]
min_score = 60

[scoring.weights]
base = 30
category = 20
"#
        )
        .unwrap();

        let settings = Settings::load_from(file.path()).unwrap();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.catalog.path, "fixtures/schemes.csv");
        assert_eq!(settings.catalog.cache_ttl_secs, 0);
        assert_eq!(settings.matching.min_score, 60);
        assert_eq!(settings.alerts.recent_days, 30);
        assert_eq!(settings.scoring.weights.base, 30);
        assert!(settings.scoring_weights().is_ok());
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let settings = Settings {
            server: ServerSettings::default(),
            catalog: CatalogSettings::default(),
            matching: MatchingSettings::default(),
            scoring: ScoringSettings {
                weights: WeightsConfig {
                    base: 50,
                    ..WeightsConfig::default()
                },
            },
            alerts: AlertsConfig::default(),
            logging: LoggingSettings::default(),
        };

        assert!(settings.scoring_weights().is_err());
    }
}
