//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub tracker: TrackerConfig,
    pub ranking: RankingConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply pending migrations at startup
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

/// Presence ingest configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Number of accounting workers; events are sharded by member
    #[serde(default = "default_tracker_workers")]
    pub workers: usize,
    /// Pending events per worker before ingest applies backpressure
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

/// Ranking query limits
#[derive(Debug, Clone, Deserialize)]
pub struct RankingConfig {
    #[serde(default = "default_ranking_limit")]
    pub default_limit: i64,
    #[serde(default = "default_ranking_max_limit")]
    pub max_limit: i64,
}

impl RankingConfig {
    /// Apply the default and cap to a requested limit
    #[must_use]
    pub fn effective_limit(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit.max(1))
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            workers: default_tracker_workers(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            default_limit: default_ranking_limit(),
            max_limit: default_ranking_max_limit(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "vc-tracker".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_run_migrations() -> bool {
    true
}

fn default_tracker_workers() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    256
}

fn default_ranking_limit() -> i64 {
    10
}

fn default_ranking_max_limit() -> i64 {
    100
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Optional values that fail to parse are rejected rather than
    /// silently defaulted.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_value = match lookup("APP_ENV") {
            Some(raw) => Environment::parse(&raw)
                .ok_or(ConfigError::InvalidValue("APP_ENV", raw))?,
            None => default_env(),
        };

        let tracker = TrackerConfig {
            workers: parse_or(&lookup, "TRACKER_WORKERS", default_tracker_workers)?,
            queue_capacity: parse_or(&lookup, "TRACKER_QUEUE_CAPACITY", default_queue_capacity)?,
        };
        if tracker.workers == 0 {
            return Err(ConfigError::InvalidValue("TRACKER_WORKERS", "0".to_string()));
        }
        if tracker.queue_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "TRACKER_QUEUE_CAPACITY",
                "0".to_string(),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: env_value,
            },
            api: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(default_host),
                port: parse_required(&lookup, "API_PORT")?,
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", default_min_connections)?,
                run_migrations: parse_or(&lookup, "DATABASE_RUN_MIGRATIONS", default_run_migrations)?,
            },
            tracker,
            ranking: RankingConfig {
                default_limit: parse_or(&lookup, "RANKING_DEFAULT_LIMIT", default_ranking_limit)?,
                max_limit: parse_or(&lookup, "RANKING_MAX_LIMIT", default_ranking_max_limit)?,
            },
        })
    }
}

fn parse_required<F, T>(lookup: &F, key: &'static str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key).ok_or(ConfigError::MissingVar(key))?;
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key, raw))
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: fn() -> T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("API_PORT", "8080"),
            ("DATABASE_URL", "postgres://localhost/vc"),
        ]))
        .unwrap();

        assert_eq!(config.app.name, "vc-tracker");
        assert!(config.app.env.is_development());
        assert_eq!(config.api.address(), "127.0.0.1:8080");
        assert_eq!(config.database.max_connections, 10);
        assert!(config.database.run_migrations);
        assert_eq!(config.tracker.workers, 4);
        assert_eq!(config.ranking.default_limit, 10);
    }

    #[test]
    fn test_missing_required_vars() {
        let err = AppConfig::from_lookup(lookup_from(&[("API_PORT", "8080")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("DATABASE_URL")));

        let err = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "x")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("API_PORT")));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("API_PORT", "8080"),
            ("DATABASE_URL", "x"),
            ("TRACKER_WORKERS", "many"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("TRACKER_WORKERS", _)));

        let err = AppConfig::from_lookup(lookup_from(&[
            ("API_PORT", "8080"),
            ("DATABASE_URL", "x"),
            ("TRACKER_WORKERS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("TRACKER_WORKERS", _)));

        let err = AppConfig::from_lookup(lookup_from(&[
            ("API_PORT", "8080"),
            ("DATABASE_URL", "x"),
            ("APP_ENV", "moon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("APP_ENV", _)));
    }

    #[test]
    fn test_environment_parsing() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("API_PORT", "8080"),
            ("DATABASE_URL", "x"),
            ("APP_ENV", "Production"),
            ("DATABASE_RUN_MIGRATIONS", "false"),
        ]))
        .unwrap();
        assert!(config.app.env.is_production());
        assert!(!config.database.run_migrations);
    }

    #[test]
    fn test_effective_limit() {
        let ranking = RankingConfig::default();
        assert_eq!(ranking.effective_limit(None), 10);
        assert_eq!(ranking.effective_limit(Some(0)), 1);
        assert_eq!(ranking.effective_limit(Some(5_000)), 100);
        assert_eq!(ranking.effective_limit(Some(25)), 25);
    }
}
