//! Application and per-database configuration.
//!
//! The configuration surface recognized by the engine and its external
//! collaborators: network binding, snapshot storage, per-database HNSW
//! parameters, and the log level. Values load from a JSON file over
//! defaults, with environment variables applied on top; malformed entries
//! fall back rather than fail (an unknown log level becomes `warn`, an
//! unknown metric becomes Euclidean).

use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use proxima_vector::{DistanceMetric, HnswConfig};

use crate::error::Result;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Network binding consumed by external collaborators.
    pub server: ServerConfig,
    /// Snapshot storage settings.
    pub storage: StorageConfig,
    /// Databases to create at startup, keyed by name.
    pub databases: HashMap<String, DatabaseConfig>,
    /// Logging verbosity.
    pub log_level: LogLevel,
}

/// Network binding for external collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "localhost".to_string(), port: 8080 }
    }
}

/// Snapshot storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory for snapshots.
    pub data_path: PathBuf,
    /// Whether the snapshot scheduler runs.
    pub persistence_engine: bool,
    /// Seconds between snapshot passes.
    pub persistence_interval: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("./data"),
            persistence_engine: true,
            persistence_interval: 5,
        }
    }
}

/// Configuration for a single database: its HNSW parameters.
///
/// Matches the on-disk `config.json` shape `{"hnsw": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// The HNSW index parameters, including dimensionality and metric.
    pub hnsw: HnswConfig,
}

impl DatabaseConfig {
    /// Create a database configuration from index parameters.
    #[must_use]
    pub const fn new(hnsw: HnswConfig) -> Self {
        Self { hnsw }
    }
}

impl From<HnswConfig> for DatabaseConfig {
    fn from(hnsw: HnswConfig) -> Self {
        Self { hnsw }
    }
}

/// Logging verbosity levels.
///
/// Parses from the lowercase name; unknown names fall back to `Warn`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogLevel {
    /// Verbose diagnostic output.
    Debug,
    /// Informational messages.
    Info,
    /// Warnings only.
    #[default]
    Warn,
    /// Errors only.
    Error,
    /// Unrecoverable errors only.
    Fatal,
}

impl LogLevel {
    /// Parse a level from its lowercase name, falling back to `Warn`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "debug" => Self::Debug,
            "info" => Self::Info,
            "error" => Self::Error,
            "fatal" => Self::Fatal,
            _ => Self::Warn,
        }
    }

    /// The lowercase name of this level.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }

    /// The equivalent `tracing` level. `Fatal` maps to `ERROR`, the most
    /// severe level the facade offers.
    #[must_use]
    pub const fn as_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error | Self::Fatal => tracing::Level::ERROR,
        }
    }
}

impl From<String> for LogLevel {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.name().to_string()
    }
}

impl Default for Config {
    /// The default configuration: localhost:8080, `./data` snapshots every
    /// 5 seconds, one `default` database (128 dimensions, M=16,
    /// ef_construction=200, ef_search=100, Euclidean), log level `warn`.
    fn default() -> Self {
        let mut databases = HashMap::new();
        databases.insert("default".to_string(), DatabaseConfig::new(HnswConfig::new(128)));

        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            databases,
            log_level: LogLevel::Warn,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, with missing fields taking
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or is not valid JSON.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Apply environment-variable overrides on top of this configuration.
    ///
    /// Recognized variables: `PROXIMA_HOST`, `PROXIMA_PORT`,
    /// `PROXIMA_DIMS`, `PROXIMA_M`, `PROXIMA_EF_CONSTRUCTION`,
    /// `PROXIMA_EF_SEARCH`, `PROXIMA_DISTANCE_TYPE`, `PROXIMA_DATA_PATH`,
    /// `PROXIMA_PERSISTENCE_ENABLED`, `PROXIMA_AUTOSAVE_INTERVAL`.
    /// The HNSW variables target the `default` database. Malformed values
    /// are ignored.
    pub fn apply_env(&mut self) {
        if let Ok(host) = env::var("PROXIMA_HOST") {
            self.server.host = host;
        }
        if let Some(port) = parse_env("PROXIMA_PORT") {
            self.server.port = port;
        }

        if let Some(default_db) = self.databases.get_mut("default") {
            if let Some(dims) = parse_env("PROXIMA_DIMS") {
                default_db.hnsw.dimensions = dims;
            }
            if let Some(m) = parse_env("PROXIMA_M") {
                default_db.hnsw.m = m;
            }
            if let Some(ef) = parse_env("PROXIMA_EF_CONSTRUCTION") {
                default_db.hnsw.ef_construction = ef;
            }
            if let Some(ef) = parse_env("PROXIMA_EF_SEARCH") {
                default_db.hnsw.ef_search = ef;
            }
            if let Some(tag) = parse_env::<u8>("PROXIMA_DISTANCE_TYPE") {
                default_db.hnsw.distance_type = DistanceMetric::from(tag);
            }
        }

        if let Ok(path) = env::var("PROXIMA_DATA_PATH") {
            self.storage.data_path = PathBuf::from(path);
        }
        if let Some(enabled) = parse_env("PROXIMA_PERSISTENCE_ENABLED") {
            self.storage.persistence_engine = enabled;
        }
        if let Some(interval) = parse_env("PROXIMA_AUTOSAVE_INTERVAL") {
            self.storage.persistence_interval = interval;
        }
    }

    /// Check that every configured database has valid HNSW parameters.
    ///
    /// # Errors
    ///
    /// Returns the index crate's `InvalidParameter` error for the first
    /// offending database.
    pub fn validate(&self) -> Result<()> {
        for db in self.databases.values() {
            db.hnsw.validate()?;
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.data_path, PathBuf::from("./data"));
        assert!(config.storage.persistence_engine);
        assert_eq!(config.storage.persistence_interval, 5);
        assert_eq!(config.log_level, LogLevel::Warn);

        let default_db = &config.databases["default"];
        assert_eq!(default_db.hnsw.dimensions, 128);
        assert_eq!(default_db.hnsw.m, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level_parse_fallback() {
        assert_eq!(LogLevel::parse("debug"), LogLevel::Debug);
        assert_eq!(LogLevel::parse("fatal"), LogLevel::Fatal);
        assert_eq!(LogLevel::parse("verbose"), LogLevel::Warn);
        assert_eq!(LogLevel::parse(""), LogLevel::Warn);
    }

    #[test]
    fn test_log_level_serde() {
        let parsed: LogLevel = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(parsed, LogLevel::Error);
        let parsed: LogLevel = serde_json::from_str("\"nonsense\"").unwrap();
        assert_eq!(parsed, LogLevel::Warn);
        assert_eq!(serde_json::to_string(&LogLevel::Info).unwrap(), "\"info\"");
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let json = r#"{
            "storage": {"data_path": "/tmp/snapshots"},
            "log_level": "info"
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.storage.data_path, PathBuf::from("/tmp/snapshots"));
        assert!(config.storage.persistence_engine);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_database_config_json_shape() {
        let config = DatabaseConfig::new(
            HnswConfig::new(8).with_metric(DistanceMetric::Cosine),
        );
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["hnsw"]["dimensions"], 8);
        assert_eq!(json["hnsw"]["distance_type"], 1);
    }

    #[test]
    fn test_validate_rejects_bad_database() {
        let mut config = Config::default();
        config
            .databases
            .insert("broken".to_string(), DatabaseConfig::new(HnswConfig::new(0)));
        assert!(config.validate().is_err());
    }
}
