//! Server configuration
//!
//! Settings are read once at startup from two layered sources:
//! - the environment file `<config_dir>/.env.<environment>`
//! - process environment variables with the same names, which win
//!
//! Nothing is written back into the process environment.

use config::{Config, Environment};
use krathong_service::PublishMode;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Default HTTP port
pub const DEFAULT_APP_PORT: u16 = 8080;

/// Keys read from the environment file and the process environment
pub const KNOWN_KEYS: &[&str] = &[
    "MYSQLUSER",
    "MYSQLPASSWORD",
    "MYSQLDATABASE",
    "MYSQLHOST",
    "MYSQLPORT",
    "APP_HOST",
    "APP_PORT",
    "BROKER_ADDRESS",
    "BROKER_TOPIC",
    "KAFKA_BROKER",
    "KAFKA_TOPIC",
    "PUBLISH_MODE",
    "DB_RUN_MIGRATIONS",
    "LOG_LEVEL",
    "LOG_FORMAT",
];

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The environment file could not be read or merged
    #[error("Failed to load configuration: {0}")]
    Load(String),

    /// A required key is absent or empty
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    /// A key holds a value that cannot be used
    #[error("Invalid configuration for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Load(err.to_string())
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Settings {
    /// HTTP listener settings
    pub server: ServerSettings,

    /// MySQL settings
    pub database: DatabaseSettings,

    /// Broker settings
    pub broker: BrokerSettings,

    /// Logging settings
    pub logging: LoggingSettings,
}

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

/// Database configuration
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub user: String,
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: u16,

    /// Apply embedded migrations at startup
    pub run_migrations: bool,
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

/// Broker configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerSettings {
    /// Broker address
    pub address: String,

    /// Topic (NATS subject) notifications go to
    pub topic: String,

    /// Whether and how creates are published
    pub publish_mode: PublishMode,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Filter used when `RUST_LOG` is unset
    pub level: String,

    /// Output format
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}' (expected pretty or json)", other)),
        }
    }
}

/// Values as they come out of the layered sources, before validation
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    mysqluser: Option<String>,
    mysqlpassword: Option<String>,
    mysqldatabase: Option<String>,
    mysqlhost: Option<String>,
    mysqlport: Option<String>,
    app_host: Option<String>,
    app_port: Option<String>,
    broker_address: Option<String>,
    broker_topic: Option<String>,
    kafka_broker: Option<String>,
    kafka_topic: Option<String>,
    publish_mode: Option<String>,
    db_run_migrations: Option<String>,
    log_level: Option<String>,
    log_format: Option<String>,
}

impl Settings {
    /// Path of the environment file for a deployment environment
    pub fn env_file_path(config_dir: impl AsRef<Path>, environment: &str) -> PathBuf {
        config_dir.as_ref().join(format!(".env.{}", environment))
    }

    /// Load settings for `environment`, letting process variables override
    /// the file
    pub fn load(config_dir: impl AsRef<Path>, environment: &str) -> Result<Self, ConfigError> {
        let overrides = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .filter(|(key, _)| KNOWN_KEYS.contains(&key.as_str()))
            .collect();

        Self::from_sources(Self::env_file_path(config_dir, environment), overrides)
    }

    /// Load settings from an environment file and explicit overrides
    pub fn from_sources(
        env_file: impl AsRef<Path>,
        overrides: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let env_file = env_file.as_ref();
        let file_values = read_env_file(env_file)?;

        let raw: RawSettings = Config::builder()
            .add_source(Environment::default().source(Some(file_values)))
            .add_source(Environment::default().source(Some(overrides)))
            .build()?
            .try_deserialize()?;

        Self::validate(raw)
    }

    /// Check required keys in order and parse typed values
    fn validate(raw: RawSettings) -> Result<Self, ConfigError> {
        let user = required("MYSQLUSER", raw.mysqluser)?;
        let password = required("MYSQLPASSWORD", raw.mysqlpassword)?;
        let database = required("MYSQLDATABASE", raw.mysqldatabase)?;
        let db_host = required("MYSQLHOST", raw.mysqlhost)?;
        let db_port = required("MYSQLPORT", raw.mysqlport)?;
        // Older env files name the broker keys KAFKA_BROKER / KAFKA_TOPIC
        let address = required(
            "BROKER_ADDRESS",
            optional(raw.broker_address).or(raw.kafka_broker),
        )?;
        let topic = required("BROKER_TOPIC", optional(raw.broker_topic).or(raw.kafka_topic))?;

        let db_port = parse_port("MYSQLPORT", &db_port)?;
        let app_port = match optional(raw.app_port) {
            Some(port) => parse_port("APP_PORT", &port)?,
            None => DEFAULT_APP_PORT,
        };

        let publish_mode = optional(raw.publish_mode)
            .map(|mode| mode.parse::<PublishMode>())
            .transpose()
            .map_err(|reason| ConfigError::Invalid {
                field: "PUBLISH_MODE",
                reason,
            })?
            .unwrap_or_default();

        let run_migrations = match optional(raw.db_run_migrations) {
            Some(value) => parse_bool("DB_RUN_MIGRATIONS", &value)?,
            None => true,
        };

        let format = optional(raw.log_format)
            .map(|format| format.parse::<LogFormat>())
            .transpose()
            .map_err(|reason| ConfigError::Invalid {
                field: "LOG_FORMAT",
                reason,
            })?
            .unwrap_or_default();

        Ok(Self {
            server: ServerSettings {
                host: optional(raw.app_host).unwrap_or_else(|| "0.0.0.0".to_string()),
                port: app_port,
            },
            database: DatabaseSettings {
                user,
                password,
                database,
                host: db_host,
                port: db_port,
                run_migrations,
            },
            broker: BrokerSettings {
                address,
                topic,
                publish_mode,
            },
            logging: LoggingSettings {
                level: optional(raw.log_level).unwrap_or_else(|| "info".to_string()),
                format,
            },
        })
    }

    /// Socket address string the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Parse the environment file without touching the process environment
fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let load_error =
        |e: dotenvy::Error| ConfigError::Load(format!("{}: {}", path.display(), e));

    let mut values = HashMap::new();
    for item in dotenvy::from_path_iter(path).map_err(load_error)? {
        let (key, value) = item.map_err(load_error)?;
        values.insert(key, value);
    }
    Ok(values)
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    optional(value).ok_or(ConfigError::Missing(field))
}

fn parse_port(field: &'static str, value: &str) -> Result<u16, ConfigError> {
    value.trim().parse().map_err(|e| ConfigError::Invalid {
        field,
        reason: format!("'{}' is not a valid port: {}", value, e),
    })
}

fn parse_bool(field: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::Invalid {
            field,
            reason: format!("'{}' is not a boolean", other),
        }),
    }
}
