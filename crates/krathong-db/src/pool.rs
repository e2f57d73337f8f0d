//! Database connection pool management
//!
//! This module provides connection pooling for MySQL using SQLx's built-in
//! pooling, with bounded size, connection recycling and health checking.

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::ConnectOptions;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// Default maximum number of open connections in the pool
pub const DEFAULT_MAX_CONNECTIONS: u32 = 100;

/// Default minimum number of connections kept open
pub const DEFAULT_MIN_CONNECTIONS: u32 = 0;

/// Default connection timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default idle timeout in seconds (10 minutes)
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

/// Default maximum lifetime for a connection (1 hour)
pub const DEFAULT_MAX_LIFETIME_SECS: u64 = 3600;

/// Credentials and location of the MySQL server
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Database user
    pub user: String,

    /// Database password
    pub password: String,

    /// Database (schema) name
    pub database: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,
}

impl ConnectionSettings {
    /// Create connection settings
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
        host: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            database: database.into(),
            host: host.into(),
            port,
        }
    }

    /// Build SQLx connect options; sqlx pins the session time zone to UTC
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .charset("utf8mb4")
    }

    /// Connection target without the password, for logging
    pub fn redacted(&self) -> String {
        format!(
            "mysql://{}:***@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

/// Configuration for the database connection pool
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Where and how to connect
    pub connection: ConnectionSettings,

    /// Maximum number of open connections
    pub max_connections: u32,

    /// Minimum number of connections to maintain in the pool
    pub min_connections: u32,

    /// Timeout for acquiring a connection
    pub connect_timeout: Duration,

    /// Idle connections are closed after this duration
    pub idle_timeout: Duration,

    /// Connections are recycled after this lifetime
    pub max_lifetime: Duration,

    /// Whether to enable SQL statement logging
    pub enable_logging: bool,

    /// Whether to run migrations on startup
    pub run_migrations: bool,
}

impl PoolConfig {
    /// Create a new pool configuration with the service defaults
    pub fn new(connection: ConnectionSettings) -> Self {
        Self {
            connection,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
            max_lifetime: Duration::from_secs(DEFAULT_MAX_LIFETIME_SECS),
            enable_logging: false,
            run_migrations: true,
        }
    }

    /// Enable or disable SQL logging
    pub fn enable_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Enable or disable automatic migrations
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> DbResult<()> {
        if self.connection.host.is_empty() {
            return Err(DbError::Configuration(
                "Database host cannot be empty".to_string(),
            ));
        }

        if self.connection.database.is_empty() {
            return Err(DbError::Configuration(
                "Database name cannot be empty".to_string(),
            ));
        }

        if self.max_connections == 0 {
            return Err(DbError::Configuration(
                "max_connections must be greater than 0".to_string(),
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(DbError::Configuration(format!(
                "min_connections ({}) cannot be greater than max_connections ({})",
                self.min_connections, self.max_connections
            )));
        }

        Ok(())
    }
}

/// Create a MySQL connection pool from configuration
pub async fn create_pool(config: &PoolConfig) -> DbResult<MySqlPool> {
    config.validate()?;

    info!(
        "Creating database connection pool: max={}, max_lifetime={}s, database={}",
        config.max_connections,
        config.max_lifetime.as_secs(),
        config.connection.redacted()
    );

    let mut connect_opts = config.connection.connect_options();
    if !config.enable_logging {
        connect_opts = connect_opts.disable_statement_logging();
    }

    let pool = MySqlPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect_with(connect_opts)
        .await
        .map_err(|e| DbError::Connection(format!("Failed to create pool: {}", e)))?;

    info!("Database connection pool created successfully");

    if config.run_migrations {
        run_migrations(&pool).await?;
    }

    verify_pool_health(&pool).await?;

    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &MySqlPool) -> DbResult<()> {
    info!("Running database migrations");

    sqlx::migrate!("./migrations/mysql")
        .run(pool)
        .await
        .map_err(|e| DbError::Migration(format!("Migration failed: {}", e)))?;

    info!("Database migrations completed successfully");
    Ok(())
}

/// Verify that the connection pool is healthy
pub async fn verify_pool_health(pool: &MySqlPool) -> DbResult<()> {
    debug!("Verifying database pool health");

    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| DbError::Connection(format!("Health check failed: {}", e)))?;

    debug!("Database pool health check passed");
    Ok(())
}

/// Gracefully close the connection pool
pub async fn close_pool(pool: MySqlPool) {
    info!("Closing database connection pool");
    pool.close().await;
    info!("Database connection pool closed");
}

/// Create an SQLite pool with the Krathong schema applied
///
/// In-memory databases live only as long as their connection, so the pool is
/// pinned to a single connection that never expires.
#[cfg(feature = "sqlite")]
pub async fn create_sqlite_pool(url: &str) -> DbResult<sqlx::SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    let connect_opts = SqliteConnectOptions::from_str(url)
        .map_err(|e| DbError::Configuration(format!("Invalid SQLite URL: {}", e)))?
        .create_if_missing(true)
        .disable_statement_logging();

    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(connect_opts)
        .await
        .map_err(|e| DbError::Connection(format!("Failed to create pool: {}", e)))?;

    sqlx::migrate!("./migrations/sqlite")
        .run(&pool)
        .await
        .map_err(|e| DbError::Migration(format!("Migration failed: {}", e)))?;

    Ok(pool)
}
