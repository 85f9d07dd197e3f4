//! SQLite connection pool
//!
//! r2d2 pool of rusqlite connections. Every connection gets the pragmas from
//! [`SqlitePoolConfig`] when it is opened.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, info, instrument, warn};

use super::config::SqlitePoolConfig;
use super::connection::SqliteConnection;
use super::pragmas::apply_connection_pragmas;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::metrics::StorageMetrics;

/// Result of a pool health probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub healthy: bool,
    pub connections: u32,
    pub idle_connections: u32,
    pub max_connections: u32,
    pub connections_acquired: u64,
    pub connection_failures: u64,
    pub avg_connection_time_ms: u64,
    pub message: Option<String>,
}

/// Pool of SQLite connections
#[derive(Debug)]
pub struct SqlitePool {
    pool: Pool<SqliteConnectionManager>,
    config: SqlitePoolConfig,
    metrics: Arc<StorageMetrics>,
}

impl SqlitePool {
    /// Open (or create) the database at `path` and build the pool.
    ///
    /// One connection is checked out eagerly so a bad path or unreadable
    /// file fails here rather than on the first request.
    #[instrument(fields(db_path = ?path, pool_size = config.max_size))]
    pub fn new(path: &Path, config: SqlitePoolConfig) -> StorageResult<Self> {
        info!("Creating SQLite connection pool");

        let metrics = Arc::new(StorageMetrics::new(config.max_size));
        let pool_config = config.clone();

        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            apply_connection_pragmas(conn, &pool_config)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
        });

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .map_err(|e| {
                warn!(error = %e, "Failed to create connection pool");
                StorageError::Connection(format!("Failed to create pool: {e}"))
            })?;

        drop(pool.get()?);
        debug!("Initial connection verified");

        Ok(Self { pool, config, metrics })
    }

    /// Get the pool metrics
    pub fn metrics(&self) -> &Arc<StorageMetrics> {
        &self.metrics
    }

    /// Check a connection out of the pool
    #[instrument(level = "debug", skip(self), fields(pool_size = self.config.max_size))]
    pub fn get_connection(&self) -> StorageResult<SqliteConnection> {
        let start = Instant::now();

        match self.pool.get() {
            Ok(conn) => {
                let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                self.metrics.record_connection_acquired(duration_ms);
                debug!(duration_ms, "Connection acquired");
                Ok(SqliteConnection::new(conn))
            }
            Err(e) if e.to_string().to_lowercase().contains("timed out") => {
                self.metrics.record_connection_timeout();
                warn!(timeout = ?self.config.connection_timeout, "Connection timeout");
                Err(StorageError::Timeout(self.config.connection_timeout.as_secs()))
            }
            Err(e) => {
                self.metrics.record_connection_error();
                warn!(error = %e, "Connection error");
                Err(StorageError::Connection(format!("Failed to get connection: {e}")))
            }
        }
    }

    /// Probe the pool by running a trivial query.
    pub fn health_check(&self) -> HealthStatus {
        let state = self.pool.state();
        let probe = self
            .get_connection()
            .and_then(|conn| conn.query_row("SELECT 1", &[], |row| row.get::<_, i64>(0)));

        HealthStatus {
            healthy: probe.is_ok(),
            connections: state.connections,
            idle_connections: state.idle_connections,
            max_connections: self.config.max_size,
            connections_acquired: self.metrics.connections_acquired(),
            connection_failures: self.metrics.connection_failures(),
            avg_connection_time_ms: self.metrics.avg_connection_time_ms(),
            message: probe.err().map(|e| e.to_string()),
        }
    }
}
