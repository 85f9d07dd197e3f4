//! Database connection manager backed by the shared SQLite pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use timebook_common::storage::{HealthStatus, SqliteConnection, SqlitePool, SqlitePoolConfig};
use timebook_domain::{Result, TimebookError};
use tracing::info;

use crate::errors::{map_storage_error, InfraError};

const SCHEMA_VERSION: i32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Database manager that wraps an [`SqlitePool`].
pub struct DbManager {
    pool: Arc<SqlitePool>,
    path: PathBuf,
}

impl DbManager {
    /// Open the database at `db_path` with up to `pool_size` connections.
    pub fn new<P: AsRef<Path>>(db_path: P, pool_size: u32) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();
        let config = SqlitePoolConfig::with_max_size(pool_size);
        let pool = SqlitePool::new(&path, config).map_err(map_storage_error)?;

        info!(
            db_path = %path.display(),
            max_connections = pool.metrics().max_pool_size(),
            "sqlite pool initialised"
        );

        Ok(Self { pool: Arc::new(pool), path })
    }

    /// Borrow the underlying pool.
    pub fn pool(&self) -> &Arc<SqlitePool> {
        &self.pool
    }

    /// Acquire a connection from the pool.
    pub fn get_connection(&self) -> Result<SqliteConnection> {
        self.pool.get_connection().map_err(map_storage_error)
    }

    /// Ensure the full schema exists on the current database.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.execute_batch(SCHEMA_SQL).map_err(|e| TimebookError::from(InfraError::from(e)))?;
        conn.execute(
            "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, CAST(strftime('%s','now') AS INTEGER) * 1000)",
            &[&SCHEMA_VERSION],
        )
        .map_err(map_storage_error)?;

        info!(version = SCHEMA_VERSION, "schema ready");
        Ok(())
    }

    /// Return the configured database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Probe the database with a trivial query.
    pub fn health_check(&self) -> HealthStatus {
        self.pool.health_check()
    }
}
