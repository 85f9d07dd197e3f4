//! Pooled SQLite storage
//!
//! r2d2-managed rusqlite connections with per-connection pragmas, pool
//! metrics and a health probe. Schemas belong to the application crates.

pub mod config;
pub mod connection;
pub mod error;
pub mod metrics;
pub mod pool;
pub mod pragmas;

// Re-export commonly used types
pub use config::SqlitePoolConfig;
pub use connection::SqliteConnection;
pub use error::{StorageError, StorageResult};
pub use metrics::StorageMetrics;
pub use pool::{HealthStatus, SqlitePool};
pub use pragmas::apply_connection_pragmas;
