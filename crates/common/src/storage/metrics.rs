//! Storage metrics tracking
//!
//! Lock-free counters for pool activity, reported by the pool health probe.

use std::sync::atomic::{AtomicU64, Ordering};

/// Connection pool counters
#[derive(Debug)]
pub struct StorageMetrics {
    connections_acquired: AtomicU64,
    connections_timeout: AtomicU64,
    connections_error: AtomicU64,
    total_connection_time_ms: AtomicU64,
    max_pool_size: u32,
}

impl StorageMetrics {
    /// Create a new metrics tracker
    pub fn new(max_pool_size: u32) -> Self {
        Self {
            connections_acquired: AtomicU64::new(0),
            connections_timeout: AtomicU64::new(0),
            connections_error: AtomicU64::new(0),
            total_connection_time_ms: AtomicU64::new(0),
            max_pool_size,
        }
    }

    /// Record a successful connection acquisition
    pub fn record_connection_acquired(&self, duration_ms: u64) {
        self.connections_acquired.fetch_add(1, Ordering::Relaxed);
        self.total_connection_time_ms.fetch_add(duration_ms, Ordering::Relaxed);
    }

    /// Record a connection timeout
    pub fn record_connection_timeout(&self) {
        self.connections_timeout.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a connection error
    pub fn record_connection_error(&self) {
        self.connections_error.fetch_add(1, Ordering::Relaxed);
    }

    /// Connections handed out so far
    pub fn connections_acquired(&self) -> u64 {
        self.connections_acquired.load(Ordering::Relaxed)
    }

    /// Failed acquisitions (timeouts and errors)
    pub fn connection_failures(&self) -> u64 {
        self.connections_timeout.load(Ordering::Relaxed)
            + self.connections_error.load(Ordering::Relaxed)
    }

    /// Get average connection acquisition time in milliseconds
    pub fn avg_connection_time_ms(&self) -> u64 {
        let total = self.total_connection_time_ms.load(Ordering::Relaxed);
        let count = self.connections_acquired.load(Ordering::Relaxed);
        total.checked_div(count).unwrap_or(0)
    }

    /// Get the maximum pool size
    pub fn max_pool_size(&self) -> u32 {
        self.max_pool_size
    }
}
