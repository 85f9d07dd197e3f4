//! Health check types for the `/health` endpoint
//!
//! Each dependency reports a [`ComponentHealth`]; the overall status is
//! healthy only when every component is.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Overall health status of the server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Overall health indicator
    pub is_healthy: bool,

    /// Individual component health checks
    pub components: Vec<ComponentHealth>,

    /// Unix timestamp when health check was performed
    pub timestamp: i64,
}

impl HealthStatus {
    /// Create a new health status with no components
    pub fn new() -> Self {
        Self { is_healthy: true, components: Vec::new(), timestamp: Utc::now().timestamp() }
    }

    /// Add a component health check to the status
    ///
    /// Returns self for method chaining
    pub fn add_component(mut self, component: ComponentHealth) -> Self {
        self.is_healthy &= component.is_healthy;
        self.components.push(component);
        self
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Health status of an individual component
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentHealth {
    /// Component identifier (e.g., "database")
    pub name: String,

    /// Whether the component is healthy
    pub is_healthy: bool,

    /// Optional message describing health state or error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Component-specific counters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ComponentHealth {
    /// Create a healthy component status
    pub fn healthy(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: true, message: None, details: None }
    }

    /// Create an unhealthy component status with a message
    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_healthy: false,
            message: Some(message.into()),
            details: None,
        }
    }

    /// Attach component-specific counters
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}
