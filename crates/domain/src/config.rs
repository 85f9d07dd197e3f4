//! Configuration management

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_DB_PATH, DEFAULT_DB_POOL_SIZE, DEFAULT_LOG_LEVEL,
    DEFAULT_TOKEN_TTL_SECONDS,
};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Allowed CORS origins; empty means same-origin only.
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

/// Authentication configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret for signing tokens. Required at startup.
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub token_ttl_seconds: u64,
    /// Admin account created when the user table is empty.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// First administrator account
#[derive(Clone, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_address: DEFAULT_BIND_ADDRESS.to_string(), cors_origins: Vec::new() }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: DEFAULT_DB_PATH.to_string(), pool_size: DEFAULT_DB_POOL_SIZE }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            bootstrap_admin: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), json: false }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("bootstrap_admin", &self.bootstrap_admin)
            .finish()
    }
}

impl fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secrets() {
        let auth = AuthConfig {
            jwt_secret: "super-secret".into(),
            bootstrap_admin: Some(BootstrapAdmin {
                username: "admin".into(),
                password: "hunter2".into(),
                email: "admin@example.com".into(),
                first_name: String::new(),
                last_name: String::new(),
            }),
            ..AuthConfig::default()
        };

        let debug = format!("{auth:?}");
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("admin@example.com"));
    }

    #[test]
    fn secrets_are_never_serialized() {
        let config = Config {
            auth: AuthConfig { jwt_secret: "super-secret".into(), ..AuthConfig::default() },
            ..Config::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret"));
    }

    #[test]
    fn partial_sections_fall_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"database": {"path": "x.db"}}"#).unwrap();
        assert_eq!(config.database.path, "x.db");
        assert_eq!(config.database.pool_size, DEFAULT_DB_POOL_SIZE);
        assert_eq!(config.auth.token_ttl_seconds, DEFAULT_TOKEN_TTL_SECONDS);
        assert_eq!(config.server.bind_address, DEFAULT_BIND_ADDRESS);
    }
}
