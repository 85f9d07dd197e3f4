//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. An explicit path (`--config` or `TIMEBOOK_CONFIG`) always wins
//! 2. Otherwise, attempts to load from environment variables
//! 3. If the required variables are missing, falls back to a probed file
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `TIMEBOOK_DB_PATH`: Database file path (required)
//! - `TIMEBOOK_JWT_SECRET`: Token signing secret (required)
//! - `TIMEBOOK_DB_POOL_SIZE`: Connection pool size
//! - `TIMEBOOK_BIND_ADDRESS`: Listen address, e.g. `0.0.0.0:8080`
//! - `TIMEBOOK_CORS_ORIGINS`: Comma-separated allowed origins
//! - `TIMEBOOK_TOKEN_TTL_SECONDS`: Token lifetime
//! - `TIMEBOOK_LOG_LEVEL`: Default log filter
//! - `TIMEBOOK_LOG_JSON`: Emit JSON logs (true/false)
//! - `TIMEBOOK_ADMIN_USERNAME`, `TIMEBOOK_ADMIN_PASSWORD`,
//!   `TIMEBOOK_ADMIN_EMAIL`: First administrator, created on an empty
//!   database
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.{json,toml}` or `./timebook.{json,toml}`
//! 2. `../config.{json,toml}` and `../../config.{json,toml}`
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use timebook_domain::constants::MAX_TOKEN_TTL_SECONDS;
use timebook_domain::{
    AuthConfig, BootstrapAdmin, Config, DatabaseConfig, LoggingConfig, Result, ServerConfig,
    TimebookError,
};

const CONFIG_PATH_VAR: &str = "TIMEBOOK_CONFIG";

/// Load configuration with automatic fallback strategy
///
/// `explicit` (or `TIMEBOOK_CONFIG`) names a file to load directly.
/// Otherwise environment variables are tried first, then a probed file.
///
/// # Errors
/// Returns `TimebookError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The loaded configuration fails [`validate`]
pub fn load(explicit: Option<PathBuf>) -> Result<Config> {
    let explicit = explicit.or_else(|| std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from));

    let config = match explicit {
        Some(path) => load_from_file(Some(path))?,
        None => match load_from_env() {
            Ok(config) => {
                tracing::info!("Configuration loaded from environment variables");
                config
            }
            Err(e) => {
                tracing::debug!(error = %e, "Failed to load from environment, trying file");
                load_from_file(None)?
            }
        },
    };

    validate(&config)?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// `TIMEBOOK_DB_PATH` and `TIMEBOOK_JWT_SECRET` must be present; every
/// other variable falls back to its default.
///
/// # Errors
/// Returns `TimebookError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let defaults = Config::default();

    let database = DatabaseConfig {
        path: env_var("TIMEBOOK_DB_PATH")?,
        pool_size: env_parse("TIMEBOOK_DB_POOL_SIZE", defaults.database.pool_size)?,
    };

    let server = ServerConfig {
        bind_address: std::env::var("TIMEBOOK_BIND_ADDRESS")
            .unwrap_or(defaults.server.bind_address),
        cors_origins: std::env::var("TIMEBOOK_CORS_ORIGINS")
            .map(|raw| split_list(&raw))
            .unwrap_or(defaults.server.cors_origins),
    };

    let auth = AuthConfig {
        jwt_secret: env_var("TIMEBOOK_JWT_SECRET")?,
        token_ttl_seconds: env_parse(
            "TIMEBOOK_TOKEN_TTL_SECONDS",
            defaults.auth.token_ttl_seconds,
        )?,
        bootstrap_admin: bootstrap_admin_from_env(),
    };

    let logging = LoggingConfig {
        level: std::env::var("TIMEBOOK_LOG_LEVEL").unwrap_or(defaults.logging.level),
        json: env_bool("TIMEBOOK_LOG_JSON", defaults.logging.json),
    };

    Ok(Config { server, database, auth, logging })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `TimebookError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TimebookError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TimebookError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| TimebookError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Reject configurations the server cannot start with.
///
/// # Errors
/// Returns `TimebookError::Config` naming the first problem found.
pub fn validate(config: &Config) -> Result<()> {
    if config.auth.jwt_secret.trim().is_empty() {
        return Err(TimebookError::Config("auth.jwt_secret must be set".to_string()));
    }
    if config.database.path.trim().is_empty() {
        return Err(TimebookError::Config("database.path must be set".to_string()));
    }
    if config.database.pool_size == 0 {
        return Err(TimebookError::Config("database.pool_size must be positive".to_string()));
    }
    if config.auth.token_ttl_seconds == 0 {
        return Err(TimebookError::Config(
            "auth.token_ttl_seconds must be positive".to_string(),
        ));
    }
    if config.auth.token_ttl_seconds > MAX_TOKEN_TTL_SECONDS {
        return Err(TimebookError::Config(format!(
            "auth.token_ttl_seconds must not exceed {MAX_TOKEN_TTL_SECONDS}"
        )));
    }
    if let Some(admin) = &config.auth.bootstrap_admin {
        if admin.username.trim().is_empty() || admin.password.is_empty() {
            return Err(TimebookError::Config(
                "auth.bootstrap_admin needs a username and a password".to_string(),
            ));
        }
    }
    Ok(())
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| TimebookError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TimebookError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(TimebookError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Returns the first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots.iter().flat_map(|root| candidates(root)).find(|path| path.exists())
}

fn candidates(root: &Path) -> Vec<PathBuf> {
    vec![
        root.join("config.json"),
        root.join("config.toml"),
        root.join("timebook.json"),
        root.join("timebook.toml"),
        root.join("../config.json"),
        root.join("../config.toml"),
        root.join("../../config.json"),
        root.join("../../config.toml"),
    ]
}

fn bootstrap_admin_from_env() -> Option<BootstrapAdmin> {
    let username = std::env::var("TIMEBOOK_ADMIN_USERNAME").ok()?;
    let password = std::env::var("TIMEBOOK_ADMIN_PASSWORD").ok()?;

    Some(BootstrapAdmin {
        email: std::env::var("TIMEBOOK_ADMIN_EMAIL")
            .unwrap_or_else(|_| format!("{username}@timebook.local")),
        username,
        password,
        first_name: std::env::var("TIMEBOOK_ADMIN_FIRST_NAME").unwrap_or_default(),
        last_name: std::env::var("TIMEBOOK_ADMIN_LAST_NAME").unwrap_or_default(),
    })
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        TimebookError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional environment variable, using `default` when unset
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| TimebookError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}
