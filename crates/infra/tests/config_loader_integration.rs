//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use tempfile::{NamedTempFile, TempDir};
use timebook_infra::config;
use timebook_infra::database::DbManager;

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "server": {
            "bind_address": "0.0.0.0:8080",
            "cors_origins": ["https://timebook.example.com"]
        },
        "database": {
            "path": "/tmp/integration_test.db",
            "pool_size": 10
        },
        "auth": {
            "jwt_secret": "integration-secret",
            "token_ttl_seconds": 7200,
            "bootstrap_admin": {
                "username": "admin",
                "password": "changeme",
                "email": "admin@example.com",
                "first_name": "Site"
            }
        },
        "logging": {
            "level": "timebook=debug,info",
            "json": true
        }
    }"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(json_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("json");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(&path).ok();

    let config = result.expect("Failed to load config from JSON file");
    config::validate(&config).expect("loaded config should be valid");

    assert_eq!(config.server.cors_origins, vec!["https://timebook.example.com".to_string()]);
    assert_eq!(config.database.pool_size, 10);
    assert_eq!(config.auth.token_ttl_seconds, 7200);
    assert!(config.logging.json);

    let admin = config.auth.bootstrap_admin.expect("bootstrap admin present");
    assert_eq!(admin.first_name, "Site");
    assert!(admin.last_name.is_empty());
}

#[test]
fn test_loaded_config_opens_database() {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("configured.db");
    let toml_content = format!(
        "[database]\npath = {path:?}\npool_size = 2\n\n[auth]\njwt_secret = \"s\"\n",
        path = db_path.display().to_string()
    );

    let config_path = temp_dir.path().join("timebook.toml");
    std::fs::write(&config_path, toml_content).expect("config written");

    let config = config::load_from_file(Some(config_path)).expect("config loads");
    let manager = DbManager::new(&config.database.path, config.database.pool_size)
        .expect("database opens");
    manager.run_migrations().expect("migrations apply");

    assert!(manager.health_check().healthy);
    assert_eq!(manager.path(), db_path.as_path());
}
