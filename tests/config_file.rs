/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use assert_fs::prelude::*;
use predicates::prelude::*;
use rpinfo::{ConfigError, LogFormat, LogLevel, ServerConfig};

#[test]
fn test_load_full_config() {
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.child("rpinfo.toml");
    file.write_str(
        r#"
host = "0.0.0.0"
port = 9090
auth = true
token = "s3cret"
metrics = true
redoc = true
log_format = "json"
log_level = "warn"
"#,
    )
    .unwrap();

    let config = ServerConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(config.bind_address(), "0.0.0.0:9090");
    assert!(config.auth && config.metrics && config.redoc);
    assert_eq!(config.token, "s3cret");
    assert_eq!(config.log_format, LogFormat::Json);
    assert_eq!(config.log_level, LogLevel::Warn);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_config_uses_defaults() {
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.child("rpinfo.toml");
    file.write_str("metrics = true\n").unwrap();

    let config = ServerConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(
        config,
        ServerConfig {
            metrics: true,
            ..ServerConfig::default()
        }
    );
}

#[test]
fn test_auth_without_token_fails_validation() {
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.child("rpinfo.toml");
    file.write_str("auth = true\n").unwrap();

    let config = ServerConfig::from_toml_file(file.path()).unwrap();
    assert!(matches!(config.validate(), Err(ConfigError::MissingToken)));
}

#[test]
fn test_errors_name_the_file() {
    let dir = assert_fs::TempDir::new().unwrap();

    let missing = dir.child("missing.toml");
    missing.assert(predicate::path::missing());
    let err = ServerConfig::from_toml_file(missing.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(predicate::str::contains("missing.toml").eval(&err.to_string()));

    let bad = dir.child("bad.toml");
    bad.write_str("log_level = \"verbose\"\n").unwrap();
    let err = ServerConfig::from_toml_file(bad.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(predicate::str::contains("bad.toml").eval(&err.to_string()));

    let unknown = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    std::fs::write(unknown.path(), "listen = \"localhost\"\n").unwrap();
    assert!(matches!(
        ServerConfig::from_toml_file(unknown.path()),
        Err(ConfigError::Parse { .. })
    ));
}
