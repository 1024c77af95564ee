//! Configuration loading tests

use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use verdant_common::config::VerdantConfig;

#[test]
#[serial]
fn load_without_file_uses_defaults() {
    std::env::remove_var("VERDANT_CONFIG");
    let config = VerdantConfig::load(None).unwrap();
    assert_eq!(config.cycle_period_secs, 30);
    assert_eq!(config.source_timeout_secs, 10);
}

#[test]
#[serial]
fn load_from_explicit_path() {
    std::env::remove_var("VERDANT_CONFIG");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"
port = 9191
device_id = "test-device"
upload_endpoint = "http://localhost:7000/upload"
"#
    )
    .unwrap();

    let config = VerdantConfig::load(Some(&path)).unwrap();
    assert_eq!(config.port, 9191);
    assert_eq!(config.device_id, "test-device");
    assert_eq!(
        config.upload_endpoint.as_deref(),
        Some("http://localhost:7000/upload")
    );
}

#[test]
#[serial]
fn load_from_env_var_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "cycle_period_secs = 7\n").unwrap();

    std::env::set_var("VERDANT_CONFIG", &path);
    let config = VerdantConfig::load(None).unwrap();
    std::env::remove_var("VERDANT_CONFIG");

    assert_eq!(config.cycle_period_secs, 7);
}

#[test]
#[serial]
fn missing_explicit_file_is_an_error() {
    std::env::remove_var("VERDANT_CONFIG");
    let path = PathBuf::from("/nonexistent/verdant/config.toml");
    assert!(VerdantConfig::load(Some(&path)).is_err());
}

#[test]
#[serial]
fn malformed_toml_is_an_error() {
    std::env::remove_var("VERDANT_CONFIG");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = \"not a number\"\n").unwrap();
    assert!(VerdantConfig::load(Some(&path)).is_err());
}
