// Tests for configuration loading and the shared config cell

use std::fs;

use ableton_presence::config::{AppConfig, EmptyStatus, SharedConfig};
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = AppConfig::default();

    assert_eq!(config.app_label, "Ableton Live 12");
    assert_eq!(config.custom_status, "Making music");
    assert_eq!(config.poll_interval().as_secs(), 15);
    assert_eq!(config.idle_reset_threshold(), chrono::Duration::hours(2));
    assert!(!config.app_id.is_empty());
}

#[test]
fn test_partial_yaml_keeps_defaults() {
    let config = AppConfig::from_yaml("custom_status: Mixing\npoll_interval_secs: 5\n").unwrap();

    assert_eq!(config.custom_status, "Mixing");
    assert_eq!(config.poll_interval_secs, 5);
    assert_eq!(config.app_label, AppConfig::default().app_label);
}

#[test]
fn test_empty_yaml_is_default() {
    assert_eq!(AppConfig::from_yaml("   \n").unwrap(), AppConfig::default());
}

#[test]
fn test_zero_interval_rejected() {
    assert!(AppConfig::from_yaml("poll_interval_secs: 0").is_err());
}

#[test]
fn test_zero_probe_timeout_rejected() {
    assert!(AppConfig::from_yaml("probe_timeout_secs: 0").is_err());
}

#[test]
fn test_unrepresentable_idle_reset_rejected() {
    // Too large for chrono's millisecond range
    assert!(AppConfig::from_yaml("idle_reset_secs: 10000000000000000").is_err());
    // Does not fit in i64
    assert!(AppConfig::from_yaml("idle_reset_secs: 18446744073709551615").is_err());
}

#[test]
fn test_large_idle_reset_accepted() {
    let config = AppConfig::from_yaml("idle_reset_secs: 31536000").unwrap();

    assert_eq!(config.idle_reset_threshold(), chrono::Duration::days(365));
}

#[test]
fn test_threshold_saturates_on_unvalidated_value() {
    let config = AppConfig {
        idle_reset_secs: u64::MAX,
        ..AppConfig::default()
    };

    assert_eq!(config.idle_reset_threshold(), chrono::Duration::MAX);
    assert!(config.idle_reset_threshold() > chrono::Duration::zero());
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.yml");

    let config = AppConfig::load(Some(path.to_str().unwrap())).unwrap();

    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_load_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yml");
    fs::write(&path, "app_label: Ableton Live 11\nidle_reset_secs: 600\n").unwrap();

    let config = AppConfig::load(Some(path.to_str().unwrap())).unwrap();

    assert_eq!(config.app_label, "Ableton Live 11");
    assert_eq!(config.idle_reset_threshold(), chrono::Duration::minutes(10));
}

#[test]
fn test_load_malformed_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yml");
    fs::write(&path, "poll_interval_secs: [not, a, number]\n").unwrap();

    assert!(AppConfig::load(Some(path.to_str().unwrap())).is_err());
}

#[tokio::test]
async fn test_set_custom_status_trims() {
    let shared = SharedConfig::new(AppConfig::default());

    let stored = shared.set_custom_status("   hello world  ").await.unwrap();

    assert_eq!(stored, "hello world");
    assert_eq!(shared.custom_status().await, "hello world");
    assert_eq!(shared.snapshot().await.custom_status, "hello world");
}

#[tokio::test]
async fn test_set_custom_status_rejects_blank() {
    let shared = SharedConfig::new(AppConfig::default());

    assert_eq!(shared.set_custom_status("   ").await, Err(EmptyStatus));
    assert_eq!(shared.custom_status().await, "Making music");
}

#[tokio::test]
async fn test_clones_share_state() {
    let shared = SharedConfig::new(AppConfig::default());
    let writer = shared.clone();

    writer.set_custom_status("Sound design").await.unwrap();

    assert_eq!(shared.custom_status().await, "Sound design");
}
