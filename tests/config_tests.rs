//! Tests for environment-driven configuration.
//!
//! These mutate process environment variables, so they run serially.

use serial_test::serial;

use shiptrack::config::{Config, MAX_DISPLAY_PRECISION, MIN_AVERAGE_SPEED_KMH};

const VARS: &[&str] = &[
    "SHIPTRACK_HOST",
    "SHIPTRACK_PORT",
    "SHIPTRACK_DISPLAY_PRECISION",
    "SHIPTRACK_AVERAGE_SPEED_KMH",
    "SHIPTRACK_REQUEST_TIMEOUT_SECS",
    "SHIPTRACK_ALLOW_SEED",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn defaults_apply_without_environment() {
    clear_env();
    let config = Config::from_env().unwrap();

    assert_eq!(config.port, 5000);
    assert_eq!(config.display_precision, 2);
    assert_eq!(config.average_speed_kmh, 60.0);
    assert!(!config.allow_seed);
    assert_eq!(config.socket_addr().unwrap().port(), 5000);
}

#[test]
#[serial]
fn environment_overrides_defaults() {
    clear_env();
    std::env::set_var("SHIPTRACK_PORT", "8081");
    std::env::set_var("SHIPTRACK_ALLOW_SEED", "true");
    std::env::set_var("SHIPTRACK_AVERAGE_SPEED_KMH", "45.5");

    let config = Config::from_env();
    clear_env();
    let config = config.unwrap();

    assert_eq!(config.port, 8081);
    assert!(config.allow_seed);
    assert_eq!(config.average_speed_kmh, 45.5);
}

#[test]
#[serial]
fn display_precision_is_clamped() {
    clear_env();
    std::env::set_var("SHIPTRACK_DISPLAY_PRECISION", "12");

    let config = Config::from_env();
    clear_env();
    assert_eq!(config.unwrap().display_precision, MAX_DISPLAY_PRECISION);
}

#[test]
#[serial]
fn invalid_port_returns_error() {
    clear_env();
    std::env::set_var("SHIPTRACK_PORT", "not_a_number");

    let result = std::panic::catch_unwind(Config::from_env);
    clear_env();

    assert!(result.is_ok(), "Config::from_env must not panic on invalid port");
    assert!(result.unwrap().is_err());
}

#[test]
#[serial]
fn non_positive_speed_is_rejected() {
    clear_env();
    std::env::set_var("SHIPTRACK_AVERAGE_SPEED_KMH", "0");

    let result = Config::from_env();
    clear_env();
    let err = result.unwrap_err();
    assert!(err.to_string().contains("average_speed_kmh"));
}

#[test]
#[serial]
fn speed_below_minimum_is_rejected() {
    clear_env();
    std::env::set_var("SHIPTRACK_AVERAGE_SPEED_KMH", "1e-12");

    let result = Config::from_env();
    clear_env();
    let err = result.unwrap_err();
    assert!(err.to_string().contains("average_speed_kmh"));

    std::env::set_var("SHIPTRACK_AVERAGE_SPEED_KMH", "0.1");
    let result = Config::from_env();
    clear_env();
    assert_eq!(result.unwrap().average_speed_kmh, MIN_AVERAGE_SPEED_KMH);
}

#[test]
#[serial]
fn zero_timeout_is_rejected() {
    clear_env();
    std::env::set_var("SHIPTRACK_REQUEST_TIMEOUT_SECS", "0");

    let result = Config::from_env();
    clear_env();
    assert!(result.is_err());
}
