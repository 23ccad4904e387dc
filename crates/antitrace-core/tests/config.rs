//! Tests for environment-driven configuration

use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use antitrace_core::config::{FIELD_LINE_ENV, INTERVAL_ENV, MIN_POLL_INTERVAL, THRESHOLD_ENV};
use antitrace_core::{FieldLocator, MonitorConfig};

fn env_lock() -> &'static Mutex<()>
{
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn clear_overrides()
{
    for name in [THRESHOLD_ENV, INTERVAL_ENV, FIELD_LINE_ENV] {
        std::env::remove_var(name);
    }
}

#[test]
fn test_from_env_without_overrides_matches_default()
{
    let _guard = env_lock().lock().unwrap();
    clear_overrides();

    assert_eq!(MonitorConfig::from_env(), MonitorConfig::default());
}

#[test]
fn test_from_env_applies_overrides()
{
    let _guard = env_lock().lock().unwrap();
    clear_overrides();
    std::env::set_var(THRESHOLD_ENV, "0");
    std::env::set_var(INTERVAL_ENV, " 250 ");
    std::env::set_var(FIELD_LINE_ENV, "7");

    let config = MonitorConfig::from_env();
    clear_overrides();

    assert_eq!(config.threshold, 0);
    assert_eq!(config.interval, Duration::from_millis(250));
    assert_eq!(config.locator, FieldLocator::Line(7));
}

#[test]
fn test_from_env_ignores_garbage()
{
    let _guard = env_lock().lock().unwrap();
    clear_overrides();
    std::env::set_var(THRESHOLD_ENV, "a lot");
    std::env::set_var(INTERVAL_ENV, "-5");
    std::env::set_var(FIELD_LINE_ENV, "sixth");

    let config = MonitorConfig::from_env();
    clear_overrides();

    assert_eq!(config, MonitorConfig::default());
}

#[test]
fn test_from_env_raises_tiny_intervals_to_the_floor()
{
    let _guard = env_lock().lock().unwrap();
    clear_overrides();

    std::env::set_var(INTERVAL_ENV, "0");
    assert_eq!(MonitorConfig::from_env().interval, MIN_POLL_INTERVAL);

    std::env::set_var(INTERVAL_ENV, "1");
    assert_eq!(MonitorConfig::from_env().interval, MIN_POLL_INTERVAL);
    clear_overrides();
}
