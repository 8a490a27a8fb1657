//! Runtime configuration for CapslockMute
//!
//! Built-in defaults come from the constants module. Environment variables
//! (all optional) override them, and command-line flags override both:
//! - CAPSLOCK_MUTE_DOUBLE_PRESS_MS: double-press window in milliseconds
//! - CAPSLOCK_MUTE_PROXY_KEYCODE: proxy keycode, decimal or 0x-prefixed hex
//! - CAPSLOCK_MUTE_LED_HELPER: explicit path to the keyboard-leds helper

use crate::constants::{
    DEFAULT_PROXY_KEYCODE, DOUBLE_PRESS_DEFAULT_MS, DOUBLE_PRESS_MAX_MS, DOUBLE_PRESS_MIN_MS,
    MAX_PROXY_KEYCODE, PERMISSION_POLL_INTERVAL_SECS,
};
use crate::utils::keycode::describe_keycode;
use log::{debug, info, warn};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DOUBLE_PRESS_ENV: &str = "CAPSLOCK_MUTE_DOUBLE_PRESS_MS";
pub const PROXY_KEYCODE_ENV: &str = "CAPSLOCK_MUTE_PROXY_KEYCODE";
pub const LED_HELPER_ENV: &str = "CAPSLOCK_MUTE_LED_HELPER";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub proxy_keycode: i64,
    pub double_press_threshold: Duration,
    pub permission_poll_interval: Duration,
    /// Searched before the bundle locations
    pub led_helper: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            proxy_keycode: DEFAULT_PROXY_KEYCODE,
            double_press_threshold: Duration::from_millis(DOUBLE_PRESS_DEFAULT_MS),
            permission_poll_interval: Duration::from_secs(PERMISSION_POLL_INTERVAL_SECS),
            led_helper: None,
        }
    }
}

impl RuntimeConfig {
    /// Defaults with any valid environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(ms) = parse_double_press_ms() {
            config.double_press_threshold = Duration::from_millis(ms);
        }
        if let Some(keycode) = parse_proxy_keycode() {
            config.proxy_keycode = keycode;
        }
        config.led_helper = parse_led_helper();
        config
    }
}

/// Accept a double-press window inside the supported range
pub fn validate_double_press_ms(ms: u64) -> Option<u64> {
    (DOUBLE_PRESS_MIN_MS..=DOUBLE_PRESS_MAX_MS)
        .contains(&ms)
        .then_some(ms)
}

/// Parse a keycode written as decimal or `0x` hex
pub fn parse_keycode(text: &str) -> Option<i64> {
    let text = text.trim();
    let keycode = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => text.parse::<i64>().ok()?,
    };

    (0..=MAX_PROXY_KEYCODE).contains(&keycode).then_some(keycode)
}

/// Parse the CAPSLOCK_MUTE_DOUBLE_PRESS_MS environment variable
///
/// Returns Some(ms) if within 100-1000 ms, None if unset or invalid
pub fn parse_double_press_ms() -> Option<u64> {
    match env::var(DOUBLE_PRESS_ENV) {
        Ok(val) => match val.trim().parse::<u64>() {
            Ok(ms) => match validate_double_press_ms(ms) {
                Some(ms) => {
                    info!("Double-press window set via environment variable: {}ms", ms);
                    Some(ms)
                }
                None => {
                    warn!(
                        "Invalid double-press window: {}ms (must be {}-{}). Using default.",
                        ms, DOUBLE_PRESS_MIN_MS, DOUBLE_PRESS_MAX_MS
                    );
                    None
                }
            },
            Err(e) => {
                warn!("Failed to parse {}: {}. Using default.", DOUBLE_PRESS_ENV, e);
                None
            }
        },
        Err(_) => {
            debug!("{} not set.", DOUBLE_PRESS_ENV);
            None
        }
    }
}

/// Parse the CAPSLOCK_MUTE_PROXY_KEYCODE environment variable
pub fn parse_proxy_keycode() -> Option<i64> {
    match env::var(PROXY_KEYCODE_ENV) {
        Ok(val) => match parse_keycode(&val) {
            Some(keycode) => {
                info!(
                    "Proxy key set via environment variable: {}",
                    describe_keycode(keycode)
                );
                Some(keycode)
            }
            None => {
                warn!(
                    "Invalid proxy keycode: {:?} (must be 0-{}). Using default.",
                    val, MAX_PROXY_KEYCODE
                );
                None
            }
        },
        Err(_) => {
            debug!("{} not set.", PROXY_KEYCODE_ENV);
            None
        }
    }
}

/// Parse the CAPSLOCK_MUTE_LED_HELPER environment variable
pub fn parse_led_helper() -> Option<PathBuf> {
    match env::var_os(LED_HELPER_ENV) {
        Some(val) if !val.is_empty() => {
            let path = PathBuf::from(val);
            info!("LED helper override: {}", path.display());
            Some(path)
        }
        Some(_) => {
            warn!("{} is set but empty. Ignoring.", LED_HELPER_ENV);
            None
        }
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.proxy_keycode, 0x4F);
        assert_eq!(config.double_press_threshold, Duration::from_millis(300));
        assert_eq!(config.permission_poll_interval, Duration::from_secs(2));
        assert_eq!(config.led_helper, None);
    }

    #[test]
    fn test_validate_double_press_ms_bounds() {
        assert_eq!(validate_double_press_ms(100), Some(100));
        assert_eq!(validate_double_press_ms(1000), Some(1000));
        assert_eq!(validate_double_press_ms(99), None);
        assert_eq!(validate_double_press_ms(1001), None);
        assert_eq!(validate_double_press_ms(0), None);
    }

    #[test]
    fn test_parse_keycode_decimal_and_hex() {
        assert_eq!(parse_keycode("79"), Some(79));
        assert_eq!(parse_keycode("0x4F"), Some(79));
        assert_eq!(parse_keycode("0x4f"), Some(79));
        assert_eq!(parse_keycode(" 0X50 "), Some(80));
        assert_eq!(parse_keycode("0"), Some(0));
        assert_eq!(parse_keycode("127"), Some(127));
    }

    #[test]
    fn test_parse_keycode_rejects_invalid() {
        assert_eq!(parse_keycode("128"), None);
        assert_eq!(parse_keycode("-1"), None);
        assert_eq!(parse_keycode("0x"), None);
        assert_eq!(parse_keycode("F18"), None);
        assert_eq!(parse_keycode(""), None);
    }

    // Environment variables are process-wide, so every env case lives in
    // this one test.
    #[test]
    fn test_from_env_overrides() {
        env::set_var(DOUBLE_PRESS_ENV, "450");
        env::set_var(PROXY_KEYCODE_ENV, "0x50");
        env::set_var(LED_HELPER_ENV, "/opt/keyboard-leds");

        let config = RuntimeConfig::from_env();
        assert_eq!(config.double_press_threshold, Duration::from_millis(450));
        assert_eq!(config.proxy_keycode, 0x50);
        assert_eq!(config.led_helper, Some(PathBuf::from("/opt/keyboard-leds")));

        // Out of range and malformed values fall back to defaults
        env::set_var(DOUBLE_PRESS_ENV, "5000");
        env::set_var(PROXY_KEYCODE_ENV, "banana");
        env::set_var(LED_HELPER_ENV, "");

        let config = RuntimeConfig::from_env();
        assert_eq!(config, RuntimeConfig::default());

        env::remove_var(DOUBLE_PRESS_ENV);
        env::remove_var(PROXY_KEYCODE_ENV);
        env::remove_var(LED_HELPER_ENV);

        assert_eq!(RuntimeConfig::from_env(), RuntimeConfig::default());
    }
}
