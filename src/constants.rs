//! Centralized constants for CapslockMute
//!
//! This module contains the numerical values and fixed names used throughout
//! the application. Each constant documents its purpose, unit, and
//! recommended value range.

// ============================================================================
// GESTURE TIMING
// ============================================================================

/// Window in which a second proxy key press counts as a double press.
/// Unit: milliseconds
/// Recommended range: 200-500 (shorter feels twitchy, longer delays singles)
pub const DOUBLE_PRESS_DEFAULT_MS: u64 = 300;

/// Minimum double-press window accepted from configuration.
/// Unit: milliseconds
pub const DOUBLE_PRESS_MIN_MS: u64 = 100;

/// Maximum double-press window accepted from configuration.
/// Unit: milliseconds
pub const DOUBLE_PRESS_MAX_MS: u64 = 1000;

// ============================================================================
// PERMISSION POLLING
// ============================================================================

/// Interval between accessibility trust checks while permission is missing.
/// Unit: seconds
/// Recommended range: 1-5 (the user is actively flipping the switch)
pub const PERMISSION_POLL_INTERVAL_SECS: u64 = 2;

/// Longest time the main loop runs before checking for shutdown.
/// Unit: milliseconds
/// Recommended range: 100-1000 (bounds Ctrl+C latency)
pub const RUN_LOOP_SLICE_MS: u64 = 500;

// ============================================================================
// PROXY KEY
// ============================================================================

/// Default proxy keycode: F18, the key Caps Lock is remapped to via hidutil.
/// Unit: macOS virtual keycode
pub const DEFAULT_PROXY_KEYCODE: i64 = 0x4F;

/// Highest virtual keycode accepted as a proxy key.
/// Unit: macOS virtual keycode
pub const MAX_PROXY_KEYCODE: i64 = 127;

// ============================================================================
// LED HELPER
// ============================================================================

/// File name of the bundled helper that drives the Caps Lock LED.
pub const LED_HELPER_NAME: &str = "keyboard-leds";

/// Helper argument that turns the LED on.
pub const LED_HELPER_ARG_ON: &str = "-c1";

/// Helper argument that turns the LED off.
pub const LED_HELPER_ARG_OFF: &str = "-c0";

// ============================================================================
// SETTINGS FILE
// ============================================================================

/// Directory created under the platform config dir.
pub const SETTINGS_DIR_NAME: &str = "capslock-mute";

/// Settings file name inside SETTINGS_DIR_NAME.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

// ============================================================================
// NOTIFICATIONS
// ============================================================================

/// Banner display duration.
/// Unit: milliseconds
/// Recommended range: 3000-8000
pub const NOTIFICATION_TIMEOUT_MS: u32 = 5000;

/// System Settings pane for granting accessibility access.
pub const ACCESSIBILITY_SETTINGS_URL: &str =
    "x-apple.systempreferences:com.apple.preference.security?Privacy_Accessibility";
