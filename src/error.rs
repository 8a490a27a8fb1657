//! Error taxonomy for the interception core
//!
//! None of these are fatal to the process. Callers log them and degrade:
//! the interceptor waits for permission or retries on the next start, and
//! the LED and shortcut paths are best-effort.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Accessibility trust has not been granted to this process
    #[error("accessibility permission has not been granted")]
    PermissionDenied,

    /// The system refused to create or register the event tap
    #[error("failed to install event tap: {0}")]
    HookInstallFailed(String),

    /// No LED helper binary exists at any of the searched locations
    #[error("LED helper `{name}` not found (searched: {searched})")]
    HelperNotFound { name: String, searched: String },

    /// The LED helper exists but could not be spawned
    #[error("failed to launch LED helper {}: {reason}", .path.display())]
    HelperLaunchFailed { path: PathBuf, reason: String },

    /// A synthetic keyboard event could not be created
    #[error("failed to create synthetic key event for keycode {keycode}")]
    SyntheticEventFailed { keycode: u16 },

    #[error("unknown shortcut identifier `{0}`")]
    UnknownShortcut(String),
}
