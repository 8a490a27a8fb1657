//! Caps Lock LED control through the bundled `keyboard-leds` helper
//!
//! The LED mirrors the logical mute state. Driving it is best-effort: a
//! missing or broken helper is logged and the logical state still changes.

use crate::constants::{LED_HELPER_ARG_OFF, LED_HELPER_ARG_ON, LED_HELPER_NAME};
use crate::error::CoreError;
use log::{debug, warn};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Starts the helper process without waiting for it
pub trait HelperLauncher {
    fn launch(&self, program: &Path, arg: &str) -> io::Result<()>;
}

/// Spawns the helper detached with stdio discarded; the child handle is
/// dropped immediately and its exit status is never read.
pub struct DetachedLauncher;

impl HelperLauncher for DetachedLauncher {
    fn launch(&self, program: &Path, arg: &str) -> io::Result<()> {
        Command::new(program)
            .arg(arg)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
    }
}

/// Ordered list of places the helper may live
#[derive(Debug, Clone)]
pub struct HelperLocator {
    candidates: Vec<PathBuf>,
}

impl HelperLocator {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// Search order: explicit override, `Contents/Resources`, then the
    /// directory of the running executable (`Contents/MacOS` in a bundle).
    pub fn for_current_exe(override_path: Option<PathBuf>) -> Self {
        let mut candidates: Vec<PathBuf> = override_path.into_iter().collect();

        match std::env::current_exe() {
            Ok(exe) => {
                if let Some(exe_dir) = exe.parent() {
                    if let Some(contents_dir) = exe_dir.parent() {
                        candidates.push(contents_dir.join("Resources").join(LED_HELPER_NAME));
                    }
                    candidates.push(exe_dir.join(LED_HELPER_NAME));
                }
            }
            Err(e) => warn!("Cannot determine executable location for LED helper: {}", e),
        }

        Self::new(candidates)
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First candidate that exists as a file
    pub fn locate(&self) -> Result<&Path, CoreError> {
        self.candidates
            .iter()
            .find(|path| path.is_file())
            .map(PathBuf::as_path)
            .ok_or_else(|| CoreError::HelperNotFound {
                name: LED_HELPER_NAME.to_string(),
                searched: self
                    .candidates
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Helper argument for the requested LED state
pub fn helper_arg(on: bool) -> &'static str {
    if on {
        LED_HELPER_ARG_ON
    } else {
        LED_HELPER_ARG_OFF
    }
}

/// Owns the logical LED state and pushes it to the hardware
pub struct LedController {
    is_on: bool,
    locator: HelperLocator,
    launcher: Box<dyn HelperLauncher>,
}

impl LedController {
    /// Starts in the off state; the hardware is not queried
    pub fn new(locator: HelperLocator, launcher: impl HelperLauncher + 'static) -> Self {
        Self {
            is_on: false,
            locator,
            launcher: Box::new(launcher),
        }
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn toggle(&mut self) {
        let next = !self.is_on;
        self.set_state(next);
    }

    pub fn set_state(&mut self, on: bool) {
        self.is_on = on;
        if let Err(e) = self.apply(on) {
            warn!("LED indicator not updated: {}", e);
        }
    }

    fn apply(&self, on: bool) -> Result<(), CoreError> {
        let program = self.locator.locate()?;
        let arg = helper_arg(on);

        self.launcher
            .launch(program, arg)
            .map_err(|e| CoreError::HelperLaunchFailed {
                path: program.to_path_buf(),
                reason: e.to_string(),
            })?;

        debug!("LED helper launched: {} {}", program.display(), arg);
        Ok(())
    }
}
