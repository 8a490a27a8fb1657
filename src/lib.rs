// Library interface for CapslockMute
// This allows tests and the binary to access the crate's functionality

pub mod config;
pub mod constants;
pub mod error;
pub mod interception;
pub mod led;
pub mod permissions;
pub mod selection;
pub mod settings;
pub mod shortcuts;
pub mod shutdown;
pub mod ui;
pub mod utils;

pub use error::CoreError;

#[cfg(target_os = "macos")]
pub use core_app::CapslockMuteCore;

#[cfg(target_os = "macos")]
mod core_app {
    use crate::config::RuntimeConfig;
    use crate::constants::RUN_LOOP_SLICE_MS;
    use crate::interception::dispatch::CgEventPoster;
    use crate::interception::event_tap::MacEventTapInstaller;
    use crate::interception::{GestureEngine, InputEventInterceptor, ShortcutDispatcher};
    use crate::led::{DetachedLauncher, HelperLocator, LedController};
    use crate::permissions::accessibility::AccessibilityTrust;
    use crate::permissions::run_loop_timer::RunLoopScheduler;
    use crate::permissions::{GateStatus, PermissionGate};
    use crate::settings::{Settings, TomlFileBackend};
    use crate::shutdown::{run_until_shutdown, ShutdownFlag};
    use crate::ui::DesktopNotifier;
    use anyhow::{Context, Result};
    use core_foundation::runloop::{kCFRunLoopDefaultMode, CFRunLoop, CFRunLoopRunResult};
    use log::{info, warn};
    use std::thread;
    use std::time::Duration;

    /// Core CapslockMute functionality wired to the real macOS backends
    pub struct CapslockMuteCore {
        interceptor: InputEventInterceptor,
    }

    impl CapslockMuteCore {
        pub fn new(config: &RuntimeConfig) -> Result<Self> {
            let backend = TomlFileBackend::open_default().context("Failed to locate settings")?;
            info!("Settings file: {}", backend.path().display());

            let led = LedController::new(
                HelperLocator::for_current_exe(config.led_helper.clone()),
                DetachedLauncher,
            );
            let engine = GestureEngine::new(
                config.proxy_keycode,
                config.double_press_threshold,
                led,
                ShortcutDispatcher::new(CgEventPoster),
                Settings::new(backend),
            );
            let gate = PermissionGate::new(
                AccessibilityTrust,
                RunLoopScheduler,
                DesktopNotifier,
                config.permission_poll_interval,
            );

            Ok(Self {
                interceptor: InputEventInterceptor::new(engine, gate, MacEventTapInstaller),
            })
        }

        /// Must be called on the thread that runs the main run loop
        pub fn start(&self) -> GateStatus {
            self.interceptor.start()
        }

        pub fn stop(&self) {
            self.interceptor.stop();
        }

        pub fn is_running(&self) -> bool {
            self.interceptor.is_running()
        }

        pub fn permission_status(&self) -> GateStatus {
            self.interceptor.gate().status()
        }

        /// Start, drive the current run loop until `shutdown` is requested,
        /// then tear the tap and any permission poll down
        pub fn run(&self, shutdown: &ShutdownFlag) {
            match self.start() {
                GateStatus::Active => info!("CapslockMute is running - press Ctrl+C to quit"),
                status => info!(
                    "CapslockMute is waiting for accessibility permission ({:?})",
                    status
                ),
            }

            let slice = Duration::from_millis(RUN_LOOP_SLICE_MS);
            run_until_shutdown(shutdown, || self.run_slice(slice));

            self.stop();
            info!("Event tap and permission poll torn down");
        }

        fn run_slice(&self, slice: Duration) {
            let result = unsafe { CFRunLoop::run_in_mode(kCFRunLoopDefaultMode, slice, false) };

            // Nothing is attached only when permission is granted but the
            // tap could not be installed
            if matches!(result, CFRunLoopRunResult::Finished) {
                thread::sleep(slice);
                if !self.is_running() && self.permission_status() == GateStatus::Active {
                    warn!("Event tap not installed, retrying");
                    self.start();
                }
            }
        }
    }
}
