//! Proxy key interception and gesture dispatch
//!
//! The platform tap translates raw events into [`TapEvent`]s and hands them
//! to a [`GestureEngine`], which decides whether each event is suppressed
//! and what action a proxy key press triggers.

pub mod dispatch;
pub mod interceptor;

#[cfg(target_os = "macos")]
pub mod event_tap;

pub use dispatch::{EventPoster, ShortcutDispatcher};
pub use interceptor::{HookInstaller, InputEventInterceptor, TapHandle};

use crate::led::LedController;
use crate::settings::Settings;
use crate::utils::keycode::describe_keycode;
use log::{debug, info};
use std::time::{Duration, Instant};

/// Platform-independent view of an event delivered to the tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapEvent {
    KeyDown { keycode: i64 },
    KeyUp { keycode: i64 },
    /// The system disabled the tap (callback timeout or user input)
    TapDisabled,
    Other,
}

/// What the tap callback should do with the event it was given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    PassThrough,
    Suppress,
    /// Re-enable the tap, then pass the event through unmodified
    ReenableTap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    SinglePress,
    DoublePress,
}

/// Single/double press timing state
#[derive(Debug)]
pub struct PressClassifier {
    threshold: Duration,
    last_press: Option<Instant>,
}

impl PressClassifier {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            last_press: None,
        }
    }

    /// Classify a press at `now`
    ///
    /// A press strictly inside the window after a recorded single completes
    /// a double and clears the record. Anything else is a single and becomes
    /// the new reference point. A clock that appears to run backwards is
    /// treated as zero elapsed time.
    pub fn classify(&mut self, now: Instant) -> Gesture {
        match self.last_press {
            Some(previous) if now.saturating_duration_since(previous) < self.threshold => {
                self.last_press = None;
                Gesture::DoublePress
            }
            _ => {
                self.last_press = Some(now);
                Gesture::SinglePress
            }
        }
    }

    pub fn last_press(&self) -> Option<Instant> {
        self.last_press
    }
}

/// Gesture state machine plus the actions it drives
pub struct GestureEngine {
    proxy_keycode: i64,
    classifier: PressClassifier,
    led: LedController,
    dispatcher: ShortcutDispatcher,
    settings: Settings,
}

impl GestureEngine {
    pub fn new(
        proxy_keycode: i64,
        threshold: Duration,
        led: LedController,
        dispatcher: ShortcutDispatcher,
        settings: Settings,
    ) -> Self {
        info!(
            "Gesture engine: proxy {}, double-press window {}ms",
            describe_keycode(proxy_keycode),
            threshold.as_millis()
        );
        Self {
            proxy_keycode,
            classifier: PressClassifier::new(threshold),
            led,
            dispatcher,
            settings,
        }
    }

    /// Handle one tap event observed at `now`
    pub fn handle(&mut self, event: TapEvent, now: Instant) -> Disposition {
        match event {
            TapEvent::TapDisabled => {
                info!("Event tap was disabled by the system, re-enabling");
                Disposition::ReenableTap
            }
            TapEvent::KeyDown { keycode } if keycode == self.proxy_keycode => {
                let gesture = self.classifier.classify(now);
                self.perform(gesture);
                Disposition::Suppress
            }
            TapEvent::KeyDown { .. } | TapEvent::KeyUp { .. } | TapEvent::Other => {
                Disposition::PassThrough
            }
        }
    }

    fn perform(&mut self, gesture: Gesture) {
        debug!("Proxy key gesture: {:?}", gesture);
        self.led.toggle();

        if gesture == Gesture::SinglePress {
            let shortcut = self.settings.selected_shortcut();
            self.dispatcher.send(shortcut.spec());
        }
    }

    pub fn led(&self) -> &LedController {
        &self.led
    }

    pub fn classifier(&self) -> &PressClassifier {
        &self.classifier
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }
}
