//! Synthesized mute shortcut injection

use crate::error::CoreError;
use crate::shortcuts::{ModifierSet, ShortcutSpec};
use log::debug;

/// Posts one synthetic keyboard event into the system event stream
pub trait EventPoster {
    fn post_key(&self, keycode: u16, key_down: bool, modifiers: ModifierSet)
        -> Result<(), CoreError>;
}

pub struct ShortcutDispatcher {
    poster: Box<dyn EventPoster>,
}

impl ShortcutDispatcher {
    pub fn new(poster: impl EventPoster + 'static) -> Self {
        Self {
            poster: Box::new(poster),
        }
    }

    /// Post key-down then key-up for `spec`, with no delay in between
    ///
    /// Failures are dropped. The key-up is still attempted when the key-down
    /// could not be posted, so a half-delivered chord never leaves the key
    /// logically held.
    pub fn send(&self, spec: &ShortcutSpec) {
        debug!("Sending {}", spec.display_name);

        for key_down in [true, false] {
            if let Err(e) = self.poster.post_key(spec.keycode, key_down, spec.modifiers) {
                debug!("Dropped synthetic event for {}: {}", spec.display_name, e);
            }
        }
    }
}

#[cfg(target_os = "macos")]
pub use mac::CgEventPoster;

#[cfg(target_os = "macos")]
mod mac {
    use super::EventPoster;
    use crate::error::CoreError;
    use crate::shortcuts::ModifierSet;
    use core_graphics::event::{CGEvent, CGEventFlags, CGEventTapLocation};
    use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};

    /// Posts at the HID level so the events look like real keyboard input
    pub struct CgEventPoster;

    impl EventPoster for CgEventPoster {
        fn post_key(
            &self,
            keycode: u16,
            key_down: bool,
            modifiers: ModifierSet,
        ) -> Result<(), CoreError> {
            let source = CGEventSource::new(CGEventSourceStateID::HIDSystemState)
                .map_err(|_| CoreError::SyntheticEventFailed { keycode })?;
            let event = CGEvent::new_keyboard_event(source, keycode, key_down)
                .map_err(|_| CoreError::SyntheticEventFailed { keycode })?;

            event.set_flags(CGEventFlags::from_bits_truncate(modifiers.bits()));
            event.post(CGEventTapLocation::HID);
            Ok(())
        }
    }
}
