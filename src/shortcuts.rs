//! Mute shortcuts of the supported meeting apps
//!
//! Each [`MuteShortcut`] maps to one static [`ShortcutSpec`] describing the
//! key chord that gets synthesized when the proxy key is pressed.

use crate::error::CoreError;
use crate::utils::keycode::{KEYCODE_A, KEYCODE_D, KEYCODE_M};
use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Modifier flags of a synthesized chord
    ///
    /// Bit values match the macOS CGEventFlags masks so the set converts to
    /// the platform flag type without a lookup table.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModifierSet: u64 {
        /// Shift key (⇧)
        const SHIFT = 0x0002_0000;
        /// Control key (⌃)
        const CONTROL = 0x0004_0000;
        /// Option key (⌥)
        const OPTION = 0x0008_0000;
        /// Command key (⌘)
        const COMMAND = 0x0010_0000;
    }
}

/// Identifier of a supported mute shortcut
///
/// Stored and parsed as the lowercase identifier ("tandem", "zoom", "meet").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MuteShortcut {
    /// Command+Shift+M
    #[default]
    Tandem,
    /// Command+Shift+A
    Zoom,
    /// Command+D
    Meet,
}

/// Static description of a synthesized mute chord
#[derive(Debug, PartialEq, Eq)]
pub struct ShortcutSpec {
    pub id: MuteShortcut,
    /// macOS virtual keycode of the non-modifier key
    pub keycode: u16,
    pub modifiers: ModifierSet,
    /// Label shown when listing shortcuts
    pub display_name: &'static str,
    pub app_name: &'static str,
}

// Order must follow the MuteShortcut discriminants.
static SHORTCUTS: [ShortcutSpec; 3] = [
    ShortcutSpec {
        id: MuteShortcut::Tandem,
        keycode: KEYCODE_M,
        modifiers: ModifierSet::COMMAND.union(ModifierSet::SHIFT),
        display_name: "\u{2318}\u{21E7}M (Tandem)",
        app_name: "Tandem",
    },
    ShortcutSpec {
        id: MuteShortcut::Zoom,
        keycode: KEYCODE_A,
        modifiers: ModifierSet::COMMAND.union(ModifierSet::SHIFT),
        display_name: "\u{2318}\u{21E7}A (Zoom)",
        app_name: "Zoom",
    },
    ShortcutSpec {
        id: MuteShortcut::Meet,
        keycode: KEYCODE_D,
        modifiers: ModifierSet::COMMAND,
        display_name: "\u{2318}D (Meet)",
        app_name: "Google Meet",
    },
];

const ZOOM_NOTICE: &str = "Note: Zoom's default mute shortcut is \u{2318}\u{21E7}A.

Make sure this shortcut is enabled in Zoom:
Settings \u{2192} Keyboard Shortcuts \u{2192} Mute/Unmute My Audio

If you've customized Zoom's shortcut, you may need to adjust it.";

impl MuteShortcut {
    pub const ALL: [MuteShortcut; 3] = [MuteShortcut::Tandem, MuteShortcut::Zoom, MuteShortcut::Meet];

    /// Identifier used in settings and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            MuteShortcut::Tandem => "tandem",
            MuteShortcut::Zoom => "zoom",
            MuteShortcut::Meet => "meet",
        }
    }

    pub fn spec(self) -> &'static ShortcutSpec {
        &SHORTCUTS[self as usize]
    }

    /// One-time notice to show before this shortcut is selected, if any
    pub fn selection_notice(self) -> Option<&'static str> {
        match self {
            MuteShortcut::Zoom => Some(ZOOM_NOTICE),
            MuteShortcut::Tandem | MuteShortcut::Meet => None,
        }
    }
}

impl fmt::Display for MuteShortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MuteShortcut {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tandem" => Ok(MuteShortcut::Tandem),
            "zoom" => Ok(MuteShortcut::Zoom),
            "meet" => Ok(MuteShortcut::Meet),
            _ => Err(CoreError::UnknownShortcut(s.to_string())),
        }
    }
}

/// Look up the shortcut registered under `identifier`
///
/// Callers are expected to fall back to [`MuteShortcut::default`] on error.
pub fn resolve(identifier: &str) -> Result<&'static ShortcutSpec, CoreError> {
    identifier.parse::<MuteShortcut>().map(MuteShortcut::spec)
}

/// All registered shortcuts in declaration order
pub fn all() -> &'static [ShortcutSpec] {
    &SHORTCUTS
}
