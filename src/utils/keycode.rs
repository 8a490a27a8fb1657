//! macOS virtual keycodes (HIToolbox/Events.h, US layout)

/// 'A' key
pub const KEYCODE_A: u16 = 0x00;
/// 'D' key
pub const KEYCODE_D: u16 = 0x02;
/// 'M' key
pub const KEYCODE_M: u16 = 0x2E;
/// F18, target of the Caps Lock remap
pub const KEYCODE_F18: u16 = 0x4F;

/// Human-readable name of a macOS keycode, used in logs and CLI output
pub fn keycode_name(keycode: i64) -> Option<&'static str> {
    match keycode {
        // Letters
        0 => Some("A"),
        1 => Some("S"),
        2 => Some("D"),
        3 => Some("F"),
        4 => Some("H"),
        5 => Some("G"),
        6 => Some("Z"),
        7 => Some("X"),
        8 => Some("C"),
        9 => Some("V"),
        11 => Some("B"),
        12 => Some("Q"),
        13 => Some("W"),
        14 => Some("E"),
        15 => Some("R"),
        16 => Some("Y"),
        17 => Some("T"),
        31 => Some("O"),
        32 => Some("U"),
        34 => Some("I"),
        35 => Some("P"),
        37 => Some("L"),
        38 => Some("J"),
        40 => Some("K"),
        45 => Some("N"),
        46 => Some("M"),

        // Numbers
        18 => Some("1"),
        19 => Some("2"),
        20 => Some("3"),
        21 => Some("4"),
        23 => Some("5"),
        22 => Some("6"),
        26 => Some("7"),
        28 => Some("8"),
        25 => Some("9"),
        29 => Some("0"),

        // Whitespace and editing
        36 => Some("Return"),
        48 => Some("Tab"),
        49 => Some("Space"),
        51 => Some("Delete"),
        53 => Some("Escape"),
        57 => Some("Caps Lock"),

        // Function keys
        122 => Some("F1"),
        120 => Some("F2"),
        99 => Some("F3"),
        118 => Some("F4"),
        96 => Some("F5"),
        97 => Some("F6"),
        98 => Some("F7"),
        100 => Some("F8"),
        101 => Some("F9"),
        109 => Some("F10"),
        103 => Some("F11"),
        111 => Some("F12"),
        105 => Some("F13"),
        107 => Some("F14"),
        113 => Some("F15"),
        106 => Some("F16"),
        64 => Some("F17"),
        79 => Some("F18"),
        80 => Some("F19"),
        90 => Some("F20"),

        _ => None,
    }
}

/// Describe a keycode as "F18 (keycode 79)" or "keycode 130"
pub fn describe_keycode(keycode: i64) -> String {
    match keycode_name(keycode) {
        Some(name) => format!("{} (keycode {})", name, keycode),
        None => format!("keycode {}", keycode),
    }
}
