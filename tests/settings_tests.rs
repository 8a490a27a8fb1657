mod common;

use capslock_mute::settings::{
    InMemoryBackend, Settings, SettingsBackend, TomlFileBackend, SELECTED_SHORTCUT_KEY,
};
use capslock_mute::shortcuts::{self, MuteShortcut};
use common::temp_dir;

#[test]
fn test_every_identifier_roundtrips_through_file() {
    let path = temp_dir("settings_roundtrip").join("settings.toml");

    for shortcut in MuteShortcut::ALL {
        let mut settings = Settings::new(TomlFileBackend::new(&path));
        settings.set_selected_shortcut(shortcut).unwrap();

        let reopened = Settings::new(TomlFileBackend::new(&path));
        assert_eq!(reopened.selected_shortcut(), shortcut);
    }

    std::fs::remove_dir_all(path.parent().unwrap()).ok();
}

#[test]
fn test_every_identifier_roundtrips_in_memory() {
    let mut settings = Settings::new(InMemoryBackend::new());

    for shortcut in MuteShortcut::ALL {
        settings.set_selected_shortcut(shortcut).unwrap();
        assert_eq!(settings.selected_shortcut(), shortcut);
    }
}

#[test]
fn test_unparseable_identifier_falls_back_to_tandem() {
    let mut backend = InMemoryBackend::new();
    backend
        .set(SELECTED_SHORTCUT_KEY, toml::Value::String("teams".into()))
        .unwrap();

    let settings = Settings::new(backend);
    assert_eq!(settings.selected_shortcut(), MuteShortcut::Tandem);
}

#[test]
fn test_stored_identifiers_match_registry() {
    for spec in shortcuts::all() {
        let mut backend = InMemoryBackend::new();
        backend
            .set(SELECTED_SHORTCUT_KEY, toml::Value::String(spec.id.as_str().into()))
            .unwrap();

        let settings = Settings::new(backend);
        assert_eq!(settings.selected_shortcut().spec(), spec);
    }
}

#[test]
fn test_zoom_alert_flag_defaults_off_and_persists() {
    let path = temp_dir("settings_zoom_flag").join("settings.toml");

    let mut settings = Settings::new(TomlFileBackend::new(&path));
    assert!(!settings.zoom_alert_dismissed());

    settings.set_zoom_alert_dismissed(true).unwrap();
    assert!(Settings::new(TomlFileBackend::new(&path)).zoom_alert_dismissed());

    // Selecting a shortcut keeps the flag
    settings.set_selected_shortcut(MuteShortcut::Zoom).unwrap();
    assert!(settings.zoom_alert_dismissed());

    std::fs::remove_dir_all(path.parent().unwrap()).ok();
}
