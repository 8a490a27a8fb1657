//! Persistent user settings
//!
//! Settings are a small key/value contract ([`SettingsBackend`]) with typed
//! accessors on top ([`Settings`]). Missing or corrupt values always fall
//! back to the documented defaults.

use crate::constants::{SETTINGS_DIR_NAME, SETTINGS_FILE_NAME};
use crate::shortcuts::MuteShortcut;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const SELECTED_SHORTCUT_KEY: &str = "selected_shortcut";
pub const ZOOM_ALERT_DISMISSED_KEY: &str = "zoom_alert_dismissed";

/// Key/value storage for settings
pub trait SettingsBackend {
    fn get(&self, key: &str) -> Option<toml::Value>;
    fn set(&mut self, key: &str, value: toml::Value) -> Result<()>;
}

/// Settings stored in a TOML file
///
/// The file is re-read on every `get`, so changes written by another
/// process are picked up without a restart.
pub struct TomlFileBackend {
    path: PathBuf,
}

impl TomlFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the standard settings file path
    ///
    /// - macOS: `~/Library/Application Support/capslock-mute/settings.toml`
    /// - Linux: `~/.config/capslock-mute/settings.toml`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to determine config directory")?;
        Ok(config_dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the settings table
    ///
    /// A missing file is `Ok(None)`. A file that is not valid TOML is logged
    /// and also reads as `Ok(None)`, so the next write replaces it. Any other
    /// read failure is an error, so a write cannot discard keys it could not
    /// see.
    fn load(&self) -> Result<Option<toml::Table>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read settings file: {}", self.path.display())
                })
            }
        };

        match toml::from_str::<toml::Table>(&contents) {
            Ok(table) => Ok(Some(table)),
            Err(e) => {
                warn!(
                    "Settings file {} is not valid TOML, using defaults: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }
}

impl SettingsBackend for TomlFileBackend {
    fn get(&self, key: &str) -> Option<toml::Value> {
        match self.load() {
            Ok(table) => table?.remove(key),
            Err(e) => {
                warn!("{:#}", e);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: toml::Value) -> Result<()> {
        let mut table = match self.load()? {
            Some(table) => table,
            None => {
                if self.path.exists() {
                    warn!("Replacing unparseable settings file {}", self.path.display());
                }
                toml::Table::new()
            }
        };
        table.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create settings directory")?;
        }

        let contents = toml::to_string_pretty(&table).context("Failed to serialize settings")?;

        // Replace atomically so a concurrent reader never sees a partial file
        let tmp_path = self.path.with_extension("toml.tmp");
        fs::write(&tmp_path, contents)
            .with_context(|| format!("Failed to write settings file: {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace settings file: {}", self.path.display()))?;

        debug!("Saved setting {} to {}", key, self.path.display());
        Ok(())
    }
}

/// Settings kept in memory only
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    values: HashMap<String, toml::Value>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsBackend for InMemoryBackend {
    fn get(&self, key: &str) -> Option<toml::Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: toml::Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Typed view over a settings backend
pub struct Settings {
    backend: Box<dyn SettingsBackend>,
}

impl Settings {
    pub fn new(backend: impl SettingsBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// The selected mute shortcut, defaulting to Tandem
    ///
    /// Stored identifiers go through the same parser as `--select`, so
    /// case and surrounding whitespace do not matter.
    pub fn selected_shortcut(&self) -> MuteShortcut {
        let Some(value) = self.backend.get(SELECTED_SHORTCUT_KEY) else {
            return MuteShortcut::default();
        };

        match value.as_str().map(str::parse::<MuteShortcut>) {
            Some(Ok(shortcut)) => shortcut,
            Some(Err(e)) => {
                warn!("Ignoring stored shortcut: {}, using {}", e, MuteShortcut::default());
                MuteShortcut::default()
            }
            None => {
                warn!(
                    "Ignoring stored shortcut {} (not a string), using {}",
                    value,
                    MuteShortcut::default()
                );
                MuteShortcut::default()
            }
        }
    }

    pub fn set_selected_shortcut(&mut self, shortcut: MuteShortcut) -> Result<()> {
        self.backend.set(
            SELECTED_SHORTCUT_KEY,
            toml::Value::String(shortcut.as_str().to_string()),
        )?;
        info!("Selected mute shortcut: {}", shortcut.spec().display_name);
        Ok(())
    }

    /// Whether the Zoom notice has been dismissed for good
    pub fn zoom_alert_dismissed(&self) -> bool {
        self.backend
            .get(ZOOM_ALERT_DISMISSED_KEY)
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }

    pub fn set_zoom_alert_dismissed(&mut self, dismissed: bool) -> Result<()> {
        self.backend
            .set(ZOOM_ALERT_DISMISSED_KEY, toml::Value::Boolean(dismissed))
    }
}
