use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PreferencesError;

/// Keyboard mode: which key table drives navigation and commit modifiers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyboardMode {
    #[default]
    Standard,
    Vi,
}

impl KeyboardMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Vi => "vi",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Standard => Self::Vi,
            Self::Vi => Self::Standard,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    /// Resolve `System` against the terminal's advertised background.
    ///
    /// `colorfgbg` is the value of the `COLORFGBG` variable ("fg;bg"); a
    /// background of 7 or 15 means a light terminal. Anything else is dark.
    pub fn resolve(self, colorfgbg: Option<&str>) -> Theme {
        match self {
            Theme::System => {
                let bg = colorfgbg.and_then(|v| v.rsplit(';').next()).map(str::trim);
                match bg {
                    Some("7") | Some("15") => Theme::Light,
                    _ => Theme::Dark,
                }
            }
            other => other,
        }
    }
}

/// App preferences (persisted to JSON file)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Preferences {
    #[serde(default)]
    pub keyboard_mode: KeyboardMode,
    #[serde(default)]
    pub theme: Theme,
}

pub struct PreferencesStorage {
    path: PathBuf,
    pub prefs: Preferences,
}

impl PreferencesStorage {
    /// Load preferences from `path`; a missing or unreadable file yields defaults
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let prefs = Self::load_from_file(&path).unwrap_or_default();
        Self { path, prefs }
    }

    fn load_from_file(path: &Path) -> Option<Preferences> {
        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(prefs) => Some(prefs),
            Err(e) => {
                tracing::warn!("Ignoring corrupt preferences at {}: {}", path.display(), e);
                None
            }
        }
    }

    fn save_to_file(&self) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.prefs)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    pub fn keyboard_mode(&self) -> KeyboardMode {
        self.prefs.keyboard_mode
    }

    pub fn set_keyboard_mode(&mut self, mode: KeyboardMode) -> Result<(), PreferencesError> {
        self.prefs.keyboard_mode = mode;
        self.save_to_file()
    }

    pub fn theme(&self) -> Theme {
        self.prefs.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let storage = PreferencesStorage::open(dir.path().join("preferences.json"));
        assert_eq!(storage.keyboard_mode(), KeyboardMode::Standard);
        assert_eq!(storage.theme(), Theme::System);
    }

    #[test]
    fn test_changes_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let mut storage = PreferencesStorage::open(&path);
        storage.prefs.theme = Theme::Light;
        storage.set_keyboard_mode(KeyboardMode::Vi).unwrap();

        let reopened = PreferencesStorage::open(&path);
        assert_eq!(reopened.keyboard_mode(), KeyboardMode::Vi);
        assert_eq!(reopened.theme(), Theme::Light);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ not json").unwrap();

        let storage = PreferencesStorage::open(&path);
        assert_eq!(storage.prefs, Preferences::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, r#"{"keyboard_mode":"vi"}"#).unwrap();

        let storage = PreferencesStorage::open(&path);
        assert_eq!(storage.keyboard_mode(), KeyboardMode::Vi);
        assert_eq!(storage.theme(), Theme::System);
    }

    #[test]
    fn test_system_theme_resolution() {
        assert_eq!(Theme::System.resolve(Some("0;15")), Theme::Light);
        assert_eq!(Theme::System.resolve(Some("15;0")), Theme::Dark);
        assert_eq!(Theme::System.resolve(None), Theme::Dark);
        assert_eq!(Theme::Light.resolve(Some("15;0")), Theme::Light);
    }

    #[test]
    fn test_mode_toggle() {
        assert_eq!(KeyboardMode::Standard.toggled(), KeyboardMode::Vi);
        assert_eq!(KeyboardMode::Vi.toggled(), KeyboardMode::Standard);
    }
}
