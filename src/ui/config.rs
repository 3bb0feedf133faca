use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gtk4::glib;
use serde::Deserialize;

use super::error::SettingsError;

pub const APP_ID: &str = "io.basshift.MemoryMatch";
pub const APP_DIR_NAME: &str = "memory-match";

const SETTINGS_FILE_NAME: &str = "settings.json";
const HIGH_SCORE_FILE_NAME: &str = "highscore.txt";
const DEFAULT_ASSETS_DIR: &str = "resources";
const DEFAULT_MISMATCH_DELAY_MS: u64 = 1000;

pub fn config_dir() -> PathBuf {
    glib::user_config_dir().join(APP_DIR_NAME)
}

pub fn settings_path() -> PathBuf {
    config_dir().join(SETTINGS_FILE_NAME)
}

/// User-tunable knobs, read from `settings.json` in the config directory.
/// Every key is optional.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub assets_dir: PathBuf,
    pub high_score_path: PathBuf,
    pub mismatch_delay_ms: u64,
    pub sound_enabled: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            high_score_path: config_dir().join(HIGH_SCORE_FILE_NAME),
            mismatch_delay_ms: DEFAULT_MISMATCH_DELAY_MS,
            sound_enabled: true,
        }
    }
}

impl GameSettings {
    pub fn load() -> Self {
        Self::load_from(&settings_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match Self::read_from(path) {
            Ok(Some(settings)) => {
                log::debug!("Loaded settings from {}", path.display());
                settings
            }
            Ok(None) => GameSettings::default(),
            Err(err) => {
                log::warn!("{err}; using defaults");
                GameSettings::default()
            }
        }
    }

    fn read_from(path: &Path) -> Result<Option<Self>, SettingsError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn mismatch_delay(&self) -> Duration {
        Duration::from_millis(self.mismatch_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_dir::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = GameSettings::load_from(&dir.child("settings.json"));
        assert_eq!(settings, GameSettings::default());
        assert_eq!(settings.mismatch_delay(), Duration::from_secs(1));
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("settings.json");
        fs::write(&path, r#"{ "mismatch_delay_ms": 400, "sound_enabled": false }"#).unwrap();

        let settings = GameSettings::load_from(&path);
        assert_eq!(settings.mismatch_delay_ms, 400);
        assert!(!settings.sound_enabled);
        assert_eq!(settings.assets_dir, PathBuf::from("resources"));
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("settings.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            GameSettings::read_from(&path),
            Err(SettingsError::Parse { .. })
        ));
        assert_eq!(GameSettings::load_from(&path), GameSettings::default());
    }
}
