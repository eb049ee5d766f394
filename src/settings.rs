//! Game settings and preferences
//!
//! Persisted as JSON under the platform config directory, loaded once
//! at startup. Unknown keys in the file are ignored and missing keys
//! fall back to defaults, so old files keep working across versions.

use std::fs;
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::tuning::Difficulty;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Difficulty preset applied when a run starts
    pub difficulty: Difficulty,

    // === Audio ===
    /// Effects volume (0.0 - 1.0)
    pub volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Music level while ducked under an effect (0.0 - 1.0)
    pub duck_level: f32,

    // === Controls ===
    /// Swap the left/right movement keys
    pub invert_controls: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            volume: 0.3,
            music_volume: 0.2,
            duck_level: 0.3,
            invert_controls: false,
        }
    }
}

impl Settings {
    /// Settings file under the platform config directory
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tubestorm")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings, falling back to defaults when absent or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("settings file {} unreadable: {err}", path.display());
                    Self::default()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                log::warn!("settings file {} unreadable: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Write settings to the config directory.
    pub fn save(&self) -> io::Result<()> {
        let Some(path) = Self::path() else {
            return Err(io::Error::other("no config directory on this platform"));
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(&path, json)?;
        log::info!("settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"difficulty":"hard"}"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert!((settings.volume - 0.3).abs() < 1e-6);
        assert!((settings.music_volume - 0.2).abs() < 1e-6);
        assert!(!settings.invert_controls);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let settings: Settings =
            serde_json::from_str(r#"{"volume":0.5,"legacyHighScore":9000}"#).unwrap();
        assert!((settings.volume - 0.5).abs() < 1e-6);
        assert_eq!(settings.difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_round_trips_through_json() {
        let mut settings = Settings::default();
        settings.difficulty = Difficulty::Insane;
        settings.invert_controls = true;
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(serde_json::from_str::<Settings>(&json).unwrap(), settings);
    }
}
