//! Player preferences
//!
//! Persisted in LocalStorage, separate from the leaderboard.

use serde::{Deserialize, Serialize};

use crate::storage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Mute when the tab loses focus
    pub mute_on_blur: bool,

    // === HUD ===
    pub show_fps: bool,

    /// Start in autopilot until the first key press
    pub attract_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            mute_on_blur: true,
            show_fps: false,
            attract_mode: false,
        }
    }
}

impl Settings {
    const STORAGE_KEY: &'static str = "invaderers_settings";

    /// Gain applied to every sound effect
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
    }

    pub fn toggle_attract_mode(&mut self) {
        self.attract_mode = !self.attract_mode;
        log::info!("Attract mode {}", if self.attract_mode { "on" } else { "off" });
    }

    pub fn load() -> Self {
        match storage::load_json(Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings
            }
            None => Self::default(),
        }
    }

    pub fn save(&self) {
        storage::save_json(Self::STORAGE_KEY, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_volume() {
        let mut settings = Settings::default();
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);
        settings.sfx_volume = 0.5;
        assert!((settings.effective_volume() - 0.4).abs() < 1e-6);
        settings.toggle_mute();
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_attract_mode_toggle() {
        let mut settings = Settings::default();
        assert!(!settings.attract_mode);
        settings.toggle_attract_mode();
        assert!(settings.attract_mode);
        settings.toggle_attract_mode();
        assert!(!settings.attract_mode);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "show_fps": true }"#).unwrap();
        assert!(settings.show_fps);
        assert!(settings.mute_on_blur);
        assert_eq!(settings.master_volume, 0.8);
    }
}
