//! Game settings and tunables
//!
//! Persisted as JSON in LocalStorage (web) or a file (native). Every field
//! has a default, so older or partial documents still load.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Settings could not be read or written
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Bubble physics tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleTuning {
    /// Bubble radius (pixels)
    pub radius: f32,
    /// Speed cap (pixels per tick)
    pub max_speed: f32,
    /// Max random velocity nudge per axis per tick
    pub jitter: f32,
    /// Fraction of speed kept after a wall bounce (0..1)
    pub wall_damping: f32,
    /// Fraction of partner velocity taken in a bubble bounce (0..1)
    pub restitution: f32,
    /// Flight speed (pixels per tick)
    pub flight_step: f32,
}

impl Default for BubbleTuning {
    fn default() -> Self {
        Self {
            radius: BUBBLE_RADIUS,
            max_speed: BUBBLE_MAX_SPEED,
            jitter: BUBBLE_JITTER,
            wall_damping: WALL_DAMPING,
            restitution: RESTITUTION,
            flight_step: FLIGHT_STEP,
        }
    }
}

impl BubbleTuning {
    /// Clamp values into ranges the simulation can use
    pub fn validate(&mut self) {
        let defaults = Self::default();
        if !(self.radius > 0.0) {
            self.radius = defaults.radius;
        }
        if !(self.max_speed >= 0.0) {
            self.max_speed = defaults.max_speed;
        }
        self.jitter = if self.jitter.is_finite() { self.jitter.abs() } else { defaults.jitter };
        // Damping must stay strictly below 1 or bounces gain energy
        self.wall_damping = sanitize_fraction(self.wall_damping, defaults.wall_damping);
        self.restitution = sanitize_fraction(self.restitution, defaults.restitution);
        if !(self.flight_step > 0.0) {
            self.flight_step = defaults.flight_step;
        }
    }
}

fn sanitize_fraction(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 0.99)
    } else {
        fallback
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Spelling ===
    /// Score at or above which a word counts as learned
    pub mastery_threshold: i32,
    /// Words per practice session
    pub session_size: usize,
    /// Extra random letters mixed into each round
    pub decoy_letters: usize,

    // === Pong ===
    /// Level a new pong game starts at
    pub start_level: u32,
    /// Multiplier applied to raw tilt input
    pub tilt_sensitivity: f32,

    // === Device ===
    pub sound_enabled: bool,
    /// Keep the screen awake while playing
    pub wake_lock: bool,

    pub bubbles: BubbleTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mastery_threshold: 5,
            session_size: 10,
            decoy_letters: 3,

            start_level: 1,
            tilt_sensitivity: 1.0,

            sound_enabled: true,
            wake_lock: true,

            bubbles: BubbleTuning::default(),
        }
    }
}

impl Settings {
    /// Parse settings; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.validate();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Clamp out-of-range values
    pub fn validate(&mut self) {
        self.session_size = self.session_size.max(1);
        self.decoy_letters = self.decoy_letters.min(MAX_BODIES);
        self.start_level = self.start_level.max(1);
        if !(self.tilt_sensitivity > 0.0) {
            self.tilt_sensitivity = 1.0;
        }
        self.bubbles.validate();
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "playroom_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path)
            .map_err(SettingsError::from)
            .and_then(|json| Self::from_json(&json))
        {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"mastery_threshold": 3}"#).unwrap();
        assert_eq!(settings.mastery_threshold, 3);
        assert_eq!(settings.session_size, 10);
        assert_eq!(settings.bubbles, BubbleTuning::default());
    }

    #[test]
    fn test_partial_tuning_uses_defaults() {
        let settings = Settings::from_json(r#"{"bubbles": {"radius": 20.0}}"#).unwrap();
        assert_eq!(settings.bubbles.radius, 20.0);
        assert_eq!(settings.bubbles.flight_step, FLIGHT_STEP);
    }

    #[test]
    fn test_validate_clamps() {
        let settings = Settings::from_json(
            r#"{"session_size": 0, "start_level": 0, "bubbles": {"wall_damping": 1.5, "restitution": -1.0, "radius": -3.0}}"#,
        )
        .unwrap();
        assert_eq!(settings.session_size, 1);
        assert_eq!(settings.start_level, 1);
        assert!(settings.bubbles.wall_damping < 1.0);
        assert_eq!(settings.bubbles.restitution, 0.0);
        assert_eq!(settings.bubbles.radius, BUBBLE_RADIUS);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(Settings::from_json("{nope"), Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_json_roundtrip_defaults() {
        let json = Settings::default().to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), Settings::default());
    }

    #[test]
    #[cfg(not(target_arch = "wasm32"))]
    fn test_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("playroom_settings_{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.decoy_letters = 5;
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    #[cfg(not(target_arch = "wasm32"))]
    fn test_missing_file_is_default() {
        let path = std::path::Path::new("/nonexistent/playroom/settings.json");
        assert_eq!(Settings::load_from(path), Settings::default());
    }
}
