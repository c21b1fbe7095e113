//! Engine settings and per-level configuration
//!
//! Loaded from an optional JSON file. Missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Per-level tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub number: u8,
    /// Score needed to clear the level
    pub target_score: i32,
    /// Guardian and enemies take part
    pub combat: bool,
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    pub window_width: i32,
    pub window_height: i32,
    /// Height notes are judged against
    pub target_height: i32,
    /// Fall speed at level start (pixels per frame)
    pub initial_fall_speed: i32,

    /// Seed for enemy spawns
    pub seed: u64,

    // === Audio ===
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,

    pub levels: Vec<LevelConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            target_height: TARGET_HEIGHT,
            initial_fall_speed: INITIAL_FALL_SPEED,

            seed: 0x5EED,

            music_volume: 0.7,

            levels: vec![
                LevelConfig {
                    number: 1,
                    target_score: 150,
                    combat: false,
                },
                LevelConfig {
                    number: 2,
                    target_score: 400,
                    combat: false,
                },
                LevelConfig {
                    number: 3,
                    target_score: 350,
                    combat: true,
                },
            ],
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("Using default settings ({}: {e})", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Configuration for level `number`
    pub fn level(&self, number: u8) -> Option<&LevelConfig> {
        self.levels.iter().find(|l| l.number == number)
    }

    /// Music volume clamped to 0.0 - 1.0
    pub fn effective_music_volume(&self) -> f32 {
        self.music_volume.clamp(0.0, 1.0)
    }
}
