//! Rhythm Judge - a frame-stepped lane rhythm game engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (notes, lanes, judging, combat, level state)
//! - `chart`: Level loading from the lane/note table format
//! - `settings`: Engine and level configuration
//! - `audio`: Background music side channel (start/pause only)

pub mod audio;
pub mod chart;
pub mod settings;
pub mod sim;

pub use chart::{Chart, ChartError};
pub use settings::{LevelConfig, Settings};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const WINDOW_WIDTH: i32 = 1024;
    pub const WINDOW_HEIGHT: i32 = 768;

    /// Height at which a note has to line up with a press
    pub const TARGET_HEIGHT: i32 = 657;

    /// Fall speed at level start (pixels per frame)
    pub const INITIAL_FALL_SPEED: i32 = 2;

    /// Spawn height for normal and effect notes
    pub const NOTE_START_Y: i32 = 100;
    /// Spawn height for hold notes (their sprite is taller)
    pub const HOLD_START_Y: i32 = 24;
    /// Distance from a hold note's centre to either judged edge
    pub const HOLD_HALF_LENGTH: i32 = 82;

    /// Flat bonus awarded by speed-changing notes
    pub const SPEED_NOTE_SCORE: i32 = 15;
}
