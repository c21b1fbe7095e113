//! Level state and core simulation types
//!
//! Everything one level needs to advance frame by frame lives here. The frame
//! counter and fall speed are carried in `SimContext` and passed down to the
//! lanes explicitly.

use serde::{Deserialize, Serialize};

use super::accuracy::AccuracyEvaluator;
use super::combat::Combat;
use super::lane::Lane;
use crate::chart::Chart;
use crate::consts::*;
use crate::settings::{LevelConfig, Settings};

/// Clock and global fall speed shared by every lane in a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimContext {
    /// Frames simulated so far
    pub frame: u32,
    /// Pixels per frame applied to every note from the next frame
    pub fall_speed: i32,
}

impl SimContext {
    pub fn new(fall_speed: i32) -> Self {
        Self { frame: 0, fall_speed }
    }
}

/// Playfield geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: i32,
    pub height: i32,
    /// Height at which notes are judged
    pub target_height: i32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
            target_height: TARGET_HEIGHT,
        }
    }
}

impl Playfield {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            width: settings.window_width,
            height: settings.window_height,
            target_height: settings.target_height,
        }
    }
}

/// Current phase of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Frames are being simulated
    Playing,
    /// Frozen until the pause key is pressed again
    Paused,
    /// Every lane is finished
    Finished,
}

/// Things that happened during a frame, drained by the driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Paused,
    Resumed,
    EnemySpawned { id: u32 },
    EnemyDestroyed { id: u32 },
    /// An enemy silently removed notes from a lane
    NotesStruck { enemy: u32, lane: usize, count: usize },
    LevelFinished { score: i32, cleared: bool },
}

/// Outward-facing result of a level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub level: u8,
    pub score: i32,
    pub target_score: i32,
    pub frames: u32,
    pub finished: bool,
    pub cleared: bool,
}

/// Complete state of one level
#[derive(Debug, Clone)]
pub struct LevelState {
    /// Level number
    pub level: u8,
    /// Score needed to clear
    pub target_score: i32,
    pub playfield: Playfield,
    pub ctx: SimContext,
    /// Lanes in declaration order
    pub lanes: Vec<Lane>,
    pub accuracy: AccuracyEvaluator,
    /// Present only for levels with the guardian
    pub combat: Option<Combat>,
    pub score: i32,
    pub phase: LevelPhase,
    seed: u64,
    initial_fall_speed: i32,
    chart: Chart,
    pub(crate) events: Vec<GameEvent>,
}

impl LevelState {
    /// Build a level from a loaded chart
    pub fn new(chart: Chart, config: &LevelConfig, settings: &Settings) -> Self {
        let playfield = Playfield::from_settings(settings);
        let mut state = Self {
            level: config.number,
            target_score: config.target_score,
            playfield,
            ctx: SimContext::new(settings.initial_fall_speed),
            lanes: Vec::new(),
            accuracy: AccuracyEvaluator::new(playfield.height),
            combat: config.combat.then(|| Combat::new(settings.seed)),
            score: 0,
            phase: LevelPhase::Playing,
            seed: settings.seed,
            initial_fall_speed: settings.initial_fall_speed,
            chart,
            events: Vec::new(),
        };
        state.load_lanes();

        log::info!(
            "Level {} loaded: {} lanes, {} notes, target {}{}",
            state.level,
            state.lanes.len(),
            state.note_count(),
            state.target_score,
            if state.combat.is_some() { ", guardian active" } else { "" }
        );
        state
    }

    /// Restart the level from its chart
    pub fn reset(&mut self) {
        self.ctx = SimContext::new(self.initial_fall_speed);
        self.accuracy = AccuracyEvaluator::new(self.playfield.height);
        if self.combat.is_some() {
            self.combat = Some(Combat::new(self.seed));
        }
        self.score = 0;
        self.phase = LevelPhase::Playing;
        self.events.clear();
        self.load_lanes();
        log::info!("Level {} reset", self.level);
    }

    fn load_lanes(&mut self) {
        self.lanes = self.chart.build_lanes(self.playfield.target_height);
        for lane in &mut self.lanes {
            lane.set_speed(self.ctx.fall_speed);
        }
    }

    pub fn note_count(&self) -> usize {
        self.lanes.iter().map(|l| l.notes().len()).sum()
    }

    /// True once every lane is finished
    pub fn is_finished(&self) -> bool {
        self.lanes.iter().all(|l| l.is_finished())
    }

    /// True when the score reaches the level's target
    pub fn is_cleared(&self) -> bool {
        self.score >= self.target_score
    }

    pub fn summary(&self) -> LevelSummary {
        LevelSummary {
            level: self.level,
            score: self.score,
            target_score: self.target_score,
            frames: self.ctx.frame,
            finished: self.is_finished(),
            cleared: self.is_cleared(),
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
