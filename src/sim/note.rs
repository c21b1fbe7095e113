//! Falling notes and their per-frame judging
//!
//! Every variant shares one core record (height, speed, activity flags);
//! `NoteKind` selects the judging strategy.

use serde::{Deserialize, Serialize};

use super::accuracy::{AccuracyEvaluator, EffectOutcome, Grade};
use super::state::SimContext;
use super::tick::{Key, TickInput};
use crate::consts::*;

/// Hold note sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldPhase {
    /// Waiting for the bottom edge to be pressed
    Pending,
    /// Grabbed, waiting for the top edge to be released
    Holding,
}

/// Side effect carried by a trigger note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Completes every active note in the owning lane
    Bomb,
    /// Doubles the score multiplier for a while
    DoubleScore,
    /// Raises the fall speed by one
    SpeedUp,
    /// Lowers the fall speed by one
    SlowDown,
}

impl EffectKind {
    pub fn label(self) -> &'static str {
        match self {
            EffectKind::Bomb => "Lane Clear",
            EffectKind::DoubleScore => "Double Score",
            EffectKind::SpeedUp => "Speed Up",
            EffectKind::SlowDown => "Slow Down",
        }
    }

    /// Apply the effect and return what the note itself contributes
    fn apply(self, evaluator: &mut AccuracyEvaluator, ctx: &mut SimContext) -> NoteVerdict {
        match self {
            EffectKind::Bomb => NoteVerdict {
                points: 0,
                clear_lane: true,
            },
            EffectKind::DoubleScore => {
                evaluator.activate_double_score();
                NoteVerdict::default()
            }
            EffectKind::SpeedUp => {
                ctx.fall_speed += 1;
                log::debug!("Fall speed up to {}", ctx.fall_speed);
                NoteVerdict::points(SPEED_NOTE_SCORE)
            }
            EffectKind::SlowDown => {
                ctx.fall_speed -= 1;
                log::debug!("Fall speed down to {}", ctx.fall_speed);
                NoteVerdict::points(SPEED_NOTE_SCORE)
            }
        }
    }
}

/// Note variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteKind {
    Normal,
    Hold { phase: HoldPhase },
    Effect(EffectKind),
}

/// What judging a note produced this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoteVerdict {
    /// Score delta for the level
    pub points: i32,
    /// The owning lane must complete all of its active notes
    pub clear_lane: bool,
}

impl NoteVerdict {
    fn points(points: i32) -> Self {
        Self {
            points,
            clear_lane: false,
        }
    }
}

/// A note falling down a lane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub kind: NoteKind,
    appearance_frame: u32,
    y: i32,
    speed: i32,
    active: bool,
    completed: bool,
}

impl Note {
    fn new(kind: NoteKind, appearance_frame: u32, y: i32) -> Self {
        Self {
            kind,
            appearance_frame,
            y,
            speed: INITIAL_FALL_SPEED,
            active: false,
            completed: false,
        }
    }

    pub fn normal(appearance_frame: u32) -> Self {
        Self::new(NoteKind::Normal, appearance_frame, NOTE_START_Y)
    }

    pub fn hold(appearance_frame: u32) -> Self {
        Self::new(
            NoteKind::Hold {
                phase: HoldPhase::Pending,
            },
            appearance_frame,
            HOLD_START_Y,
        )
    }

    pub fn effect(effect: EffectKind, appearance_frame: u32) -> Self {
        Self::new(NoteKind::Effect(effect), appearance_frame, NOTE_START_Y)
    }

    pub fn appearance_frame(&self) -> u32 {
        self.appearance_frame
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn set_y(&mut self, y: i32) {
        self.y = y;
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: i32) {
        self.speed = speed;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_normal(&self) -> bool {
        self.kind == NoteKind::Normal
    }

    /// Mark as judged. Irreversible.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.completed = true;
    }

    /// Fall (if active), then appear once the frame is reached
    pub fn update(&mut self, frame: u32) {
        if self.active {
            self.y += self.speed;
        }
        if frame >= self.appearance_frame && !self.completed {
            self.active = true;
        }
    }

    /// Height compared against the target for the current phase
    pub fn judged_y(&self) -> i32 {
        match self.kind {
            NoteKind::Hold {
                phase: HoldPhase::Pending,
            } => self.y + HOLD_HALF_LENGTH,
            NoteKind::Hold {
                phase: HoldPhase::Holding,
            } => self.y - HOLD_HALF_LENGTH,
            _ => self.y,
        }
    }

    /// Judge this note against the frame's input
    pub fn judge(
        &mut self,
        input: &TickInput,
        key: Key,
        target_height: i32,
        evaluator: &mut AccuracyEvaluator,
        ctx: &mut SimContext,
    ) -> NoteVerdict {
        if !self.active {
            return NoteVerdict::default();
        }

        match self.kind {
            NoteKind::Normal => {
                match evaluator.evaluate_score(self.y, target_height, input.was_pressed(key)) {
                    Some(judgement) => {
                        self.deactivate();
                        NoteVerdict::points(judgement.points)
                    }
                    None => NoteVerdict::default(),
                }
            }
            NoteKind::Hold {
                phase: HoldPhase::Pending,
            } => {
                match evaluator.evaluate_score(self.judged_y(), target_height, input.was_pressed(key)) {
                    Some(judgement) if judgement.grade == Grade::Miss => {
                        self.deactivate();
                        NoteVerdict::points(judgement.points)
                    }
                    Some(judgement) => {
                        self.kind = NoteKind::Hold {
                            phase: HoldPhase::Holding,
                        };
                        NoteVerdict::points(judgement.points)
                    }
                    None => NoteVerdict::default(),
                }
            }
            NoteKind::Hold {
                phase: HoldPhase::Holding,
            } => {
                let released = input.was_released(key);
                match evaluator.evaluate_score(self.judged_y(), target_height, released) {
                    Some(judgement) => {
                        self.deactivate();
                        NoteVerdict::points(judgement.points)
                    }
                    None if released => {
                        self.deactivate();
                        NoteVerdict::points(evaluator.force_miss().points)
                    }
                    None => NoteVerdict::default(),
                }
            }
            NoteKind::Effect(effect) => {
                let outcome =
                    evaluator.evaluate_effect(self.y, target_height, input.was_pressed(key), effect.label());
                match outcome {
                    EffectOutcome::NotScored => NoteVerdict::default(),
                    EffectOutcome::NotActivated => {
                        self.deactivate();
                        NoteVerdict::default()
                    }
                    EffectOutcome::Activated => {
                        self.deactivate();
                        effect.apply(evaluator, ctx)
                    }
                }
            }
        }
    }
}
