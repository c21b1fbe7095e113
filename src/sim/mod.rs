//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to `tick` advances exactly one frame
//! - Seeded RNG only
//! - Stable iteration order (lanes in declaration order, notes in fall order)
//! - No rendering, audio or platform dependencies

pub mod accuracy;
pub mod collision;
pub mod combat;
pub mod lane;
pub mod note;
pub mod state;
pub mod tick;

pub use accuracy::{AccuracyEvaluator, EffectOutcome, Grade, Judgement};
pub use combat::{Combat, Enemy, Guardian, Projectile};
pub use lane::{Lane, LaneKind};
pub use note::{EffectKind, HoldPhase, Note, NoteKind, NoteVerdict};
pub use state::{GameEvent, LevelPhase, LevelState, LevelSummary, Playfield, SimContext};
pub use tick::{Key, TickInput, autoplay_input, tick};
