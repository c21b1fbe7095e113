//! Fixed-frame simulation tick
//!
//! Core game loop that advances a level by exactly one frame.

use super::accuracy::PERFECT_RADIUS;
use super::note::{HoldPhase, NoteKind};
use super::state::{GameEvent, LevelPhase, LevelState};

/// Keys the core reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    /// Space: the special lane
    Special,
    /// Left shift: guardian fires
    Fire,
    /// Tab: pause toggle
    Pause,
}

/// Input edges for a single frame (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keys that went down this frame
    pub pressed: Vec<Key>,
    /// Keys that came up this frame
    pub released: Vec<Key>,
    /// Demo mode - the bot plays the chart
    pub autoplay: bool,
}

impl TickInput {
    pub fn press(mut self, key: Key) -> Self {
        self.pressed.push(key);
        self
    }

    pub fn release(mut self, key: Key) -> Self {
        self.released.push(key);
        self
    }

    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn was_released(&self, key: Key) -> bool {
        self.released.contains(&key)
    }
}

/// Advance the level by one frame
pub fn tick(state: &mut LevelState, input: &TickInput) {
    match state.phase {
        LevelPhase::Finished => return,
        LevelPhase::Paused => {
            if input.was_pressed(Key::Pause) {
                state.phase = LevelPhase::Playing;
                state.push_event(GameEvent::Resumed);
            }
            return;
        }
        LevelPhase::Playing => {}
    }

    let mut input = input.clone();
    if input.autoplay {
        let bot = autoplay_input(state);
        input.pressed.extend(bot.pressed);
        input.released.extend(bot.released);
    }
    let input = &input;

    // Combat runs on the frame value from before this tick
    if let Some(combat) = state.combat.as_mut() {
        combat.step(state.ctx.frame, input, &mut state.lanes, &state.playfield, &mut state.events);
    }

    state.ctx.frame += 1;

    for lane in &mut state.lanes {
        state.score += lane.step(input, &mut state.accuracy, &mut state.ctx);
    }

    state.accuracy.tick();

    if state.is_finished() {
        state.phase = LevelPhase::Finished;
        let cleared = state.is_cleared();
        log::info!(
            "Level {} finished at frame {}: score {} / {} ({})",
            state.level,
            state.ctx.frame,
            state.score,
            state.target_score,
            if cleared { "CLEAR" } else { "TRY AGAIN" }
        );
        state.push_event(GameEvent::LevelFinished {
            score: state.score,
            cleared,
        });
    } else if input.was_pressed(Key::Pause) {
        state.phase = LevelPhase::Paused;
        state.push_event(GameEvent::Paused);
    }
}

/// Input a perfect player would give on the next frame.
///
/// Looks one frame ahead: a note moves before it is judged, so the press is
/// timed against where the cursor note will be after this frame's fall.
pub fn autoplay_input(state: &LevelState) -> TickInput {
    let mut input = TickInput::default();
    let next_frame = state.ctx.frame + 1;

    for lane in &state.lanes {
        let Some(note) = lane.current_note() else {
            continue;
        };
        if note.is_completed() || next_frame < note.appearance_frame() {
            continue;
        }

        let fall = if note.is_active() { note.speed() } else { 0 };
        let predicted = note.judged_y() + fall;
        let window = PERFECT_RADIUS.max(note.speed().abs() / 2);
        if (predicted - lane.target_height()).abs() > window {
            continue;
        }

        match note.kind {
            NoteKind::Hold {
                phase: HoldPhase::Holding,
            } => input.released.push(lane.key()),
            _ => input.pressed.push(lane.key()),
        }
    }

    if let Some(combat) = &state.combat {
        if !combat.enemies.is_empty() && combat.projectiles.is_empty() {
            input.pressed.push(Key::Fire);
        }
    }

    input
}
