//! Lanes: one input key, one column of notes, strictly in-order judging
//!
//! Only the note under the cursor is judged. The cursor moves forward by at
//! most one note per frame, so notes completed early (lane clears, enemy
//! hits) are walked past one frame at a time.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::accuracy::AccuracyEvaluator;
use super::collision::within_radius;
use super::note::Note;
use super::state::SimContext;
use super::tick::{Key, TickInput};

/// Lane type, which also fixes the lane's key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneKind {
    Left,
    Right,
    Up,
    Down,
    Special,
}

impl LaneKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaneKind::Left => "Left",
            LaneKind::Right => "Right",
            LaneKind::Up => "Up",
            LaneKind::Down => "Down",
            LaneKind::Special => "Special",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "Left" => Some(LaneKind::Left),
            "Right" => Some(LaneKind::Right),
            "Up" => Some(LaneKind::Up),
            "Down" => Some(LaneKind::Down),
            "Special" => Some(LaneKind::Special),
            _ => None,
        }
    }

    pub fn key(&self) -> Key {
        match self {
            LaneKind::Left => Key::Left,
            LaneKind::Right => Key::Right,
            LaneKind::Up => Key::Up,
            LaneKind::Down => Key::Down,
            LaneKind::Special => Key::Special,
        }
    }
}

/// A column of notes judged against one key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lane {
    kind: LaneKind,
    /// Horizontal screen position
    location: i32,
    target_height: i32,
    notes: Vec<Note>,
    /// Index of the one note eligible for judging
    cursor: usize,
}

impl Lane {
    pub fn new(kind: LaneKind, location: i32, target_height: i32) -> Self {
        Self {
            kind,
            location,
            target_height,
            notes: Vec::new(),
            cursor: 0,
        }
    }

    /// Append a note; insertion order is fall order
    pub fn push_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    pub fn kind(&self) -> LaneKind {
        self.kind
    }

    pub fn key(&self) -> Key {
        self.kind.key()
    }

    pub fn location(&self) -> i32 {
        self.location
    }

    pub fn target_height(&self) -> i32 {
        self.target_height
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Note currently eligible for judging
    pub fn current_note(&self) -> Option<&Note> {
        self.notes.get(self.cursor)
    }

    /// Set every note's fall speed
    pub fn set_speed(&mut self, speed: i32) {
        for note in &mut self.notes {
            note.set_speed(speed);
        }
    }

    /// Advance one frame: move notes, judge the cursor note, re-sync speeds.
    /// Returns the score delta.
    pub fn step(&mut self, input: &TickInput, evaluator: &mut AccuracyEvaluator, ctx: &mut SimContext) -> i32 {
        for note in &mut self.notes {
            note.update(ctx.frame);
        }

        let key = self.key();
        let mut points = 0;
        if let Some(note) = self.notes.get_mut(self.cursor) {
            let verdict = note.judge(input, key, self.target_height, evaluator, ctx);
            points = verdict.points;
            if verdict.clear_lane {
                let cleared = self.clear_active();
                log::debug!("{} lane cleared {} notes", self.kind.as_str(), cleared);
            }
            if self.notes[self.cursor].is_completed() {
                self.cursor += 1;
            }
        }

        // Speed changes made while judging apply from the next frame
        self.set_speed(ctx.fall_speed);
        points
    }

    /// Complete every active note, regardless of the cursor
    pub fn clear_active(&mut self) -> usize {
        let mut count = 0;
        for note in self.notes.iter_mut().filter(|n| n.is_active()) {
            note.deactivate();
            count += 1;
        }
        count
    }

    /// Silently complete active normal notes within `radius` of `point`.
    /// Returns how many were removed.
    pub fn deactivate_colliding(&mut self, point: Vec2, radius: f32) -> usize {
        let x = self.location as f32;
        let mut count = 0;
        for note in self.notes.iter_mut() {
            if note.is_normal() && note.is_active() && within_radius(point, Vec2::new(x, note.y() as f32), radius) {
                note.deactivate();
                count += 1;
            }
        }
        count
    }

    /// True once every note has been completed
    pub fn is_finished(&self) -> bool {
        self.notes.iter().all(|n| n.is_completed())
    }
}
