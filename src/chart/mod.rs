//! Level chart loading
//!
//! A chart is a comma-separated table. `Lane,<type>,<x>` rows declare lanes;
//! every other row is `<laneType>,<noteType>,<frame>` and appends a note to
//! the most recently declared lane of that type. Note rows appear in fall
//! order.

mod error;

pub use error::ChartError;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::lane::{Lane, LaneKind};
use crate::sim::note::{EffectKind, Note};

/// Note types a chart row can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteType {
    Normal,
    Hold,
    Bomb,
    DoubleScore,
    SpeedUp,
    SlowDown,
}

impl NoteType {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "Normal" => Some(NoteType::Normal),
            "Hold" => Some(NoteType::Hold),
            "Bomb" => Some(NoteType::Bomb),
            "DoubleScore" => Some(NoteType::DoubleScore),
            "SpeedUp" => Some(NoteType::SpeedUp),
            "SlowDown" => Some(NoteType::SlowDown),
            _ => None,
        }
    }

    /// Fresh, inactive note of this type
    pub fn to_note(self, appearance_frame: u32) -> Note {
        match self {
            NoteType::Normal => Note::normal(appearance_frame),
            NoteType::Hold => Note::hold(appearance_frame),
            NoteType::Bomb => Note::effect(EffectKind::Bomb, appearance_frame),
            NoteType::DoubleScore => Note::effect(EffectKind::DoubleScore, appearance_frame),
            NoteType::SpeedUp => Note::effect(EffectKind::SpeedUp, appearance_frame),
            NoteType::SlowDown => Note::effect(EffectKind::SlowDown, appearance_frame),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneDecl {
    pub kind: LaneKind,
    pub location: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDecl {
    /// Index into `Chart::lanes`
    pub lane: usize,
    pub note: NoteType,
    pub appearance_frame: u32,
}

/// Parsed chart, kept so a level can be rebuilt on reset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chart {
    pub lanes: Vec<LaneDecl>,
    pub notes: Vec<NoteDecl>,
}

impl Chart {
    /// Read and parse a chart file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ChartError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ChartError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let chart = Self::parse(&text)?;
        log::info!(
            "Loaded chart {}: {} lanes, {} notes",
            path.display(),
            chart.lanes.len(),
            chart.notes.len()
        );
        Ok(chart)
    }

    pub fn parse(text: &str) -> Result<Self, ChartError> {
        let mut chart = Chart::default();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }

            let mut fields = raw.split(',').map(str::trim);
            let first = fields.next().unwrap_or_default();
            let second = fields
                .next()
                .filter(|s| !s.is_empty())
                .ok_or(ChartError::MissingField { line, field: "type" })?;
            let third = fields.next().filter(|s| !s.is_empty());

            if first == "Lane" {
                let kind = parse_lane_kind(second, line)?;
                let location = parse_number(third, "x position", line)?;
                chart.lanes.push(LaneDecl { kind, location });
                continue;
            }

            let kind = parse_lane_kind(first, line)?;
            let note = NoteType::from_name(second).ok_or_else(|| ChartError::UnknownNoteType {
                line,
                name: second.to_string(),
            })?;
            let appearance_frame = parse_number(third, "frame", line)?;

            // Later declarations of the same lane type take over
            match chart.lanes.iter().rposition(|l| l.kind == kind) {
                Some(lane) => chart.notes.push(NoteDecl {
                    lane,
                    note,
                    appearance_frame,
                }),
                None => log::warn!("line {line}: no {} lane declared, note dropped", kind.as_str()),
            }
        }

        Ok(chart)
    }

    /// Fresh lanes with their notes, ready to play
    pub fn build_lanes(&self, target_height: i32) -> Vec<Lane> {
        let mut lanes: Vec<Lane> = self
            .lanes
            .iter()
            .map(|decl| Lane::new(decl.kind, decl.location, target_height))
            .collect();
        for decl in &self.notes {
            if let Some(lane) = lanes.get_mut(decl.lane) {
                lane.push_note(decl.note.to_note(decl.appearance_frame));
            }
        }
        lanes
    }
}

fn parse_lane_kind(name: &str, line: usize) -> Result<LaneKind, ChartError> {
    LaneKind::from_name(name).ok_or_else(|| ChartError::UnknownLaneType {
        line,
        name: name.to_string(),
    })
}

fn parse_number<T: std::str::FromStr>(
    value: Option<&str>,
    field: &'static str,
    line: usize,
) -> Result<T, ChartError> {
    let value = value.ok_or(ChartError::MissingField { line, field })?;
    value.parse().map_err(|_| ChartError::InvalidNumber {
        line,
        value: value.to_string(),
    })
}
