//! Press accuracy evaluation and the timed double-score effect
//!
//! Converts the vertical distance between a note and the target height into a
//! grade, keeps the last grade/effect label around for a short display
//! window, and owns the score multiplier.

use serde::{Deserialize, Serialize};

/// Radius tiers (pixels, inclusive)
pub const PERFECT_RADIUS: i32 = 15;
pub const GOOD_RADIUS: i32 = 50;
pub const BAD_RADIUS: i32 = 100;
pub const MISS_RADIUS: i32 = 200;

/// Radius within which an effect note triggers
pub const EFFECT_RADIUS: i32 = 50;

/// Frames a grade or effect label stays visible
pub const LABEL_DISPLAY_FRAMES: u32 = 30;

/// Frames a double-score activation lasts
pub const DOUBLE_SCORE_FRAMES: u32 = 480;

/// Accuracy grade, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    Perfect,
    Good,
    Bad,
    Miss,
}

impl Grade {
    /// Classify a press distance, `None` when it lies outside every tier
    pub fn from_distance(distance: i32) -> Option<Self> {
        let distance = distance.abs();
        if distance <= PERFECT_RADIUS {
            Some(Grade::Perfect)
        } else if distance <= GOOD_RADIUS {
            Some(Grade::Good)
        } else if distance <= BAD_RADIUS {
            Some(Grade::Bad)
        } else if distance <= MISS_RADIUS {
            Some(Grade::Miss)
        } else {
            None
        }
    }

    /// Score before the multiplier is applied
    pub fn base_score(self) -> i32 {
        match self {
            Grade::Perfect => 10,
            Grade::Good => 5,
            Grade::Bad => -1,
            Grade::Miss => -5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::Perfect => "PERFECT",
            Grade::Good => "GOOD",
            Grade::Bad => "BAD",
            Grade::Miss => "MISS",
        }
    }
}

/// A scored press (or timeout)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgement {
    pub grade: Grade,
    /// Score after the active multiplier
    pub points: i32,
}

/// Result of judging an effect note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectOutcome {
    /// Pressed within the effect radius
    Activated,
    /// Fell off the bottom of the playfield unpressed
    NotActivated,
    /// Still pending
    NotScored,
}

/// Per-level judging state: last label shown and the score multiplier
#[derive(Debug, Clone)]
pub struct AccuracyEvaluator {
    /// Height at which an unpressed note counts as fallen off screen
    screen_height: i32,
    label: Option<&'static str>,
    label_frames_remaining: u32,
    multiplier: i32,
    effect_frames_remaining: u32,
}

impl AccuracyEvaluator {
    pub fn new(screen_height: i32) -> Self {
        Self {
            screen_height,
            label: None,
            label_frames_remaining: 0,
            multiplier: 1,
            effect_frames_remaining: 0,
        }
    }

    /// Judge a note edge at height `y`.
    ///
    /// A press is graded by its distance to `target_height`. Without a press,
    /// a note that has reached the bottom of the playfield is a forced MISS.
    /// Returns `None` while the note is still pending.
    pub fn evaluate_score(&mut self, y: i32, target_height: i32, pressed: bool) -> Option<Judgement> {
        let grade = if pressed {
            Grade::from_distance(y - target_height)?
        } else if y >= self.screen_height {
            Grade::Miss
        } else {
            return None;
        };

        self.show_label(grade.label());
        Some(Judgement {
            grade,
            points: grade.base_score() * self.multiplier,
        })
    }

    /// Judge an effect note at height `y`, showing `label` on activation
    pub fn evaluate_effect(
        &mut self,
        y: i32,
        target_height: i32,
        pressed: bool,
        label: &'static str,
    ) -> EffectOutcome {
        if pressed {
            if (y - target_height).abs() <= EFFECT_RADIUS {
                self.show_label(label);
                return EffectOutcome::Activated;
            }
        } else if y >= self.screen_height {
            return EffectOutcome::NotActivated;
        }
        EffectOutcome::NotScored
    }

    /// Record an unconditional MISS (e.g. a hold released outside every tier).
    /// The penalty is not scaled by the multiplier.
    pub fn force_miss(&mut self) -> Judgement {
        self.show_label(Grade::Miss.label());
        Judgement {
            grade: Grade::Miss,
            points: Grade::Miss.base_score(),
        }
    }

    /// Double the multiplier and restart the effect window
    pub fn activate_double_score(&mut self) {
        self.multiplier *= 2;
        self.effect_frames_remaining = DOUBLE_SCORE_FRAMES;
        log::debug!("Double score active: x{}", self.multiplier);
    }

    /// Advance display and effect timers by one frame
    pub fn tick(&mut self) {
        if self.label_frames_remaining > 0 {
            self.label_frames_remaining -= 1;
            if self.label_frames_remaining == 0 {
                self.label = None;
            }
        }

        // The multiplier survives the tick that runs the timer down to 0 and
        // resets on the one after, so a window covers the full duration
        if self.effect_frames_remaining > 0 {
            self.effect_frames_remaining -= 1;
        } else if self.multiplier != 1 {
            self.multiplier = 1;
            log::debug!("Double score expired");
        }
    }

    /// Label to draw this frame, if any
    pub fn current_label(&self) -> Option<&'static str> {
        self.label
    }

    pub fn label_frames_remaining(&self) -> u32 {
        self.label_frames_remaining
    }

    pub fn multiplier(&self) -> i32 {
        self.multiplier
    }

    pub fn effect_frames_remaining(&self) -> u32 {
        self.effect_frames_remaining
    }

    fn show_label(&mut self, label: &'static str) {
        self.label = Some(label);
        self.label_frames_remaining = LABEL_DISPLAY_FRAMES;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{TARGET_HEIGHT, WINDOW_HEIGHT};
    use proptest::prelude::*;

    fn evaluator() -> AccuracyEvaluator {
        AccuracyEvaluator::new(WINDOW_HEIGHT)
    }

    #[test]
    fn test_tier_boundaries_inclusive() {
        let mut acc = evaluator();
        let cases = [
            (0, Some(10)),
            (15, Some(10)),
            (16, Some(5)),
            (50, Some(5)),
            (51, Some(-1)),
            (100, Some(-1)),
            (101, Some(-5)),
            (200, Some(-5)),
            (201, None),
        ];
        for (distance, expected) in cases {
            let result = acc.evaluate_score(TARGET_HEIGHT - distance, TARGET_HEIGHT, true);
            assert_eq!(result.map(|j| j.points), expected, "distance {distance}");
        }
    }

    #[test]
    fn test_perfect_press_scenario() {
        let mut acc = evaluator();
        let result = acc.evaluate_score(650, 657, true).unwrap();
        assert_eq!(result.grade, Grade::Perfect);
        assert_eq!(result.points, 10);
        assert_eq!(acc.current_label(), Some("PERFECT"));
    }

    #[test]
    fn test_unpressed_on_screen_is_pending() {
        let mut acc = evaluator();
        assert_eq!(acc.evaluate_score(450, 657, false), None);
        assert_eq!(acc.current_label(), None);
    }

    #[test]
    fn test_unpressed_off_screen_is_miss() {
        let mut acc = evaluator();
        let result = acc.evaluate_score(WINDOW_HEIGHT, TARGET_HEIGHT, false).unwrap();
        assert_eq!(result.grade, Grade::Miss);
        assert_eq!(result.points, -5);
    }

    #[test]
    fn test_press_outside_tiers_does_not_time_out() {
        // Timeout only applies without a press
        let mut acc = evaluator();
        assert_eq!(acc.evaluate_score(WINDOW_HEIGHT + 300, TARGET_HEIGHT, true), None);
    }

    #[test]
    fn test_double_score_lasts_480_frames() {
        let mut acc = evaluator();
        acc.activate_double_score();
        for _ in 0..DOUBLE_SCORE_FRAMES {
            acc.tick();
        }
        assert_eq!(acc.effect_frames_remaining(), 0);
        assert_eq!(acc.multiplier(), 2);
        assert_eq!(acc.evaluate_score(TARGET_HEIGHT, TARGET_HEIGHT, true).unwrap().points, 20);

        acc.tick();
        assert_eq!(acc.multiplier(), 1);
        assert_eq!(acc.evaluate_score(TARGET_HEIGHT, TARGET_HEIGHT, true).unwrap().points, 10);
    }

    #[test]
    fn test_double_score_stacks_and_resets_window() {
        let mut acc = evaluator();
        acc.activate_double_score();
        for _ in 0..100 {
            acc.tick();
        }
        acc.activate_double_score();
        assert_eq!(acc.multiplier(), 4);
        assert_eq!(acc.effect_frames_remaining(), DOUBLE_SCORE_FRAMES);

        for _ in 0..DOUBLE_SCORE_FRAMES {
            acc.tick();
        }
        assert_eq!(acc.multiplier(), 4);
        acc.tick();
        assert_eq!(acc.multiplier(), 1);
    }

    #[test]
    fn test_tick_without_effect_keeps_multiplier() {
        let mut acc = evaluator();
        acc.tick();
        assert_eq!(acc.multiplier(), 1);
        assert_eq!(acc.effect_frames_remaining(), 0);
    }

    #[test]
    fn test_label_clears_after_display_window() {
        let mut acc = evaluator();
        acc.evaluate_score(TARGET_HEIGHT, TARGET_HEIGHT, true);
        for _ in 0..LABEL_DISPLAY_FRAMES - 1 {
            acc.tick();
        }
        assert_eq!(acc.current_label(), Some("PERFECT"));
        acc.tick();
        assert_eq!(acc.current_label(), None);
    }

    #[test]
    fn test_effect_radius() {
        let mut acc = evaluator();
        assert_eq!(
            acc.evaluate_effect(TARGET_HEIGHT - 50, TARGET_HEIGHT, true, "Speed Up"),
            EffectOutcome::Activated
        );
        assert_eq!(acc.current_label(), Some("Speed Up"));
        assert_eq!(
            acc.evaluate_effect(TARGET_HEIGHT - 51, TARGET_HEIGHT, true, "Speed Up"),
            EffectOutcome::NotScored
        );
        assert_eq!(
            acc.evaluate_effect(WINDOW_HEIGHT, TARGET_HEIGHT, false, "Speed Up"),
            EffectOutcome::NotActivated
        );
        assert_eq!(
            acc.evaluate_effect(300, TARGET_HEIGHT, false, "Speed Up"),
            EffectOutcome::NotScored
        );
    }

    #[test]
    fn test_force_miss_is_unscaled() {
        let mut acc = evaluator();
        acc.activate_double_score();
        let j = acc.force_miss();
        assert_eq!(j.points, -5);
        assert_eq!(acc.current_label(), Some("MISS"));
    }

    fn tier_rank(distance: i32) -> u8 {
        match Grade::from_distance(distance) {
            Some(grade) => grade as u8,
            None => 4,
        }
    }

    proptest! {
        #[test]
        fn prop_classification_is_monotonic(a in 0i32..1000, b in 0i32..1000) {
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(tier_rank(near) <= tier_rank(far));
        }

        #[test]
        fn prop_points_scale_with_multiplier(distance in 0i32..=200, doublings in 0u32..4) {
            let mut acc = AccuracyEvaluator::new(WINDOW_HEIGHT);
            for _ in 0..doublings {
                acc.activate_double_score();
            }
            let judgement = acc
                .evaluate_score(TARGET_HEIGHT - distance, TARGET_HEIGHT, true)
                .unwrap();
            prop_assert_eq!(judgement.points, judgement.grade.base_score() * (1 << doublings));
        }
    }
}
