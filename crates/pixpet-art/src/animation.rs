//! Idle animation variator
//!
//! Produces alternate frames from a finished canvas and its hints. Every
//! action edits a fresh copy and only touches hinted cells, plus the one
//! cell a shifted pixel moves into. Moves only land on transparent cells.
//!
//! Draw order for one random frame:
//! 1. fire check (an action fires when the draw is below [`ACTION_CHANCE`])
//! 2. action pick from [`action_pool`]
//! 3. the action's own draws (count, direction, then one pick per pixel)

use serde::{Deserialize, Serialize};

use crate::canvas::{slot, AnimationHints, PixelCanvas, Point};
use crate::params::LimbStage;
use crate::rng::ArtRng;

/// Probability that a random frame differs from the base frame
pub const ACTION_CHANCE: f64 = 0.3;

/// Upper bound on pixels touched by one gesture or shimmer
const MAX_TOUCHED: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationAction {
    /// Eyes close to outline color
    Blink,
    /// Appendage pixels shift sideways
    Gesture,
    /// A few body pixels flash the highlight color
    Shimmer,
    /// Limb pixels shift up or down
    ArmSway,
    /// Limb pixels hop up one row
    FootTap,
    /// Held item bobs; same motion as arm sway
    OrbFloat,
}

impl AnimationAction {
    pub fn name(self) -> &'static str {
        match self {
            AnimationAction::Blink => "blink",
            AnimationAction::Gesture => "gesture",
            AnimationAction::Shimmer => "shimmer",
            AnimationAction::ArmSway => "arm_sway",
            AnimationAction::FootTap => "foot_tap",
            AnimationAction::OrbFloat => "orb_float",
        }
    }
}

impl std::fmt::Display for AnimationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Actions unlocked at a limb stage, in pick order
pub fn action_pool(stage: LimbStage) -> Vec<AnimationAction> {
    let mut pool = vec![
        AnimationAction::Blink,
        AnimationAction::Gesture,
        AnimationAction::Shimmer,
    ];
    if stage >= LimbStage::Jointed {
        pool.push(AnimationAction::ArmSway);
    }
    if stage >= LimbStage::Grasping {
        pool.push(AnimationAction::FootTap);
    }
    if stage >= LimbStage::Complete {
        pool.push(AnimationAction::OrbFloat);
    }
    pool
}

/// Decide whether a frame animates and, if so, which action it plays
pub fn pick_action(stage: LimbStage, rng: &mut dyn ArtRng) -> Option<AnimationAction> {
    if !rng.chance(ACTION_CHANCE) {
        return None;
    }
    let pool = action_pool(stage);
    Some(pool[rng.pick_index(pool.len())])
}

/// Play one action on a copy of `base`
pub fn apply_action(
    action: AnimationAction,
    base: &PixelCanvas,
    hints: &AnimationHints,
    rng: &mut dyn ArtRng,
) -> PixelCanvas {
    match action {
        AnimationAction::Blink => blink(base, hints),
        AnimationAction::Gesture => {
            let dir = if rng.coin() { 1 } else { -1 };
            shift_pixels(base, &hints.gesture_pixels, (0, dir), rng)
        }
        AnimationAction::Shimmer => shimmer(base, hints, rng),
        AnimationAction::ArmSway | AnimationAction::OrbFloat => {
            let dir = if rng.coin() { 1 } else { -1 };
            shift_pixels(base, &hints.gesture_pixels, (dir, 0), rng)
        }
        AnimationAction::FootTap => shift_pixels(base, &hints.gesture_pixels, (-1, 0), rng),
    }
}

/// One idle frame: usually the base frame, sometimes a single action
pub fn generate_random_frame(
    base: &PixelCanvas,
    hints: &AnimationHints,
    stage: LimbStage,
    rng: &mut dyn ArtRng,
) -> PixelCanvas {
    match pick_action(stage, rng) {
        Some(action) => {
            log::debug!("Idle frame plays {}", action);
            apply_action(action, base, hints, rng)
        }
        None => base.clone(),
    }
}

/// `[base, f1, .., f_count]`, each extra frame from [`generate_random_frame`]
pub fn generate_frames(
    base: &PixelCanvas,
    hints: &AnimationHints,
    stage: LimbStage,
    count: usize,
    rng: &mut dyn ArtRng,
) -> Vec<PixelCanvas> {
    let mut frames = Vec::with_capacity(count + 1);
    frames.push(base.clone());
    for _ in 0..count {
        frames.push(generate_random_frame(base, hints, stage, rng));
    }
    frames
}

/// Fixed four-frame cycle: `[base, blink, gesture, shimmer]`
pub fn classic_frames(
    base: &PixelCanvas,
    hints: &AnimationHints,
    rng: &mut dyn ArtRng,
) -> Vec<PixelCanvas> {
    vec![
        base.clone(),
        apply_action(AnimationAction::Blink, base, hints, rng),
        apply_action(AnimationAction::Gesture, base, hints, rng),
        apply_action(AnimationAction::Shimmer, base, hints, rng),
    ]
}

fn blink(base: &PixelCanvas, hints: &AnimationHints) -> PixelCanvas {
    let mut frame = base.clone();
    for &p in &hints.eye_positions {
        if frame.at(p).is_some_and(slot::is_eye) {
            frame.set_at(p, slot::OUTLINE);
        }
    }
    frame
}

fn touch_count(rng: &mut dyn ArtRng) -> usize {
    ((rng.next_f64() * MAX_TOUCHED as f64).floor() as usize + 1).min(MAX_TOUCHED)
}

fn shimmer(base: &PixelCanvas, hints: &AnimationHints, rng: &mut dyn ArtRng) -> PixelCanvas {
    let mut frame = base.clone();
    let candidates = &hints.shimmer_pixels;
    if candidates.is_empty() {
        return frame;
    }
    for _ in 0..touch_count(rng) {
        let p = candidates[rng.pick_index(candidates.len())];
        if frame.in_bounds(p.row, p.col) {
            frame.set_at(p, slot::HIGHLIGHT);
        }
    }
    frame
}

/// Move 1-3 hinted pixels one cell, into transparent cells only
fn shift_pixels(
    base: &PixelCanvas,
    candidates: &[Point],
    (d_row, d_col): (i32, i32),
    rng: &mut dyn ArtRng,
) -> PixelCanvas {
    let mut frame = base.clone();
    if candidates.is_empty() {
        return frame;
    }
    for _ in 0..touch_count(rng) {
        let from = candidates[rng.pick_index(candidates.len())];
        let to = from.offset(d_row, d_col);
        let Some(value) = frame.at(from) else {
            continue;
        };
        if value != slot::TRANSPARENT && frame.at(to) == Some(slot::TRANSPARENT) {
            frame.set_at(to, value);
            frame.set_at(from, slot::TRANSPARENT);
        }
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{CountingRng, CreatureRng, ScriptedRng};

    fn fixture() -> (PixelCanvas, AnimationHints) {
        let canvas = PixelCanvas::from_sprite_lines(&[
            "........",
            ".111111.",
            ".156561.",
            ".122221.",
            "2111111.",
            "........",
        ]);
        let hints = AnimationHints {
            eye_positions: vec![Point::new(2, 3), Point::new(2, 5)],
            gesture_pixels: vec![Point::new(4, 0)],
            shimmer_pixels: canvas
                .cells()
                .filter(|&(_, v)| v != slot::TRANSPARENT && !slot::is_eye(v))
                .map(|(p, _)| p)
                .collect(),
        };
        (canvas, hints)
    }

    #[test]
    fn test_pool_grows_with_stage() {
        assert_eq!(action_pool(LimbStage::Bare).len(), 3);
        assert_eq!(action_pool(LimbStage::Sticks).len(), 3);
        assert_eq!(action_pool(LimbStage::Jointed).len(), 4);
        assert_eq!(action_pool(LimbStage::Grasping).len(), 5);
        assert_eq!(action_pool(LimbStage::Winged).len(), 5);
        assert_eq!(
            action_pool(LimbStage::Complete).last(),
            Some(&AnimationAction::OrbFloat)
        );
    }

    #[test]
    fn test_no_action_returns_base() {
        let (canvas, hints) = fixture();
        let mut rng = CountingRng::new(ScriptedRng::constant(0.5));
        let frame = generate_random_frame(&canvas, &hints, LimbStage::Complete, &mut rng);
        assert_eq!(frame, canvas);
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn test_blink_closes_eyes() {
        let (canvas, hints) = fixture();
        let frame = apply_action(
            AnimationAction::Blink,
            &canvas,
            &hints,
            &mut ScriptedRng::constant(0.0),
        );
        assert_eq!(frame.row(2), Some(&[0, 1, 5, 1, 5, 1, 1, 0][..]));
        assert_eq!(canvas.diff(&frame).len(), 2);
    }

    #[test]
    fn test_gesture_moves_into_empty_cell() {
        let (canvas, hints) = fixture();
        // direction draw 0.2 -> left: (4,0) has nowhere to go
        let stuck = apply_action(
            AnimationAction::Gesture,
            &canvas,
            &hints,
            &mut ScriptedRng::new(vec![0.2, 0.0]),
        );
        assert_eq!(stuck, canvas);

        // arm sway down: (4,0) -> (5,0)
        let moved = apply_action(
            AnimationAction::ArmSway,
            &canvas,
            &hints,
            &mut ScriptedRng::new(vec![0.9, 0.0]),
        );
        assert_eq!(moved.get(4, 0), Some(slot::TRANSPARENT));
        assert_eq!(moved.get(5, 0), Some(slot::BODY));

        // foot tap: (3,0) is empty, so the pixel hops up
        let tapped = apply_action(
            AnimationAction::FootTap,
            &canvas,
            &hints,
            &mut ScriptedRng::constant(0.0),
        );
        assert_eq!(tapped.get(3, 0), Some(slot::BODY));
        assert_eq!(tapped.get(4, 0), Some(slot::TRANSPARENT));
    }

    #[test]
    fn test_shimmer_touches_at_most_three() {
        let (canvas, hints) = fixture();
        for i in 0..50 {
            let mut rng = CreatureRng::from_seed(&format!("shimmer-{}", i));
            let frame = apply_action(AnimationAction::Shimmer, &canvas, &hints, &mut rng);
            let changed = canvas.diff(&frame);
            assert!(changed.len() <= 3);
            for p in changed {
                assert!(hints.shimmer_pixels.contains(&p));
                assert_eq!(frame.at(p), Some(slot::HIGHLIGHT));
            }
        }
    }

    #[test]
    fn test_empty_hints_return_base() {
        let (canvas, _) = fixture();
        let empty = AnimationHints::default();
        for action in action_pool(LimbStage::Complete) {
            let mut rng = CreatureRng::from_seed("empty");
            assert_eq!(apply_action(action, &canvas, &empty, &mut rng), canvas);
        }
    }

    #[test]
    fn test_frames_stay_within_hints() {
        let (canvas, hints) = fixture();
        let allowed = |p: &Point| {
            hints.eye_positions.contains(p)
                || hints.shimmer_pixels.contains(p)
                || hints
                    .gesture_pixels
                    .iter()
                    .any(|g| (g.row - p.row).abs() + (g.col - p.col).abs() <= 1)
        };

        let mut rng = CreatureRng::from_seed("frames");
        let frames = generate_frames(&canvas, &hints, LimbStage::Complete, 64, &mut rng);
        assert_eq!(frames.len(), 65);
        assert_eq!(frames[0], canvas);
        for frame in &frames[1..] {
            for p in canvas.diff(frame) {
                assert!(allowed(&p), "unexpected change at {:?}", p);
            }
        }
    }

    #[test]
    fn test_classic_frames() {
        let (canvas, hints) = fixture();
        let frames = classic_frames(&canvas, &hints, &mut CreatureRng::from_seed("classic"));
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0], canvas);
        assert!(!frames[1].contains_slot(slot::PUPIL));
    }
}
