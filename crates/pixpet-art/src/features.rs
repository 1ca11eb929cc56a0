//! Feature placement
//!
//! Burns the face, appendages and limbs into a rasterized body and records
//! the animation hints. Appendages need both their flag (already gated by
//! progress) and a minimum limb stage:
//! - ears, tail: stage >= 2
//! - horns: stage >= 3
//! - wings: stage >= 4
//!
//! Limbs start as single-pixel sticks at stage 1, widen to two pixels with a
//! joint highlight at stage 2 and grow hands and shoes at stage 3.
//!
//! The tail direction is the only generator draw taken here.

use crate::canvas::{round_to_cell, slot, AnimationHints, PixelCanvas, Point};
use crate::params::{CreatureParams, LimbStage};
use crate::rng::ArtRng;
use crate::silhouette::Bounds;

/// Canvas with features burned in, plus the hints gathered on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureResult {
    pub canvas: PixelCanvas,
    pub hints: AnimationHints,
}

struct Painter {
    canvas: PixelCanvas,
    eyes: Vec<Point>,
    gestures: Vec<Point>,
}

impl Painter {
    fn face(&mut self, row: i32, col: i32, value: u8) {
        self.canvas.set(row, col, value);
    }

    /// Paint a pupil and remember it as the eye's blink target
    fn pupil(&mut self, row: i32, col: i32) {
        if self.canvas.in_bounds(row, col) {
            self.canvas.set(row, col, slot::PUPIL);
            push_unique(&mut self.eyes, Point::new(row, col));
        }
    }

    fn limb(&mut self, row: i32, col: i32, value: u8) {
        if self.canvas.in_bounds(row, col) {
            self.canvas.set(row, col, value);
            push_unique(&mut self.gestures, Point::new(row, col));
        }
    }

    fn finish(self) -> FeatureResult {
        let shimmer_pixels = self
            .canvas
            .cells()
            .filter(|&(_, v)| v != slot::TRANSPARENT && !slot::is_eye(v))
            .map(|(p, _)| p)
            .collect();
        FeatureResult {
            hints: AnimationHints {
                eye_positions: self.eyes,
                gesture_pixels: self.gestures,
                shimmer_pixels,
            },
            canvas: self.canvas,
        }
    }
}

fn push_unique(points: &mut Vec<Point>, point: Point) {
    if !points.contains(&point) {
        points.push(point);
    }
}

/// Place eyes, mouth, appendages and limbs on a copy of `canvas`
pub fn place_features(
    canvas: &PixelCanvas,
    params: &CreatureParams,
    head: &Bounds,
    body: &Bounds,
    rng: &mut dyn ArtRng,
) -> FeatureResult {
    let mut painter = Painter {
        canvas: canvas.clone(),
        eyes: Vec::new(),
        gestures: Vec::new(),
    };
    let stage = params.limb_stage;

    let eye_row = place_eyes(&mut painter, params, head);
    place_mouth(&mut painter, head, eye_row);

    if params.has_ears && stage >= LimbStage::Jointed {
        place_ears(&mut painter, params, head);
    }
    if params.has_horns && stage >= LimbStage::Grasping {
        place_horns(&mut painter, params, head);
    }
    if params.has_tail && stage >= LimbStage::Jointed {
        place_tail(&mut painter, params, head, body, rng);
    }
    if params.has_wings && stage >= LimbStage::Winged {
        place_wings(&mut painter, params, head, body);
    }
    if stage >= LimbStage::Sticks {
        place_arms(&mut painter, params, body);
        place_legs(&mut painter, params, body);
    }

    let result = painter.finish();
    log::trace!(
        "Features at stage {}: {} eye, {} gesture, {} shimmer hints",
        stage,
        result.hints.eye_positions.len(),
        result.hints.gesture_pixels.len(),
        result.hints.shimmer_pixels.len()
    );
    result
}

/// Returns the eye row
fn place_eyes(painter: &mut Painter, params: &CreatureParams, head: &Bounds) -> i32 {
    let eye_row = head.center_row();
    let center = head.center_col();
    let offset = round_to_cell(head.width() as f64 * params.eye_spacing * 0.5).max(1);

    for col in [center - offset, center + offset] {
        match params.eye_size {
            1 => {}
            2 => {
                painter.face(eye_row - 1, col, slot::EYE_WHITE);
                painter.face(eye_row - 1, col + 1, slot::EYE_WHITE);
                painter.face(eye_row, col + 1, slot::EYE_WHITE);
            }
            _ => {
                for dc in -1..=1 {
                    painter.face(eye_row - 1, col + dc, slot::EYE_WHITE);
                    if dc != 0 {
                        painter.face(eye_row, col + dc, slot::EYE_WHITE);
                    }
                }
            }
        }
        painter.pupil(eye_row, col);
    }

    eye_row
}

fn place_mouth(painter: &mut Painter, head: &Bounds, eye_row: i32) {
    let drop = round_to_cell(head.height() as f64 * 0.3).max(2);
    let row = (head.bottom - 1).min(eye_row + drop);
    let width = round_to_cell(head.width() as f64 * 0.2).max(2);
    let start = head.center_col() - width / 2;
    for col in start..start + width {
        painter.face(row, col, slot::MOUTH);
    }
}

fn place_ears(painter: &mut Painter, params: &CreatureParams, head: &Bounds) {
    let ear_h = round_to_cell(head.height() as f64 * params.ear_size).max(2);
    for i in 0..ear_h {
        let row = head.top - ear_h + i;
        painter.limb(row, head.left + i, slot::OUTLINE);
        painter.limb(row, head.right - i, slot::OUTLINE);
        if i > 0 {
            painter.limb(row, head.left + i + 1, slot::BODY);
            painter.limb(row, head.right - i - 1, slot::BODY);
        }
    }
}

fn place_horns(painter: &mut Painter, params: &CreatureParams, head: &Bounds) {
    let horn_h = round_to_cell(head.height() as f64 * params.horn_size * 1.5).max(2);
    let inset = round_to_cell(head.width() as f64 * 0.2);
    let base_left = head.left + inset;
    let base_right = head.right - inset;
    for i in 0..horn_h {
        let row = head.top - horn_h + i;
        painter.limb(row, base_left - i / 2, slot::ACCENT_A);
        painter.limb(row, base_right + i / 2, slot::ACCENT_A);
    }
}

fn place_tail(
    painter: &mut Painter,
    params: &CreatureParams,
    head: &Bounds,
    body: &Bounds,
    rng: &mut dyn ArtRng,
) {
    let tail_len = round_to_cell(head.width() as f64 * params.tail_length * 2.0).max(2);
    let tail_row = body.center_row();
    let dir = if rng.coin() { 1 } else { -1 };
    let start = if dir > 0 { body.right + 1 } else { body.left - 1 };
    for i in 0..tail_len {
        let wave = round_to_cell((i as f64 * 0.8).sin() * 1.5);
        painter.limb(tail_row + wave, start + dir * i, slot::ACCENT_B);
    }
}

fn place_wings(painter: &mut Painter, params: &CreatureParams, head: &Bounds, body: &Bounds) {
    let wing_h = round_to_cell(body.height() as f64 * params.wing_size).max(2);
    let wing_w = round_to_cell(head.width() as f64 * params.wing_size * 1.5).max(2);
    for r in 0..wing_h {
        let width = round_to_cell(wing_w as f64 * (1.0 - r as f64 / wing_h as f64)).max(1);
        let row = body.top + r;
        for c in 0..width {
            let value = if r == 0 || c == width - 1 {
                slot::HIGHLIGHT
            } else {
                slot::ACCENT_A
            };
            painter.limb(row, body.left - 1 - c, value);
            painter.limb(row, body.right + 1 + c, value);
        }
    }
}

fn place_arms(painter: &mut Painter, params: &CreatureParams, body: &Bounds) {
    let stage = params.limb_stage;
    let arm_len = round_to_cell(body.height() as f64 * params.arm_length).max(1);
    let arm_row = body.top + round_to_cell(body.height() as f64 * 0.25);
    let elbow = arm_row + arm_len / 2;

    // (inner column, outward step) for each side
    for (inner, out) in [(body.left - 1, -1), (body.right + 1, 1)] {
        for i in 0..arm_len {
            let row = arm_row + i;
            if stage == LimbStage::Sticks {
                painter.limb(row, inner, slot::BODY);
                continue;
            }
            let joint = if row == elbow {
                slot::BODY_SECONDARY
            } else {
                slot::BODY
            };
            painter.limb(row, inner, joint);
            painter.limb(row, inner + out, slot::BODY);
        }

        if stage >= LimbStage::Grasping {
            let hand = arm_row + arm_len;
            for dc in 0..3 {
                painter.limb(hand, inner + out * dc, slot::OUTLINE);
            }
            painter.limb(hand + 1, inner + out, slot::OUTLINE);
        }
    }
}

fn place_legs(painter: &mut Painter, params: &CreatureParams, body: &Bounds) {
    let stage = params.limb_stage;
    let leg_len = round_to_cell(body.height() as f64 * params.leg_length).max(1);
    let spacing = round_to_cell(body.width() as f64 * 0.25).max(1);
    let center = body.center_col();

    for (col, out) in [(center - spacing, -1), (center + spacing, 1)] {
        if stage == LimbStage::Sticks {
            for i in 1..=leg_len {
                painter.limb(body.bottom + i, col, slot::BODY);
            }
            continue;
        }

        let half_len = (leg_len / 2).max(1);
        let knee = body.bottom + half_len + 1;
        for row in (body.bottom + 1)..=(knee + half_len) {
            let inner = if row == knee {
                slot::BODY_SECONDARY
            } else {
                slot::BODY
            };
            painter.limb(row, col, inner);
            painter.limb(row, col + out, slot::BODY);
        }

        if stage >= LimbStage::Grasping {
            let shoe = knee + half_len + 1;
            painter.limb(shoe, col, slot::OUTLINE);
            painter.limb(shoe, col + out, slot::OUTLINE);
            for dc in 0..3 {
                painter.limb(shoe + 1, col + out * dc, slot::OUTLINE);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::PatternType;
    use crate::rasterize::rasterize_silhouette;
    use crate::rng::{CountingRng, ScriptedRng};
    use crate::silhouette::generate_silhouette;

    fn base_params(stage: LimbStage) -> CreatureParams {
        CreatureParams {
            head_ratio: 0.35,
            body_width_ratio: 0.6,
            roundness: 0.5,
            top_heavy: 0.2,
            eye_size: 2,
            eye_spacing: 0.5,
            has_ears: false,
            has_horns: false,
            has_tail: false,
            has_wings: false,
            limb_stage: stage,
            pattern_type: PatternType::None,
            pattern_density: 0.0,
            neck_width: 0.5,
            leg_length: 0.3,
            arm_length: 0.3,
            tail_length: 0.3,
            wing_size: 0.3,
            ear_size: 0.3,
            horn_size: 0.3,
            body_taper: 0.2,
            asymmetry: 0.0,
        }
    }

    fn place(params: &CreatureParams, rng: &mut dyn ArtRng) -> (PixelCanvas, FeatureResult) {
        let sil = generate_silhouette(params, 32, 32, 1.0);
        let base = rasterize_silhouette(&sil.width_map);
        let result = place_features(&base, params, &sil.head, &sil.body, rng);
        (base, result)
    }

    #[test]
    fn test_eyes_and_mouth_always_placed() {
        for size in 1..=3u8 {
            let params = CreatureParams {
                eye_size: size,
                ..base_params(LimbStage::Bare)
            };
            let (_, result) = place(&params, &mut ScriptedRng::constant(0.9));
            assert!(result.canvas.contains_slot(slot::PUPIL));
            assert!(result.canvas.contains_slot(slot::MOUTH));
            let whites = result.canvas.cells().filter(|&(_, v)| v == slot::EYE_WHITE).count();
            assert_eq!(whites > 0, size > 1);
            assert_eq!(result.hints.eye_positions.len(), 2);
            for p in &result.hints.eye_positions {
                assert_eq!(result.canvas.at(*p), Some(slot::PUPIL));
            }
        }
    }

    #[test]
    fn test_bare_stage_has_no_gestures() {
        let params = CreatureParams {
            has_ears: true,
            has_horns: true,
            has_tail: true,
            has_wings: true,
            ..base_params(LimbStage::Bare)
        };
        let mut rng = CountingRng::new(ScriptedRng::constant(0.9));
        let (_, result) = place(&params, &mut rng);
        assert!(result.hints.gesture_pixels.is_empty());
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_tail_takes_one_draw_and_follows_direction() {
        let params = CreatureParams {
            has_tail: true,
            ..base_params(LimbStage::Jointed)
        };
        let sil = generate_silhouette(&params, 32, 32, 1.0);

        let mut right_rng = CountingRng::new(ScriptedRng::constant(0.9));
        let (_, right) = place(&params, &mut right_rng);
        assert_eq!(right_rng.draws(), 1);
        assert!(right
            .hints
            .gesture_pixels
            .iter()
            .any(|p| p.col > sil.body.right + 2 && right.canvas.at(*p) == Some(slot::ACCENT_B)));

        let (_, left) = place(&params, &mut ScriptedRng::constant(0.1));
        assert!(left
            .hints
            .gesture_pixels
            .iter()
            .any(|p| p.col < sil.body.left - 2 && left.canvas.at(*p) == Some(slot::ACCENT_B)));
    }

    #[test]
    fn test_appendages_need_their_stage() {
        let flags = |stage| CreatureParams {
            has_ears: true,
            has_horns: true,
            has_wings: true,
            ..base_params(stage)
        };

        let (_, sticks) = place(&flags(LimbStage::Sticks), &mut ScriptedRng::constant(0.5));
        let (_, grasping) = place(&flags(LimbStage::Grasping), &mut ScriptedRng::constant(0.5));
        let (_, winged) = place(&flags(LimbStage::Winged), &mut ScriptedRng::constant(0.5));

        // horns (accent A) only from stage 3, wing highlights only from stage 4
        assert!(!sticks.canvas.contains_slot(slot::ACCENT_A));
        assert!(grasping.canvas.contains_slot(slot::ACCENT_A));
        assert!(!grasping.canvas.contains_slot(slot::HIGHLIGHT));
        assert!(winged.canvas.contains_slot(slot::HIGHLIGHT));
    }

    #[test]
    fn test_limbs_grow_with_stage() {
        let counts: Vec<usize> = [
            LimbStage::Sticks,
            LimbStage::Jointed,
            LimbStage::Grasping,
        ]
        .iter()
        .map(|&stage| {
            let (_, result) = place(&base_params(stage), &mut ScriptedRng::constant(0.5));
            result.hints.gesture_pixels.len()
        })
        .collect();
        assert!(counts[0] > 0);
        assert!(counts[0] < counts[1]);
        assert!(counts[1] < counts[2]);
    }

    #[test]
    fn test_joint_highlight_from_stage_two() {
        let (base, sticks) = place(&base_params(LimbStage::Sticks), &mut ScriptedRng::constant(0.5));
        let (_, jointed) = place(&base_params(LimbStage::Jointed), &mut ScriptedRng::constant(0.5));
        assert!(!base.contains_slot(slot::BODY_SECONDARY));
        assert!(!sticks.canvas.contains_slot(slot::BODY_SECONDARY));
        assert!(jointed.canvas.contains_slot(slot::BODY_SECONDARY));
    }

    #[test]
    fn test_shoes_land_on_bottom_row() {
        let params = base_params(LimbStage::Complete);
        let (_, result) = place(&params, &mut ScriptedRng::constant(0.5));
        let lowest = result
            .hints
            .gesture_pixels
            .iter()
            .map(|p| p.row)
            .max()
            .unwrap();
        assert_eq!(lowest, 31);
        assert_eq!(result.canvas.row(31).unwrap().iter().filter(|&&v| v == slot::OUTLINE).count(), 6);
    }

    #[test]
    fn test_shimmer_hints_skip_eyes_and_transparency() {
        let (_, result) = place(&base_params(LimbStage::Complete), &mut ScriptedRng::constant(0.5));
        assert!(!result.hints.shimmer_pixels.is_empty());
        for p in &result.hints.shimmer_pixels {
            let v = result.canvas.at(*p).unwrap();
            assert_ne!(v, slot::TRANSPARENT);
            assert!(!slot::is_eye(v));
        }
        let expected = result
            .canvas
            .cells()
            .filter(|&(_, v)| v != slot::TRANSPARENT && !slot::is_eye(v))
            .count();
        assert_eq!(result.hints.shimmer_pixels.len(), expected);
    }

    #[test]
    fn test_input_canvas_untouched() {
        let params = base_params(LimbStage::Complete);
        let sil = generate_silhouette(&params, 32, 32, 1.0);
        let base = rasterize_silhouette(&sil.width_map);
        let snapshot = base.clone();
        let _ = place_features(&base, &params, &sil.head, &sil.body, &mut ScriptedRng::constant(0.5));
        assert_eq!(base, snapshot);
    }
}
