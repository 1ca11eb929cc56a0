//! Body pattern overlay
//!
//! Recolors body fill (slot 2) inside the body rows and nothing else, so
//! outline, eyes, mouth and appendages always survive the pass.
//! Generator use depends on the pattern:
//! - spots: one draw per body-fill pixel, plus one per recolored pixel
//! - swirl: exactly one draw for the phase offset
//! - everything else: none

use std::f64::consts::PI;

use crate::canvas::{round_to_cell, slot, PixelCanvas};
use crate::params::{CreatureParams, PatternType};
use crate::rng::ArtRng;
use crate::silhouette::Bounds;

/// Apply the creature's pattern to a copy of `canvas`
pub fn apply_pattern(
    canvas: &PixelCanvas,
    params: &CreatureParams,
    body: &Bounds,
    rng: &mut dyn ArtRng,
) -> PixelCanvas {
    let mut result = canvas.clone();
    let density = params.pattern_density;

    if params.pattern_type == PatternType::None || density <= 0.0 {
        return result;
    }

    match params.pattern_type {
        PatternType::None => {}
        PatternType::Stripes => {
            let interval = round_to_cell(6.0 - density * 4.0).max(2);
            recolor_body(&mut result, body, |row, _| {
                ((row - body.top) / interval) % 2 == 1
            });
        }
        PatternType::Spots => {
            for_each_body_fill(&result.clone(), body, |row, col| {
                if rng.chance(density * 0.3) {
                    let spot = if rng.next_f64() > 0.7 {
                        slot::ACCENT_A
                    } else {
                        slot::BODY_SECONDARY
                    };
                    result.set(row, col, spot);
                }
            });
        }
        PatternType::Gradient => {
            let body_h = body.height();
            if body_h > 0 {
                recolor_body(&mut result, body, |row, _| {
                    (row - body.top) as f64 / body_h as f64 > 1.0 - density
                });
            }
        }
        PatternType::Checker => {
            let size = round_to_cell(4.0 - density * 3.0).max(1);
            recolor_body(&mut result, body, |row, col| {
                (row.div_euclid(size) + col.div_euclid(size)) % 2 == 0
            });
        }
        PatternType::Swirl => {
            let center_row = body.center_row();
            let center_col = body.center_col();
            let frequency = 0.3 + density * 0.5;
            let phase = rng.next_f64() * PI * 2.0;
            recolor_body(&mut result, body, |row, col| {
                let dr = (row - center_row) as f64;
                let dc = (col - center_col) as f64;
                let angle = dr.atan2(dc) + phase;
                let dist = dr.hypot(dc);
                (angle * 3.0 + dist * frequency).sin() > 0.3
            });
        }
    }

    log::trace!(
        "Applied {:?} pattern at density {:.3}",
        params.pattern_type,
        density
    );

    result
}

/// Visit body-fill pixels inside the body rows, top to bottom, left to right
fn for_each_body_fill(canvas: &PixelCanvas, body: &Bounds, mut visit: impl FnMut(i32, i32)) {
    let top = body.top.max(0);
    let bottom = body.bottom.min(canvas.height() as i32 - 1);
    for row in top..=bottom {
        for col in 0..canvas.width() as i32 {
            if canvas.get(row, col) == Some(slot::BODY) {
                visit(row, col);
            }
        }
    }
}

fn recolor_body(canvas: &mut PixelCanvas, body: &Bounds, predicate: impl Fn(i32, i32) -> bool) {
    let snapshot = canvas.clone();
    for_each_body_fill(&snapshot, body, |row, col| {
        if predicate(row, col) {
            canvas.set(row, col, slot::BODY_SECONDARY);
        }
    });
}
