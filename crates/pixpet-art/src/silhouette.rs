//! Silhouette modeling
//!
//! Turns creature parameters into a per-row width profile. The creature is
//! bottom-anchored: rows below the body are reserved for legs so limbs never
//! clip the canvas. Head and body boxes are recovered by scanning the map.

use serde::{Deserialize, Serialize};

use crate::canvas::round_to_cell;
use crate::params::{CreatureParams, LimbStage};

/// Horizontal extent of one silhouette row (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidthSpan {
    pub left: i32,
    pub right: i32,
}

impl WidthSpan {
    pub fn width(&self) -> i32 {
        self.right - self.left + 1
    }
}

/// Per-row extents, `None` where the row holds no silhouette
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidthMap {
    width: usize,
    rows: Vec<Option<WidthSpan>>,
}

impl WidthMap {
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            rows: vec![None; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, row: i32) -> Option<WidthSpan> {
        if row < 0 {
            return None;
        }
        self.rows.get(row as usize).copied().flatten()
    }

    /// Replace one row's span. Rows outside the map are ignored.
    pub fn set(&mut self, row: i32, span: Option<WidthSpan>) {
        if row >= 0 {
            if let Some(slot) = self.rows.get_mut(row as usize) {
                *slot = span;
            }
        }
    }

    /// `(row, span)` for every filled row, top to bottom
    pub fn filled_rows(&self) -> impl Iterator<Item = (i32, WidthSpan)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(r, span)| span.map(|s| (r as i32, s)))
    }

    /// Topmost and bottommost filled rows
    pub fn vertical_extent(&self) -> Option<(i32, i32)> {
        let mut rows = self.filled_rows().map(|(r, _)| r);
        let top = rows.next()?;
        let bottom = rows.last().unwrap_or(top);
        Some((top, bottom))
    }
}

/// Inclusive bounding box in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl Bounds {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn center_row(&self) -> i32 {
        round_to_cell((self.top + self.bottom) as f64 / 2.0)
    }

    pub fn center_col(&self) -> i32 {
        round_to_cell((self.left + self.right) as f64 / 2.0)
    }

    pub fn contains_row(&self, row: i32) -> bool {
        row >= self.top && row <= self.bottom
    }
}

/// Width map plus the head and body boxes scanned from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Silhouette {
    pub width_map: WidthMap,
    pub head: Bounds,
    pub body: Bounds,
}

/// Share of the pixel height a fully grown creature occupies
const FULL_HEIGHT_SHARE: f64 = 0.7;
/// Smallest creature height in pixel rows
const MIN_HEIGHT: i32 = 4;
/// Head half-width relative to body half-width
const HEAD_WIDTH_SHARE: f64 = 0.6;

/// Size multiplier: 0.15 at birth, 1.0 when fully grown
pub fn growth_scale(progress: f64) -> f64 {
    let progress = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    0.15 + 0.85 * progress
}

/// Half-width of a row, blending an ellipse (roundness 1) with a rectangle (0)
fn ellipse_half_width(dy: i32, ry: i32, max_half_width: i32, roundness: f64) -> i32 {
    if ry <= 0 || max_half_width <= 0 {
        return 0;
    }
    let ratio = dy.abs().min(ry) as f64 / ry as f64;
    let max_half = max_half_width as f64;
    let ellipse = max_half * (1.0 - ratio * ratio).sqrt();
    round_to_cell(ellipse * roundness + max_half * (1.0 - roundness))
}

/// Rows kept free below the body for legs, knees and shoes.
/// Mirrors the leg lengths the feature placer draws.
fn leg_reserve(params: &CreatureParams, body_height: i32) -> i32 {
    if params.limb_stage == LimbStage::Bare {
        return 0;
    }
    let leg_len = round_to_cell((body_height - 1) as f64 * params.leg_length).max(1);
    if params.limb_stage == LimbStage::Sticks {
        return leg_len;
    }
    let half_len = (leg_len / 2).max(1);
    let mut reserve = half_len + 1 + half_len;
    if params.limb_stage >= LimbStage::Grasping {
        reserve += 2;
    }
    reserve
}

struct RowShaper {
    center_x: i32,
    canvas_width: i32,
    asymmetry: f64,
}

impl RowShaper {
    fn span(&self, half_width: i32) -> Option<WidthSpan> {
        if half_width <= 0 {
            return None;
        }
        let shift = round_to_cell(self.asymmetry * half_width as f64);
        Some(WidthSpan {
            left: (self.center_x - half_width + shift).max(0),
            right: (self.center_x + half_width + shift).min(self.canvas_width - 1),
        })
    }
}

fn scan_bounds(map: &WidthMap, top: i32, bottom: i32, center_x: i32) -> Bounds {
    let mut left = i32::MAX;
    let mut right = i32::MIN;
    for row in top..=bottom {
        if let Some(span) = map.get(row) {
            left = left.min(span.left);
            right = right.max(span.right);
        }
    }
    if left > right {
        left = center_x;
        right = center_x;
    }
    Bounds {
        top,
        bottom,
        left,
        right,
    }
}

/// Model the silhouette for a `width` x `pixel_height` canvas.
///
/// Progress outside `[0, 1]` is clamped for sizing, so an overgrown creature
/// never outgrows the canvas.
pub fn generate_silhouette(
    params: &CreatureParams,
    width: usize,
    pixel_height: usize,
    progress: f64,
) -> Silhouette {
    let canvas_w = width as i32;
    let canvas_h = pixel_height as i32;
    let scale = growth_scale(progress);

    // Shrink until the legs fit below the body
    let mut total_h = round_to_cell(canvas_h as f64 * FULL_HEIGHT_SHARE * scale).max(MIN_HEIGHT);
    let (head_h, body_h, reserve) = loop {
        let head_h = round_to_cell(total_h as f64 * params.head_ratio).max(2);
        let body_h = (total_h - head_h).max(2);
        let reserve = leg_reserve(params, body_h);
        if total_h + reserve <= canvas_h || total_h <= MIN_HEIGHT {
            break (head_h, body_h, reserve);
        }
        total_h -= 1;
    };

    let creature_bottom = (total_h - 1).max(canvas_h - 1 - reserve);
    let creature_top = creature_bottom - total_h + 1;

    let head_top = creature_top;
    let head_bottom = head_top + head_h - 1;
    let body_top = head_bottom + 1;
    let body_bottom = creature_bottom;

    let center_x = canvas_w / 2;
    let span_scale = canvas_w as f64 * params.body_width_ratio * scale;
    let head_max_half = round_to_cell(span_scale * HEAD_WIDTH_SHARE / 2.0).max(1);
    let body_max_half = round_to_cell(span_scale / 2.0).max(1);
    let head_ry = (head_h / 2).max(1);
    let body_ry = (body_h / 2).max(1);
    let neck_half =
        round_to_cell(head_max_half.min(body_max_half) as f64 * params.neck_width).max(1);

    let shaper = RowShaper {
        center_x,
        canvas_width: canvas_w,
        asymmetry: params.asymmetry,
    };
    let mut map = WidthMap::empty(width, pixel_height);

    let head_center = head_top + head_ry;
    for row in head_top..=head_bottom {
        let half = ellipse_half_width(row - head_center, head_ry, head_max_half, params.roundness);
        if let Some(span) = shaper.span(half) {
            map.set(row, Some(span));
        }
    }

    let body_center = body_top + body_ry;
    for row in body_top..=body_bottom {
        let fraction = (row - body_top) as f64 / (body_h - 1).max(1) as f64;
        let taper = 1.0 - params.body_taper * fraction * 0.5;
        let top_heavy = 1.0 - params.top_heavy * fraction * 0.3;
        let effective_max = round_to_cell(body_max_half as f64 * taper * top_heavy).max(1);

        let half = ellipse_half_width(row - body_center, body_ry, effective_max, params.roundness);
        if let Some(span) = shaper.span(half) {
            map.set(row, Some(span));
        }
    }

    // Neck: pull the two junction rows toward the neck width
    for row in [head_bottom, body_top] {
        if let Some(span) = map.get(row) {
            let current_half = round_to_cell((span.right - span.left) as f64 / 2.0);
            let blended = round_to_cell((current_half + neck_half) as f64 / 2.0);
            map.set(row, shaper.span(blended).or(Some(span)));
        }
    }

    let head = scan_bounds(&map, head_top, head_bottom, center_x);
    let body = scan_bounds(&map, body_top, body_bottom, center_x);

    log::trace!(
        "Silhouette: scale {:.2}, height {} (head {}, body {}), leg reserve {}",
        scale,
        total_h,
        head_h,
        body_h,
        reserve
    );

    Silhouette {
        width_map: map,
        head,
        body,
    }
}
