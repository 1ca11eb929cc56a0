//! Item shape routines
//!
//! Each family draws a small standalone block and declares the anchor cell
//! that should sit in the creature's hand. A richness pass then decorates
//! the block:
//! - modest: untouched, no draws
//! - standard: one draw per filled cell, 15% become accent A
//! - lavish: standard, then one draw per empty cell, 10% of those touching
//!   a filled cell become accent B sparkles

use crate::canvas::{round_to_cell, slot, PixelCanvas, Point};
use crate::item::{ItemFamily, ItemParams, Richness};
use crate::rng::ArtRng;

/// Standalone item block and the cell that attaches to the hand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPixels {
    pub pixels: PixelCanvas,
    pub anchor: Point,
}

/// Draw the item described by `params`, decorated per its richness
pub fn generate_item_pixels(params: &ItemParams, rng: &mut dyn ArtRng) -> ItemPixels {
    let (pixels, anchor) = match params.family {
        ItemFamily::Blade => blade(params),
        ItemFamily::Staff => staff(params),
        ItemFamily::Shield => shield(params),
        ItemFamily::Tool => tool(params),
        ItemFamily::Orb => orb(params),
    };
    ItemPixels {
        pixels: apply_richness(&pixels, params.richness, rng),
        anchor,
    }
}

fn blade(params: &ItemParams) -> (PixelCanvas, Point) {
    let h = params.length as i32 + 2;
    let w = params.width as i32;
    let mut grid = PixelCanvas::new(w as usize, h as usize);

    for r in 0..h {
        // 0 at the tip, 1 at the handle
        let along = r as f64 / (h - 1) as f64;
        let taper = 1.0 - params.taper * (1.0 - along);
        let row_w = round_to_cell(w as f64 * taper).max(1);
        let offset = (w - row_w).div_euclid(2);
        let value = if r < 2 { slot::MOUTH } else { slot::BODY };
        for c in offset..offset + row_w {
            grid.set(r, c, value);
        }
    }

    let handle = h - 1;
    for c in 0..w {
        if grid.get_or_clear(handle, c) != slot::TRANSPARENT {
            grid.set(handle, c, slot::BODY_SECONDARY);
        }
    }

    if params.cross_piece && h > 3 {
        let guard_w = w + 1;
        let mut guarded = PixelCanvas::new(guard_w as usize, h as usize);
        for (p, v) in grid.cells() {
            guarded.set_at(p, v);
        }
        for c in 0..guard_w {
            guarded.set(h - 2, c, slot::BODY_SECONDARY);
        }
        return (guarded, Point::new(h - 1, guard_w / 2));
    }

    (grid, Point::new(h - 1, w / 2))
}

fn staff(params: &ItemParams) -> (PixelCanvas, Point) {
    let h = params.length as i32 + 3;
    let w = (params.width as i32).clamp(1, 2);
    let mut grid = PixelCanvas::new(w as usize, h as usize);

    for r in 0..h {
        for c in 0..w {
            let value = if r == 0 { slot::MOUTH } else { slot::BODY };
            grid.set(r, c, value);
        }
    }

    (grid, Point::new(h - 1, w / 2))
}

fn shield(params: &ItemParams) -> (PixelCanvas, Point) {
    let h = params.length as i32;
    let w = params.width as i32 + 2;
    let mut grid = PixelCanvas::new(w as usize, h as usize);

    for r in 0..h {
        let shrink = if r == 0 || r == h - 1 { 1 } else { 0 };
        for c in shrink..w - shrink {
            grid.set(r, c, slot::BODY);
        }
    }

    let filled = grid.clone();
    for (p, v) in filled.cells() {
        if v == slot::TRANSPARENT {
            continue;
        }
        let border = p.row == 0
            || p.row == h - 1
            || p.col == 0
            || p.col == w - 1
            || filled.get_or_clear(p.row - 1, p.col) == slot::TRANSPARENT
            || filled.get_or_clear(p.row, p.col - 1) == slot::TRANSPARENT;
        if border {
            grid.set_at(p, slot::OUTLINE);
        }
    }

    grid.set(h / 2, w / 2, slot::MOUTH);

    (grid, Point::new(h / 2, 0))
}

fn tool(params: &ItemParams) -> (PixelCanvas, Point) {
    let shaft_h = params.length as i32 + 1;
    let head_w = (params.width as i32 + 1).max(2);
    let head_h = 2;
    let total_h = shaft_h + head_h;
    let mut grid = PixelCanvas::new(head_w as usize, total_h as usize);

    for r in 0..head_h {
        for c in 0..head_w {
            grid.set(r, c, slot::MOUTH);
        }
    }

    let shaft_col = head_w / 2;
    for r in head_h..total_h {
        grid.set(r, shaft_col, slot::BODY);
    }

    (grid, Point::new(total_h - 1, shaft_col))
}

fn orb(params: &ItemParams) -> (PixelCanvas, Point) {
    let size = (params.length.min(params.width) as i32).max(2);
    let mid = size / 2;
    let mut grid = PixelCanvas::new(size as usize, size as usize);

    for r in 0..size {
        for c in 0..size {
            let dist = (r - mid).abs() + (c - mid).abs();
            if dist <= mid {
                let value = if dist == mid { slot::MOUTH } else { slot::BODY };
                grid.set(r, c, value);
            }
        }
    }
    grid.set(mid, mid, slot::HIGHLIGHT);

    (grid, Point::new(mid, 0))
}

fn apply_richness(grid: &PixelCanvas, richness: Richness, rng: &mut dyn ArtRng) -> PixelCanvas {
    let mut result = grid.clone();
    if richness == Richness::Modest {
        return result;
    }

    let (w, h) = (result.width() as i32, result.height() as i32);
    for r in 0..h {
        for c in 0..w {
            if result.get_or_clear(r, c) != slot::TRANSPARENT && rng.chance(0.15) {
                result.set(r, c, slot::ACCENT_A);
            }
        }
    }

    if richness == Richness::Lavish {
        // sparkles see earlier sparkles as neighbors
        for r in 0..h {
            for c in 0..w {
                if result.get_or_clear(r, c) != slot::TRANSPARENT || !rng.chance(0.1) {
                    continue;
                }
                let touches = [(-1, 0), (1, 0), (0, -1), (0, 1)]
                    .iter()
                    .any(|&(dr, dc)| result.get_or_clear(r + dr, c + dc) != slot::TRANSPARENT);
                if touches {
                    result.set(r, c, slot::ACCENT_B);
                }
            }
        }
    }

    result
}
