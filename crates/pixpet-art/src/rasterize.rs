//! Width map to outline/fill pixels

use crate::canvas::{slot, PixelCanvas};
use crate::silhouette::WidthMap;

/// Rasterize a width map onto a fresh canvas of the map's size.
///
/// The topmost and bottommost filled rows are solid outline; every other
/// filled row gets outline at both ends with body fill strictly between.
pub fn rasterize_silhouette(map: &WidthMap) -> PixelCanvas {
    let mut canvas = PixelCanvas::new(map.width(), map.height());

    let Some((top_row, bottom_row)) = map.vertical_extent() else {
        return canvas;
    };
    let max_col = map.width() as i32 - 1;

    for (row, span) in map.filled_rows() {
        let left = span.left.clamp(0, max_col.max(0));
        let right = span.right.clamp(0, max_col.max(0));

        if row == top_row || row == bottom_row {
            for col in left..=right {
                canvas.set(row, col, slot::OUTLINE);
            }
        } else {
            canvas.set(row, left, slot::OUTLINE);
            canvas.set(row, right, slot::OUTLINE);
            for col in (left + 1)..right {
                canvas.set(row, col, slot::BODY);
            }
        }
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::derive_creature_params;
    use crate::progress::adjust_params_for_progress;
    use crate::rng::CreatureRng;
    use crate::silhouette::{generate_silhouette, WidthSpan};
    use crate::traits::{DepthMetrics, StyleMetrics, TraitVector};

    #[test]
    fn test_empty_map_stays_transparent() {
        let canvas = rasterize_silhouette(&WidthMap::empty(6, 4));
        assert_eq!(canvas.width(), 6);
        assert_eq!(canvas.height(), 4);
        assert_eq!(canvas.filled_count(), 0);
    }

    #[test]
    fn test_outline_and_fill() {
        let mut rng = CreatureRng::from_seed("raster");
        let raw = derive_creature_params(
            &TraitVector::zero(),
            &DepthMetrics::default(),
            &StyleMetrics::default(),
            &mut rng,
        );
        let params = adjust_params_for_progress(&raw, 1.0);
        let sil = generate_silhouette(&params, 32, 32, 1.0);
        let canvas = rasterize_silhouette(&sil.width_map);

        let (top, bottom) = sil.width_map.vertical_extent().unwrap();
        for (row, span) in sil.width_map.filled_rows() {
            assert_eq!(canvas.get(row, span.left), Some(slot::OUTLINE));
            assert_eq!(canvas.get(row, span.right), Some(slot::OUTLINE));
            for col in (span.left + 1)..span.right {
                let expected = if row == top || row == bottom {
                    slot::OUTLINE
                } else {
                    slot::BODY
                };
                assert_eq!(canvas.get(row, col), Some(expected));
            }
        }

        // only outline and fill are produced
        for (_, value) in canvas.cells() {
            assert!(value <= slot::BODY);
        }
    }

    #[test]
    fn test_hand_built_map() {
        let mut map = WidthMap::empty(6, 5);
        map.set(1, Some(WidthSpan { left: 1, right: 4 }));
        map.set(2, Some(WidthSpan { left: 0, right: 5 }));
        map.set(3, Some(WidthSpan { left: 1, right: 4 }));

        let canvas = rasterize_silhouette(&map);
        assert_eq!(
            canvas.to_sprite_lines(),
            vec!["......", ".1111.", "122221", ".1111.", "......"]
        );
    }

    #[test]
    fn test_out_of_range_span_is_clamped() {
        let mut map = WidthMap::empty(4, 3);
        map.set(0, Some(WidthSpan { left: -3, right: 9 }));
        let canvas = rasterize_silhouette(&map);
        assert_eq!(canvas.to_sprite_lines(), vec!["1111", "....", "...."]);
    }
}
