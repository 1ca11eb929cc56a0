//! Palette derivation
//!
//! Ten fixed-role slots of ANSI-256 color indices. Continues the generator
//! sequence right after parameter derivation and consumes three draws:
//! base hue, then the two triadic jitters.

use serde::{Deserialize, Serialize};

use crate::canvas::slot;
use crate::rng::ArtRng;
use crate::traits::{DepthMetrics, StyleMetrics, TraitId, TraitVector};

/// Generator draws consumed by [`generate_palette`]
pub const PALETTE_DRAWS: usize = 3;

/// ANSI index stored in the transparent slot
pub const TRANSPARENT_COLOR: u8 = 0;
/// Bright white (cube 5,5,5)
pub const EYE_WHITE_COLOR: u8 = 231;
/// Black (cube 0,0,0)
pub const PUPIL_COLOR: u8 = 16;

const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// Standard xterm values for the 16 system colors
const SYSTEM_COLORS: [[u8; 3]; 16] = [
    [0, 0, 0],
    [128, 0, 0],
    [0, 128, 0],
    [128, 128, 0],
    [0, 0, 128],
    [128, 0, 128],
    [0, 128, 128],
    [192, 192, 192],
    [128, 128, 128],
    [255, 0, 0],
    [0, 255, 0],
    [255, 255, 0],
    [0, 0, 255],
    [255, 0, 255],
    [0, 255, 255],
    [255, 255, 255],
];

/// Ordered color table, indexed by palette slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub colors: [u8; slot::COUNT],
}

impl Palette {
    /// ANSI index for a slot
    pub fn color(&self, slot_index: u8) -> u8 {
        self.colors[slot_index as usize % slot::COUNT]
    }

    /// Slots as `#rrggbb` strings, for consumers outside the terminal
    pub fn to_hex_array(&self) -> [String; slot::COUNT] {
        self.colors.map(|c| {
            let [r, g, b] = ansi256_to_rgb(c);
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        })
    }
}

/// HSL (h 0-360, s 0-100, l 0-100) to 8-bit RGB
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [u8; 3] {
    let h = h.rem_euclid(360.0);
    let s = (s / 100.0).clamp(0.0, 1.0);
    let l = (l / 100.0).clamp(0.0, 1.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r1, g1, b1) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [channel(r1), channel(g1), channel(b1)]
}

/// Nearest index in the 6x6x6 cube (16-231) or grayscale ramp (232-255)
pub fn rgb_to_ansi256(rgb: [u8; 3]) -> u8 {
    let dist = |a: [u8; 3], b: [u8; 3]| -> u32 {
        a.iter()
            .zip(b.iter())
            .map(|(&x, &y)| {
                let d = x as i32 - y as i32;
                (d * d) as u32
            })
            .sum()
    };

    let mut best_index = 16u8;
    let mut best_dist = u32::MAX;

    for (ri, &r) in CUBE_LEVELS.iter().enumerate() {
        for (gi, &g) in CUBE_LEVELS.iter().enumerate() {
            for (bi, &b) in CUBE_LEVELS.iter().enumerate() {
                let d = dist(rgb, [r, g, b]);
                if d < best_dist {
                    best_dist = d;
                    best_index = (16 + ri * 36 + gi * 6 + bi) as u8;
                }
            }
        }
    }

    for i in 0..24u8 {
        let gray = 8 + i * 10;
        let d = dist(rgb, [gray, gray, gray]);
        if d < best_dist {
            best_dist = d;
            best_index = 232 + i;
        }
    }

    best_index
}

/// RGB value of an ANSI-256 index
pub fn ansi256_to_rgb(index: u8) -> [u8; 3] {
    match index {
        0..=15 => SYSTEM_COLORS[index as usize],
        16..=231 => {
            let i = (index - 16) as usize;
            [
                CUBE_LEVELS[i / 36],
                CUBE_LEVELS[(i / 6) % 6],
                CUBE_LEVELS[i % 6],
            ]
        }
        _ => {
            let gray = 8 + (index - 232) * 10;
            [gray, gray, gray]
        }
    }
}

fn hsl_to_ansi256(h: f64, s: f64, l: f64) -> u8 {
    rgb_to_ansi256(hsl_to_rgb(h, s, l))
}

/// Weighted circular mean in degrees; 0 when every weight is non-positive
pub fn circular_mean(angles: &[f64], weights: &[f64]) -> f64 {
    let mut sin_sum = 0.0;
    let mut cos_sum = 0.0;
    let mut w_total = 0.0;

    for (&angle, &w) in angles.iter().zip(weights.iter()) {
        if w <= 0.0 {
            continue;
        }
        let rad = angle.to_radians();
        sin_sum += rad.sin() * w;
        cos_sum += rad.cos() * w;
        w_total += w;
    }

    if w_total == 0.0 {
        return 0.0;
    }

    let mean = (sin_sum / w_total).atan2(cos_sum / w_total);
    (mean.to_degrees() + 360.0) % 360.0
}

/// Derive the palette. Consumes exactly [`PALETTE_DRAWS`] draws.
pub fn generate_palette(
    traits: &TraitVector,
    depth: &DepthMetrics,
    style: &StyleMetrics,
    rng: &mut dyn ArtRng,
) -> Palette {
    let angles = TraitId::ALL.map(TraitId::hue_anchor);
    let weights = TraitId::ALL.map(|id| traits.get(id));

    let trait_hue = circular_mean(&angles, &weights);
    let base_hue = (trait_hue * 0.3 + rng.next_f64() * 360.0 * 0.7) % 360.0;

    let activity = (depth.loops_per_session() * 30.0).clamp(0.0, 40.0);
    let saturation = 40.0 + activity;

    let lightness =
        (35.0 + style.codeblock_ratio * 20.0 + style.bullet_ratio * 10.0).clamp(30.0, 70.0);

    let jitter_a = (rng.next_f64() - 0.5) * 30.0;
    let jitter_b = (rng.next_f64() - 0.5) * 30.0;

    let colors = [
        TRANSPARENT_COLOR,
        hsl_to_ansi256(base_hue, saturation, (lightness - 25.0).max(10.0)),
        hsl_to_ansi256(base_hue, saturation, lightness),
        hsl_to_ansi256(base_hue, saturation, (lightness + 15.0).min(80.0)),
        hsl_to_ansi256(base_hue, saturation + 10.0, (lightness + 25.0).min(85.0)),
        EYE_WHITE_COLOR,
        PUPIL_COLOR,
        hsl_to_ansi256(base_hue + 180.0, saturation, lightness),
        hsl_to_ansi256(base_hue + 120.0 + jitter_a, saturation, lightness),
        hsl_to_ansi256(base_hue + 240.0 + jitter_b, saturation, lightness),
    ];

    log::trace!(
        "Palette: hue {:.1} sat {:.1} light {:.1} -> {:?}",
        base_hue,
        saturation,
        lightness,
        colors
    );

    Palette { colors }
}
