//! Procedural items carried by fully grown creatures
//!
//! Item parameters take six draws (family, length, width, taper, curvature,
//! cross-piece); the shape routine and its richness pass follow on the same
//! generator. Richness itself comes from the token ratio, never from a draw.

use serde::{Deserialize, Serialize};

use crate::canvas::{round_to_cell, slot, PixelCanvas, Point};
use crate::item_shapes::generate_item_pixels;
use crate::rng::ArtRng;
use crate::silhouette::Bounds;
use crate::traits::{TraitVector, UsageMix, MAX_TRAIT_SCORE};

/// Generator draws consumed by [`derive_item_params`]
pub const ITEM_PARAM_DRAWS: usize = 6;

/// Usage category reported when the mix names none
pub const DEFAULT_CATEGORY: &str = "impl";

/// Token ratio assumed when none is supplied
pub const DEFAULT_TOKEN_RATIO: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemFamily {
    #[default]
    Blade,
    Staff,
    Shield,
    Tool,
    Orb,
}

impl ItemFamily {
    pub const ALL: [ItemFamily; 5] = [
        ItemFamily::Blade,
        ItemFamily::Staff,
        ItemFamily::Shield,
        ItemFamily::Tool,
        ItemFamily::Orb,
    ];

    /// Family for a raw index; unrecognized indices fall back to blade
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        match self {
            ItemFamily::Blade => "blade",
            ItemFamily::Staff => "staff",
            ItemFamily::Shield => "shield",
            ItemFamily::Tool => "tool",
            ItemFamily::Orb => "orb",
        }
    }
}

impl std::fmt::Display for ItemFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ItemFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blade" => Ok(ItemFamily::Blade),
            "staff" => Ok(ItemFamily::Staff),
            "shield" => Ok(ItemFamily::Shield),
            "tool" => Ok(ItemFamily::Tool),
            "orb" => Ok(ItemFamily::Orb),
            _ => Err(format!(
                "Unknown item family: {}. Valid: blade, staff, shield, tool, orb",
                s
            )),
        }
    }
}

/// Decoration intensity, driven by the token ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Richness {
    Modest,
    Standard,
    Lavish,
}

impl Richness {
    /// modest below 0.5, standard up to 1.0, lavish above
    pub fn from_token_ratio(ratio: f64) -> Self {
        if ratio < 0.5 {
            Richness::Modest
        } else if ratio <= 1.0 {
            Richness::Standard
        } else {
            Richness::Lavish
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemParams {
    pub family: ItemFamily,
    /// 2-6
    pub length: u8,
    /// 1-4
    pub width: u8,
    pub taper: f64,
    pub curvature: f64,
    pub cross_piece: bool,
    pub richness: Richness,
    /// Usage category with the largest share
    pub dominant_category: String,
}

/// Usage-mix key with the largest positive share. Ties keep the first key.
pub fn dominant_category(mix: &UsageMix) -> String {
    let mut best = 0.0;
    let mut category = DEFAULT_CATEGORY;
    for (name, &share) in mix {
        if share > best {
            best = share;
            category = name.as_str();
        }
    }
    category.to_string()
}

fn draw_mix(trait_sum: f64, rng: &mut dyn ArtRng) -> f64 {
    rng.next_f64() * 0.7 + trait_sum * 0.3
}

/// Derive item parameters. Consumes exactly [`ITEM_PARAM_DRAWS`] draws.
pub fn derive_item_params(
    traits: &TraitVector,
    usage_mix: &UsageMix,
    token_ratio: f64,
    rng: &mut dyn ArtRng,
) -> ItemParams {
    let trait_sum = traits.total() / (MAX_TRAIT_SCORE * 8.0);

    let family_index =
        ((trait_sum * 0.3 + rng.next_f64() * 0.7) * ItemFamily::ALL.len() as f64).floor();
    let family = ItemFamily::from_index((family_index.max(0.0) as usize).min(4));

    let length = round_to_cell(draw_mix(trait_sum, rng) * 4.0 + 2.0).clamp(2, 6) as u8;
    let width = round_to_cell(draw_mix(trait_sum, rng) * 3.0 + 1.0).clamp(1, 4) as u8;
    let taper = rng.next_f64();
    let curvature = rng.next_f64();
    let cross_piece = rng.coin();

    ItemParams {
        family,
        length,
        width,
        taper,
        curvature,
        cross_piece,
        richness: Richness::from_token_ratio(token_ratio),
        dominant_category: dominant_category(usage_mix),
    }
}

/// Canvas with the item blitted in, plus what was placed
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedItem {
    pub canvas: PixelCanvas,
    pub params: ItemParams,
}

/// Cell beside the body where the item's anchor lands
pub fn hand_position(body: &Bounds) -> Point {
    Point::new(
        body.top + round_to_cell(body.height() as f64 * 0.5),
        body.right + 2,
    )
}

/// Generate an item and blit it next to the body.
///
/// Only transparent destination pixels are written; the body, its
/// features and anything off-canvas are left alone.
pub fn place_item_on_canvas(
    canvas: &PixelCanvas,
    body: &Bounds,
    traits: &TraitVector,
    usage_mix: &UsageMix,
    token_ratio: f64,
    rng: &mut dyn ArtRng,
) -> PlacedItem {
    let mut result = canvas.clone();
    let params = derive_item_params(traits, usage_mix, token_ratio, rng);
    let item = generate_item_pixels(&params, rng);

    let hand = hand_position(body);
    let origin = hand.offset(-item.anchor.row, -item.anchor.col);

    let mut written = 0;
    for (p, value) in item.pixels.cells() {
        if value == slot::TRANSPARENT {
            continue;
        }
        let dest = origin.offset(p.row, p.col);
        if result.at(dest) == Some(slot::TRANSPARENT) {
            result.set_at(dest, value);
            written += 1;
        }
    }

    log::debug!(
        "Placed {} item ({:?}, {}x{}), {} pixels written",
        params.family,
        params.richness,
        params.length,
        params.width,
        written
    );

    PlacedItem {
        canvas: result,
        params,
    }
}
