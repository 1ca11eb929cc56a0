//! Body pipeline
//!
//! Runs every stage in the fixed order on one generator:
//! derive -> gate -> palette -> silhouette -> rasterize -> features ->
//! pattern -> item (fully grown creatures with a usage mix only).
//!
//! [`derive_identity`] is the shared prefix: anything that needs the same
//! parameters and palette for a seed (the exporter, say) calls it on a
//! fresh generator and gets the same answer as this pipeline.

use serde::{Deserialize, Serialize};

use crate::canvas::{AnimationHints, PixelCanvas};
use crate::features::place_features;
use crate::item::{place_item_on_canvas, ItemParams, DEFAULT_TOKEN_RATIO};
use crate::palette::{generate_palette, Palette};
use crate::params::{derive_creature_params, CreatureParams, LimbStage};
use crate::pattern::apply_pattern;
use crate::progress::adjust_params_for_progress;
use crate::rasterize::rasterize_silhouette;
use crate::rng::ArtRng;
use crate::silhouette::generate_silhouette;
use crate::traits::{CreatureInputs, UsageMix};

/// Smallest canvas where a full-grown creature keeps its legs, ears and
/// horns on the grid
pub const MIN_CANVAS_WIDTH: usize = 16;
pub const MIN_TEXT_HEIGHT: usize = 8;

/// Canvas size in terminal cells. Each text row holds two pixel rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: usize,
    pub text_height: usize,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 32,
            text_height: 16,
        }
    }
}

impl CanvasSize {
    pub fn new(width: usize, text_height: usize) -> Self {
        Self { width, text_height }
    }

    /// Raise both dimensions to the smallest size the modeler can draw in
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.max(MIN_CANVAS_WIDTH),
            text_height: self.text_height.max(MIN_TEXT_HEIGHT),
        }
    }

    pub fn pixel_height(&self) -> usize {
        self.text_height * 2
    }
}

/// Inputs for the item stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemRequest {
    pub usage_mix: UsageMix,
    /// Defaults to [`DEFAULT_TOKEN_RATIO`]
    pub token_ratio: Option<f64>,
}

impl ItemRequest {
    pub fn token_ratio(&self) -> f64 {
        self.token_ratio.unwrap_or(DEFAULT_TOKEN_RATIO)
    }
}

/// Derive parameters, gate them for `progress`, then derive the palette.
///
/// Consumes `PARAM_DRAWS + PALETTE_DRAWS` draws, in that order, and nothing
/// else.
pub fn derive_identity(
    inputs: &CreatureInputs,
    progress: f64,
    rng: &mut dyn ArtRng,
) -> (CreatureParams, Palette) {
    let raw = derive_creature_params(&inputs.traits, &inputs.depth, &inputs.style, rng);
    let params = adjust_params_for_progress(&raw, progress);
    let palette = generate_palette(&inputs.traits, &inputs.depth, &inputs.style, rng);
    (params, palette)
}

/// Everything a renderer needs for the still frame
#[derive(Debug, Clone, PartialEq)]
pub struct BodyResult {
    pub canvas: PixelCanvas,
    pub palette: Palette,
    pub hints: AnimationHints,
    pub params: CreatureParams,
    pub limb_stage: LimbStage,
    /// Set when an item was generated
    pub item: Option<ItemParams>,
}

/// Build the base frame for a creature at `progress`
pub fn generate_body(
    inputs: &CreatureInputs,
    progress: f64,
    size: CanvasSize,
    item: Option<&ItemRequest>,
    rng: &mut dyn ArtRng,
) -> BodyResult {
    let size = size.clamped();
    let (params, palette) = derive_identity(inputs, progress, rng);
    let limb_stage = params.limb_stage;

    let silhouette = generate_silhouette(&params, size.width, size.pixel_height(), progress);
    let outline = rasterize_silhouette(&silhouette.width_map);
    let featured = place_features(
        &outline,
        &params,
        &silhouette.head,
        &silhouette.body,
        rng,
    );
    let mut canvas = apply_pattern(&featured.canvas, &params, &silhouette.body, rng);

    let mut item_params = None;
    if limb_stage == LimbStage::Complete {
        if let Some(request) = item {
            let placed = place_item_on_canvas(
                &canvas,
                &silhouette.body,
                &inputs.traits,
                &request.usage_mix,
                request.token_ratio(),
                rng,
            );
            canvas = placed.canvas;
            item_params = Some(placed.params);
        }
    }

    log::debug!(
        "Generated {}x{} body at stage {} ({} pixels, pattern {:?})",
        canvas.width(),
        canvas.height(),
        limb_stage.value(),
        canvas.filled_count(),
        params.pattern_type
    );

    BodyResult {
        canvas,
        palette,
        hints: featured.hints,
        params,
        limb_stage,
        item: item_params,
    }
}
