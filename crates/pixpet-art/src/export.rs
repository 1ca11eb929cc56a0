//! Render-data export for consumers outside the terminal
//!
//! Replays the body pipeline's first two stages on a fresh generator, so the
//! exported parameters and palette always match what [`generate_body`] drew
//! for the same seed.
//!
//! [`generate_body`]: crate::body::generate_body

use serde::{Deserialize, Serialize};

use crate::body::derive_identity;
use crate::canvas::slot;
use crate::params::{CreatureParams, LimbStage};
use crate::rng::CreatureRng;
use crate::traits::{CreatureInputs, TraitId, TraitVector};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderData {
    pub seed: String,
    /// Clamped to `[0, 1]`; NaN reports as 0
    pub progress: f64,
    pub archetype: TraitId,
    pub subtype: TraitId,
    pub limb_stage: LimbStage,
    pub params: CreatureParams,
    /// Palette slots as `#rrggbb`
    pub palette: [String; slot::COUNT],
    pub traits: TraitVector,
}

pub fn build_render_data(seed: &str, inputs: &CreatureInputs, progress: f64) -> RenderData {
    let mut rng = CreatureRng::from_seed(seed);
    let (params, palette) = derive_identity(inputs, progress, &mut rng);
    let (archetype, subtype) = inputs.traits.archetype_and_subtype();

    RenderData {
        seed: seed.to_string(),
        progress: reported_progress(progress),
        archetype,
        subtype,
        limb_stage: params.limb_stage,
        params,
        palette: palette.to_hex_array(),
        traits: inputs.traits,
    }
}

fn reported_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}
