//! Creature parameter derivation
//!
//! Every continuous parameter is 30% trait influence and 70% generator draw.
//! The derivation order below is part of the replay contract: the exporter
//! and the body pipeline must see the same draws in the same order.

use serde::{Deserialize, Serialize};

use crate::rng::ArtRng;
use crate::traits::{DepthMetrics, StyleMetrics, TraitId, TraitVector};

/// Generator draws consumed by [`derive_creature_params`]
pub const PARAM_DRAWS: usize = 21;

const TRAIT_WEIGHT: f64 = 0.3;
const RANDOM_WEIGHT: f64 = 0.7;

/// Body texture overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    #[default]
    None,
    Stripes,
    Spots,
    Gradient,
    Checker,
    Swirl,
}

impl PatternType {
    /// Map a raw index onto a pattern; anything unrecognized is `None`
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => PatternType::Stripes,
            2 => PatternType::Spots,
            3 => PatternType::Gradient,
            4 => PatternType::Checker,
            5 => PatternType::Swirl,
            _ => PatternType::None,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Structural growth stage, driven only by progress
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LimbStage {
    /// No limbs at all
    #[default]
    Bare = 0,
    /// Single-pixel stick limbs
    Sticks = 1,
    /// Two-pixel limbs with elbow/knee highlights; ears and tail may show
    Jointed = 2,
    /// Hands, feet and shoes; horns may show
    Grasping = 3,
    /// Wings may show
    Winged = 4,
    /// Full growth; carries a procedural item
    Complete = 5,
}

impl LimbStage {
    /// Stage for a progress value: <0.1, <0.3, <0.5, <0.7, <1.0, >=1.0
    pub fn from_progress(progress: f64) -> Self {
        if progress.is_nan() || progress < 0.1 {
            LimbStage::Bare
        } else if progress < 0.3 {
            LimbStage::Sticks
        } else if progress < 0.5 {
            LimbStage::Jointed
        } else if progress < 0.7 {
            LimbStage::Grasping
        } else if progress < 1.0 {
            LimbStage::Winged
        } else {
            LimbStage::Complete
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for LimbStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Flat shape/feature description of one creature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreatureParams {
    /// Head share of total height, 0.20-0.45
    pub head_ratio: f64,
    /// Body width as a share of canvas width, 0.30-0.80
    pub body_width_ratio: f64,
    /// 0 = rectangle, 1 = ellipse
    pub roundness: f64,
    /// 0.0-1.0, body narrows toward the bottom
    pub top_heavy: f64,
    /// 1, 2 or 3
    pub eye_size: u8,
    /// 0.3-0.7
    pub eye_spacing: f64,
    pub has_ears: bool,
    pub has_horns: bool,
    pub has_tail: bool,
    pub has_wings: bool,
    pub limb_stage: LimbStage,
    pub pattern_type: PatternType,
    /// 0.0-1.0 before gating
    pub pattern_density: f64,
    /// 0.3-0.8
    pub neck_width: f64,
    /// 0.1-0.3
    pub leg_length: f64,
    /// 0.1-0.3
    pub arm_length: f64,
    /// 0.1-0.4
    pub tail_length: f64,
    /// 0.1-0.4
    pub wing_size: f64,
    /// 0.1-0.3
    pub ear_size: f64,
    /// 0.1-0.3
    pub horn_size: f64,
    /// 0.0-1.0
    pub body_taper: f64,
    /// 0.0-0.2, shifts rows sideways
    pub asymmetry: f64,
}

/// `(influence * 0.3 + draw * 0.7)` scaled into `[min, max]`
fn blend(influence: f64, rng: &mut dyn ArtRng, min: f64, max: f64) -> f64 {
    let mixed = influence * TRAIT_WEIGHT + rng.next_f64() * RANDOM_WEIGHT;
    mixed * (max - min) + min
}

/// Same mix as [`blend`], compared against a threshold
fn feature_check(influence: f64, rng: &mut dyn ArtRng, threshold: f64) -> bool {
    influence * TRAIT_WEIGHT + rng.next_f64() * RANDOM_WEIGHT > threshold
}

/// Derive raw (ungated) parameters. Consumes exactly [`PARAM_DRAWS`] draws.
pub fn derive_creature_params(
    traits: &TraitVector,
    depth: &DepthMetrics,
    style: &StyleMetrics,
    rng: &mut dyn ArtRng,
) -> CreatureParams {
    use TraitId::*;

    let head_ratio = blend(traits.influence(&[Scholar, Scribe]), rng, 0.20, 0.45);
    let body_width_ratio = blend(traits.influence(&[Builder, Guardian]), rng, 0.30, 0.80);
    let roundness = blend(traits.influence(&[Refiner, Operator]), rng, 0.0, 1.0);
    let top_heavy = blend(traits.influence(&[Architect]), rng, 0.0, 1.0);
    let eye_size = ((rng.next_f64() * 3.0).floor() as u8 + 1).min(3);
    let eye_spacing = blend(0.5, rng, 0.3, 0.7);

    let has_ears = feature_check(traits.influence(&[Guardian, Fixer]), rng, 0.45);
    let has_horns = feature_check(traits.influence(&[Guardian, Builder]), rng, 0.70);
    let has_tail = feature_check(traits.influence(&[Operator, Fixer]), rng, 0.40);
    let has_wings = feature_check(traits.influence(&[Scribe, Architect]), rng, 0.80);

    let pattern_raw =
        ((style.complexity() * TRAIT_WEIGHT + rng.next_f64() * RANDOM_WEIGHT) * 6.0).floor();
    let pattern_type = PatternType::from_index(pattern_raw.clamp(0.0, 5.0) as i64);

    let norm_loops = if depth.total_sessions > 0.0 {
        (depth.edit_test_loop_count / (depth.total_sessions * 5.0).max(1.0)).min(1.0)
    } else {
        0.0
    };
    let pattern_density = blend(norm_loops, rng, 0.0, 1.0);

    let neck_width = blend(traits.influence(&[Refiner, Builder]), rng, 0.3, 0.8);
    let leg_length = blend(traits.influence(&[Operator]), rng, 0.1, 0.3);
    let arm_length = blend(traits.influence(&[Builder]), rng, 0.1, 0.3);
    let tail_length = blend(traits.influence(&[Operator]), rng, 0.1, 0.4);
    let wing_size = blend(traits.influence(&[Architect]), rng, 0.1, 0.4);
    let ear_size = blend(traits.influence(&[Guardian]), rng, 0.1, 0.3);
    let horn_size = blend(traits.influence(&[Guardian]), rng, 0.1, 0.3);
    let body_taper = blend(traits.influence(&[Refiner]), rng, 0.0, 1.0);
    let asymmetry = blend(traits.influence(&[Fixer]), rng, 0.0, 0.2);

    CreatureParams {
        head_ratio,
        body_width_ratio,
        roundness,
        top_heavy,
        eye_size,
        eye_spacing,
        has_ears,
        has_horns,
        has_tail,
        has_wings,
        limb_stage: LimbStage::Bare,
        pattern_type,
        pattern_density,
        neck_width,
        leg_length,
        arm_length,
        tail_length,
        wing_size,
        ear_size,
        horn_size,
        body_taper,
        asymmetry,
    }
}
