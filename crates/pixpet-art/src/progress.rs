//! Progress gating
//!
//! Young creatures are simple: appendages unlock tier by tier as progress
//! grows. Gating is a pure function of an already-derived record.

use crate::params::{CreatureParams, LimbStage};

/// Appendage unlock tier for a progress value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GrowthTier {
    /// < 0.1: no appendages, no pattern
    Hatchling,
    /// [0.1, 0.3): pattern fades in, appendages still hidden
    Juvenile,
    /// [0.3, 0.5): ears and tail
    Adolescent,
    /// [0.5, 0.7): horns too
    Subadult,
    /// >= 0.7: wings too
    Mature,
}

impl GrowthTier {
    pub fn from_progress(progress: f64) -> Self {
        if progress.is_nan() || progress < 0.1 {
            GrowthTier::Hatchling
        } else if progress < 0.3 {
            GrowthTier::Juvenile
        } else if progress < 0.5 {
            GrowthTier::Adolescent
        } else if progress < 0.7 {
            GrowthTier::Subadult
        } else {
            GrowthTier::Mature
        }
    }
}

/// Stage for a progress value. See [`LimbStage::from_progress`].
pub fn compute_limb_stage(progress: f64) -> LimbStage {
    LimbStage::from_progress(progress)
}

/// Narrow raw parameters to what a creature at `progress` may show
pub fn adjust_params_for_progress(params: &CreatureParams, progress: f64) -> CreatureParams {
    let tier = GrowthTier::from_progress(progress);
    let limb_stage = compute_limb_stage(progress);

    let mut gated = CreatureParams {
        limb_stage,
        ..*params
    };

    if tier == GrowthTier::Hatchling {
        gated.has_ears = false;
        gated.has_tail = false;
        gated.has_horns = false;
        gated.has_wings = false;
        gated.pattern_density = 0.0;
        return gated;
    }

    gated.pattern_density = params.pattern_density * progress;

    if tier < GrowthTier::Adolescent {
        gated.has_ears = false;
        gated.has_tail = false;
    }
    if tier < GrowthTier::Subadult {
        gated.has_horns = false;
    }
    if tier < GrowthTier::Mature {
        gated.has_wings = false;
    }

    log::trace!(
        "Gated params at progress {:.3}: tier {:?}, stage {}",
        progress,
        tier,
        limb_stage
    );

    gated
}
