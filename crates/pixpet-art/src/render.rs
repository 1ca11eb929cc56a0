//! One-shot render requests
//!
//! A [`RenderRequest`] owns everything a render needs. [`RenderRequest::render`]
//! seeds a fresh generator, builds the body, then the idle frames, all on
//! that one generator.

use serde::{Deserialize, Serialize};

use crate::animation::generate_frames;
use crate::body::{generate_body, BodyResult, CanvasSize, ItemRequest};
use crate::canvas::PixelCanvas;
use crate::error::{ArtError, ArtResult};
use crate::rng::CreatureRng;
use crate::traits::{CreatureInputs, TraitId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub seed: String,
    pub progress: f64,
    #[serde(default)]
    pub inputs: CreatureInputs,
    #[serde(default)]
    pub size: CanvasSize,
    #[serde(default)]
    pub item: Option<ItemRequest>,
    /// Idle frames generated after the base frame
    #[serde(default)]
    pub frames: usize,
}

impl RenderRequest {
    pub fn new(seed: impl Into<String>, progress: f64, inputs: CreatureInputs) -> Self {
        Self {
            seed: seed.into(),
            progress,
            inputs,
            size: CanvasSize::default(),
            item: None,
            frames: 0,
        }
    }

    pub fn with_size(mut self, size: CanvasSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_item(mut self, item: ItemRequest) -> Self {
        self.item = Some(item);
        self
    }

    pub fn with_frames(mut self, frames: usize) -> Self {
        self.frames = frames;
        self
    }

    /// Reject inputs the pipeline cannot give a meaningful answer for
    pub fn validate(&self) -> ArtResult<()> {
        if !self.progress.is_finite() {
            return Err(ArtError::NonFiniteProgress(self.progress));
        }
        if let Some(ratio) = self.item.as_ref().and_then(|item| item.token_ratio) {
            if !ratio.is_finite() || ratio < 0.0 {
                return Err(ArtError::InvalidTokenRatio(ratio));
            }
        }
        Ok(())
    }

    pub fn render(&self) -> ArtResult<CreatureRender> {
        self.validate()?;

        let mut rng = CreatureRng::from_seed(&self.seed);
        let body = generate_body(
            &self.inputs,
            self.progress,
            self.size,
            self.item.as_ref(),
            &mut rng,
        );
        let frames = generate_frames(
            &body.canvas,
            &body.hints,
            body.limb_stage,
            self.frames,
            &mut rng,
        );
        let (archetype, subtype) = self.inputs.traits.archetype_and_subtype();

        log::debug!(
            "Rendered {} ({}/{}) with {} frames",
            self.seed,
            archetype,
            subtype,
            frames.len()
        );

        Ok(CreatureRender {
            body,
            frames,
            archetype,
            subtype,
        })
    }
}

/// Result of [`RenderRequest::render`]
#[derive(Debug, Clone, PartialEq)]
pub struct CreatureRender {
    pub body: BodyResult,
    /// Base frame first, then the idle frames
    pub frames: Vec<PixelCanvas>,
    pub archetype: TraitId,
    pub subtype: TraitId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::TraitVector;

    fn request() -> RenderRequest {
        let inputs = CreatureInputs {
            traits: TraitVector::zero()
                .with(TraitId::Scribe, 60.0)
                .with(TraitId::Fixer, 30.0),
            ..Default::default()
        };
        RenderRequest::new("render-seed", 0.6, inputs).with_frames(3)
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        assert_eq!(request().validate(), Ok(()));

        let mut bad = request();
        bad.progress = f64::NAN;
        assert!(matches!(bad.validate(), Err(ArtError::NonFiniteProgress(_))));

        let bad = request().with_item(ItemRequest {
            token_ratio: Some(-0.5),
            ..Default::default()
        });
        assert_eq!(bad.validate(), Err(ArtError::InvalidTokenRatio(-0.5)));
        assert!(bad.render().is_err());
    }

    #[test]
    fn test_progress_past_one_is_allowed() {
        let mut grown = request();
        grown.progress = 1.7;
        assert!(grown.render().is_ok());
    }

    #[test]
    fn test_render_frames_start_with_base() {
        let render = request().render().expect("render");
        assert_eq!(render.frames.len(), 4);
        assert_eq!(render.frames[0], render.body.canvas);
        assert_eq!(render.archetype, TraitId::Scribe);
        assert_eq!(render.subtype, TraitId::Fixer);
    }

    #[test]
    fn test_render_is_deterministic() {
        let a = request().render().expect("render");
        let b = request().render().expect("render");
        assert_eq!(a, b);
    }
}
