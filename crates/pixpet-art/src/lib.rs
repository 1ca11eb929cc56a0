//! Deterministic procedural pixel-art creatures for pixpet
//!
//! This crate implements:
//! - Parameter derivation from a behavioral trait vector, gated by growth progress
//! - Palette, silhouette, rasterization, feature and pattern stages
//! - Procedural items for fully grown creatures
//! - Idle animation frames driven by hints from feature placement
//! - A render-data exporter that replays the identity draws bit for bit
//!
//! Same seed, same inputs, same pixels. Nothing here does I/O.

pub mod animation;
pub mod body;
pub mod canvas;
pub mod error;
pub mod export;
pub mod features;
pub mod item;
pub mod item_shapes;
pub mod palette;
pub mod params;
pub mod pattern;
pub mod progress;
pub mod rasterize;
pub mod render;
pub mod rng;
pub mod silhouette;
pub mod traits;

// Re-export main types for convenience
pub use animation::{generate_frames, generate_random_frame, AnimationAction};
pub use body::{derive_identity, generate_body, BodyResult, CanvasSize, ItemRequest};
pub use canvas::{slot, AnimationHints, PixelCanvas, Point};
pub use error::{ArtError, ArtResult};
pub use export::{build_render_data, RenderData};
pub use palette::Palette;
pub use params::{CreatureParams, LimbStage, PatternType};
pub use render::{CreatureRender, RenderRequest};
pub use rng::{ArtRng, CreatureRng};
pub use traits::{CreatureInputs, DepthMetrics, StyleMetrics, TraitId, TraitVector, UsageMix};
