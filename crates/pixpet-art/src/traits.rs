//! Behavioral inputs consumed by the creature pipeline
//!
//! The trait vector always carries all eight scores. Missing or unusable
//! entries become 0 here, once, so no formula downstream has to care.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The eight behavioral trait ids, in their fixed canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitId {
    Builder,
    Fixer,
    Refiner,
    Scholar,
    Scribe,
    Architect,
    Operator,
    Guardian,
}

impl TraitId {
    pub const ALL: [TraitId; 8] = [
        TraitId::Builder,
        TraitId::Fixer,
        TraitId::Refiner,
        TraitId::Scholar,
        TraitId::Scribe,
        TraitId::Architect,
        TraitId::Operator,
        TraitId::Guardian,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            TraitId::Builder => "builder",
            TraitId::Fixer => "fixer",
            TraitId::Refiner => "refiner",
            TraitId::Scholar => "scholar",
            TraitId::Scribe => "scribe",
            TraitId::Architect => "architect",
            TraitId::Operator => "operator",
            TraitId::Guardian => "guardian",
        }
    }

    /// Hue anchor in degrees used for the palette's base hue
    pub fn hue_anchor(self) -> f64 {
        match self {
            TraitId::Builder => 30.0,
            TraitId::Fixer => 0.0,
            TraitId::Refiner => 180.0,
            TraitId::Scholar => 240.0,
            TraitId::Scribe => 60.0,
            TraitId::Architect => 270.0,
            TraitId::Operator => 120.0,
            TraitId::Guardian => 330.0,
        }
    }
}

impl std::fmt::Display for TraitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for TraitId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TraitId::ALL
            .iter()
            .copied()
            .find(|id| id.name() == s.to_lowercase())
            .ok_or_else(|| {
                format!(
                    "Unknown trait: {}. Valid: builder, fixer, refiner, scholar, scribe, architect, operator, guardian",
                    s
                )
            })
    }
}

/// Upper bound of a trait score
pub const MAX_TRAIT_SCORE: f64 = 100.0;

/// Fully populated trait vector, scores in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(into = "BTreeMap<TraitId, f64>", from = "BTreeMap<TraitId, f64>")]
pub struct TraitVector {
    scores: [f64; 8],
}

impl TraitVector {
    /// All-zero vector
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, id: TraitId) -> f64 {
        self.scores[id.index()]
    }

    /// Set a score. Non-finite or out-of-range scores read as 0.
    pub fn set(&mut self, id: TraitId, score: f64) {
        self.scores[id.index()] = sanitize_score(id, score);
    }

    /// Builder-style [`TraitVector::set`]
    pub fn with(mut self, id: TraitId, score: f64) -> Self {
        self.set(id, score);
        self
    }

    /// Build from loosely keyed scores (e.g. a parsed config map).
    /// Unknown keys are skipped with a warning; absent ids stay 0.
    pub fn from_named_scores<'a>(scores: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let mut vector = Self::zero();
        for (name, score) in scores {
            match name.parse::<TraitId>() {
                Ok(id) => vector.set(id, score),
                Err(_) => log::warn!("Ignoring unknown trait '{}'", name),
            }
        }
        vector
    }

    /// Iterate `(id, score)` in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (TraitId, f64)> + '_ {
        TraitId::ALL.iter().map(move |&id| (id, self.get(id)))
    }

    /// Sum of all eight scores
    pub fn total(&self) -> f64 {
        self.scores.iter().sum()
    }

    /// Mean of the given scores normalized to `[0, 1]`
    pub fn influence(&self, ids: &[TraitId]) -> f64 {
        if ids.is_empty() {
            return 0.0;
        }
        let sum: f64 = ids.iter().map(|&id| self.get(id)).sum();
        sum / (MAX_TRAIT_SCORE * ids.len() as f64)
    }

    /// Highest and second-highest trait ids. Ties keep canonical order.
    pub fn archetype_and_subtype(&self) -> (TraitId, TraitId) {
        let mut ranked = TraitId::ALL;
        // sort_by is stable, so equal scores keep canonical order
        ranked.sort_by(|a, b| self.get(*b).total_cmp(&self.get(*a)));
        (ranked[0], ranked[1])
    }
}

fn sanitize_score(id: TraitId, score: f64) -> f64 {
    if score.is_finite() && (0.0..=MAX_TRAIT_SCORE).contains(&score) {
        score
    } else {
        log::warn!("Trait {} score {} out of range, reading as 0", id, score);
        0.0
    }
}

impl From<TraitVector> for BTreeMap<TraitId, f64> {
    fn from(vector: TraitVector) -> Self {
        vector.iter().collect()
    }
}

impl From<BTreeMap<TraitId, f64>> for TraitVector {
    fn from(map: BTreeMap<TraitId, f64>) -> Self {
        let mut vector = TraitVector::zero();
        for (id, score) in map {
            vector.set(id, score);
        }
        vector
    }
}

/// Session-depth metrics aggregated upstream
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthMetrics {
    pub edit_test_loop_count: f64,
    pub repeat_edit_same_file_count: f64,
    pub phase_switch_count: f64,
    pub total_sessions: f64,
}

impl DepthMetrics {
    /// Edit/test loops per session, 0 when no sessions were seen
    pub fn loops_per_session(&self) -> f64 {
        if self.total_sessions > 0.0 {
            self.edit_test_loop_count / self.total_sessions
        } else {
            0.0
        }
    }
}

/// Textual-style ratios aggregated upstream
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleMetrics {
    pub bullet_ratio: f64,
    pub question_ratio: f64,
    pub codeblock_ratio: f64,
    pub avg_message_len: f64,
    pub message_len_std: f64,
    pub heading_ratio: f64,
}

impl StyleMetrics {
    /// Combined structural-markup ratio (code blocks, bullets, headings)
    pub fn complexity(&self) -> f64 {
        self.codeblock_ratio + self.bullet_ratio + self.heading_ratio
    }
}

/// Share of work per usage category (e.g. `impl`, `debug`, `docs`)
pub type UsageMix = BTreeMap<String, f64>;

/// Everything the pipeline knows about a creature's owner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureInputs {
    pub traits: TraitVector,
    pub depth: DepthMetrics,
    pub style: StyleMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_traits_read_as_zero() {
        let traits = TraitVector::from_named_scores([("builder", 50.0)]);
        assert_eq!(traits.get(TraitId::Builder), 50.0);
        for id in TraitId::ALL.iter().skip(1) {
            assert_eq!(traits.get(*id), 0.0);
        }
    }

    #[test]
    fn test_unknown_trait_ignored() {
        let traits = TraitVector::from_named_scores([("wizard", 80.0), ("Scholar", 10.0)]);
        assert_eq!(traits.total(), 10.0);
        assert_eq!(traits.get(TraitId::Scholar), 10.0);
    }

    #[test]
    fn test_out_of_range_scores_read_as_zero() {
        let traits = TraitVector::zero()
            .with(TraitId::Fixer, -5.0)
            .with(TraitId::Refiner, 250.0)
            .with(TraitId::Scribe, f64::NAN)
            .with(TraitId::Guardian, 100.0);
        assert_eq!(traits.get(TraitId::Fixer), 0.0);
        assert_eq!(traits.get(TraitId::Refiner), 0.0);
        assert_eq!(traits.get(TraitId::Scribe), 0.0);
        assert_eq!(traits.get(TraitId::Guardian), 100.0);
    }

    #[test]
    fn test_influence_normalizes() {
        let traits = TraitVector::zero()
            .with(TraitId::Scholar, 40.0)
            .with(TraitId::Scribe, 60.0);
        assert!((traits.influence(&[TraitId::Scholar, TraitId::Scribe]) - 0.5).abs() < 1e-12);
        assert!((traits.influence(&[TraitId::Scribe]) - 0.6).abs() < 1e-12);
        assert_eq!(traits.influence(&[]), 0.0);
    }

    #[test]
    fn test_archetype_and_subtype() {
        let traits = TraitVector::zero()
            .with(TraitId::Architect, 70.0)
            .with(TraitId::Scholar, 50.0)
            .with(TraitId::Builder, 20.0);
        assert_eq!(
            traits.archetype_and_subtype(),
            (TraitId::Architect, TraitId::Scholar)
        );
    }

    #[test]
    fn test_archetype_ties_keep_canonical_order() {
        let traits = TraitVector::zero();
        assert_eq!(
            traits.archetype_and_subtype(),
            (TraitId::Builder, TraitId::Fixer)
        );
    }

    #[test]
    fn test_trait_id_round_trip_names() {
        for id in TraitId::ALL {
            assert_eq!(id.name().parse::<TraitId>(), Ok(id));
        }
        assert!("nobody".parse::<TraitId>().is_err());
    }

    #[test]
    fn test_loops_per_session() {
        let depth = DepthMetrics {
            edit_test_loop_count: 10.0,
            total_sessions: 4.0,
            ..Default::default()
        };
        assert_eq!(depth.loops_per_session(), 2.5);
        assert_eq!(DepthMetrics::default().loops_per_session(), 0.0);
    }

    #[test]
    fn test_trait_vector_ron_map() {
        let traits: TraitVector = ron::from_str("{builder: 50.0, guardian: 10.0}").unwrap();
        assert_eq!(traits.get(TraitId::Builder), 50.0);
        assert_eq!(traits.get(TraitId::Guardian), 10.0);
        assert_eq!(traits.get(TraitId::Fixer), 0.0);
    }
}
