//! Creature description files (`*.ron`)

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use pixpet_art::{CreatureInputs, DepthMetrics, ItemRequest, StyleMetrics, TraitVector, UsageMix};
use serde::{Deserialize, Serialize};

/// Everything needed to render one creature
///
/// ```ron
/// (
///     seed: "a3f9c2e1",
///     progress: 0.8,
///     traits: { "builder": 70.0, "scribe": 30.0 },
///     usage_mix: Some({ "impl": 0.6, "debug": 0.4 }),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureFile {
    pub seed: String,
    #[serde(default)]
    pub progress: f64,
    /// Trait name -> score. Unknown names are ignored, missing ones read as 0.
    #[serde(default)]
    pub traits: BTreeMap<String, f64>,
    #[serde(default)]
    pub depth: DepthMetrics,
    #[serde(default)]
    pub style: StyleMetrics,
    #[serde(default)]
    pub usage_mix: Option<UsageMix>,
    #[serde(default)]
    pub token_ratio: Option<f64>,
}

impl CreatureFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read creature file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        ron::from_str(text).context("Invalid creature description")
    }

    /// Creature with no file: all traits 0, newly hatched
    pub fn bare(seed: &str) -> Self {
        Self {
            seed: seed.to_string(),
            progress: 0.0,
            traits: BTreeMap::new(),
            depth: DepthMetrics::default(),
            style: StyleMetrics::default(),
            usage_mix: None,
            token_ratio: None,
        }
    }

    pub fn inputs(&self) -> CreatureInputs {
        CreatureInputs {
            traits: TraitVector::from_named_scores(
                self.traits.iter().map(|(name, &score)| (name.as_str(), score)),
            ),
            depth: self.depth,
            style: self.style,
        }
    }

    /// Item inputs, present only when the file names a usage mix
    pub fn item_request(&self) -> Option<ItemRequest> {
        self.usage_mix.as_ref().map(|mix| ItemRequest {
            usage_mix: mix.clone(),
            token_ratio: self.token_ratio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixpet_art::TraitId;
    use std::io::Write;

    const SAMPLE: &str = r#"(
        seed: "a3f9c2e1",
        progress: 0.8,
        traits: { "builder": 70.0, "scribe": 30.0, "wizard": 99.0 },
        style: (codeblock_ratio: 0.4),
        usage_mix: Some({ "impl": 0.6, "debug": 0.4 }),
    )"#;

    #[test]
    fn test_parse_sample() {
        let file = CreatureFile::parse(SAMPLE).expect("parse");
        assert_eq!(file.seed, "a3f9c2e1");
        assert_eq!(file.progress, 0.8);
        assert_eq!(file.style.codeblock_ratio, 0.4);
        assert_eq!(file.token_ratio, None);

        let inputs = file.inputs();
        assert_eq!(inputs.traits.get(TraitId::Builder), 70.0);
        assert_eq!(inputs.traits.get(TraitId::Scribe), 30.0);
        assert_eq!(inputs.traits.get(TraitId::Guardian), 0.0);

        let item = file.item_request().expect("usage mix given");
        assert_eq!(item.usage_mix.len(), 2);
        assert_eq!(item.token_ratio(), 1.0);
    }

    #[test]
    fn test_no_mix_means_no_item() {
        let file = CreatureFile::parse(r#"(seed: "x")"#).expect("parse");
        assert_eq!(file.progress, 0.0);
        assert!(file.item_request().is_none());
        assert_eq!(file, CreatureFile::bare("x"));
    }

    #[test]
    fn test_load_from_disk() {
        let mut tmp = tempfile::NamedTempFile::new().expect("tempfile");
        tmp.write_all(SAMPLE.as_bytes()).expect("write");
        let file = CreatureFile::load(tmp.path()).expect("load");
        assert_eq!(file.seed, "a3f9c2e1");

        assert!(CreatureFile::load(Path::new("/definitely/not/here.ron")).is_err());
        assert!(CreatureFile::parse("(progress: 1.0)").is_err());
    }
}
