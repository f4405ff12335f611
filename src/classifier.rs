//! Deterministic placeholder classifier for point-mutation trait impact.
//!
//! The scoring function is not a trained model. It is a fixed, reproducible
//! function of (trait, position, original, mutated) so that history entries
//! and tests are stable; a real inference backend can replace [`score`]
//! without changing any caller.

use crate::{
    error::TraitcastError,
    gene_catalog::{CropTrait, Gene},
    residues::ResidueClass,
    GENES, RESIDUES,
};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Scores strictly above this map to `Enhance`.
pub const ENHANCE_THRESHOLD: f64 = 0.70;
/// Scores strictly below this map to `Impair`; the inclusive band between
/// the two thresholds maps to `Neutral`.
pub const IMPAIR_THRESHOLD: f64 = 0.40;

/// Distance from the nearest threshold at which confidence becomes High.
pub const HIGH_CONFIDENCE_MARGIN: f64 = 0.12;
/// Distance from the nearest threshold at which confidence becomes Medium.
pub const MEDIUM_CONFIDENCE_MARGIN: f64 = 0.05;

/// Same-class substitutions keep most of the side-chain chemistry.
pub const SAME_CLASS_AFFINITY: f64 = 0.80;
/// Related classes (see [`ResidueClass::is_related`]) tolerate exchange.
pub const RELATED_CLASS_AFFINITY: f64 = 0.55;
/// Everything else is treated as a disruptive exchange.
pub const DISTANT_CLASS_AFFINITY: f64 = 0.15;

/// Blend weights for the class affinity and the positional factor.
pub const AFFINITY_WEIGHT: f64 = 0.75;
pub const POSITION_WEIGHT: f64 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Enhance,
    Neutral,
    Impair,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// One classification result. Immutable once created; `id` is never reused.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub gene_id: String,
    pub position: usize,
    pub original: char,
    pub mutated: char,
    pub impact: Impact,
    pub confidence: Confidence,
    pub created_at_unix_ms: u64,
}

/// Wall clock abstraction so recording is deterministic under test.
pub trait Clock {
    fn now_unix_ms(&self) -> u64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Prediction id source. Ids must be unique for the lifetime of the source.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Default id source: a process-local counter salted with the creation time
/// of the source, so ids stay unique across restarts.
#[derive(Debug)]
pub struct TokenSource {
    salt: u64,
    counter: u64,
}

impl TokenSource {
    pub fn new(clock: &dyn Clock) -> Self {
        Self {
            salt: clock.now_unix_ms(),
            counter: 0,
        }
    }
}

impl IdSource for TokenSource {
    fn next_id(&mut self) -> String {
        self.counter += 1;
        format!("p-{:x}-{:x}", self.salt, self.counter)
    }
}

/// Positional modulation of the class affinity, in [0,1]. A documented
/// integer hash, not biology: it exists to give the placeholder score a
/// stable per-site texture.
pub fn positional_factor(trait_seed: u64, position: usize, original: char, mutated: char) -> f64 {
    let mut h = trait_seed
        .wrapping_mul(0x9E37_79B9)
        .wrapping_add(position as u64)
        .wrapping_mul(0x85EB_CA6B);
    h ^= (original as u64).wrapping_mul(97);
    h ^= (mutated as u64).wrapping_mul(131);
    (h % 1_000) as f64 / 999.0
}

fn trait_seed(crop_trait: CropTrait) -> u64 {
    match crop_trait {
        CropTrait::DroughtTolerance => 17,
        CropTrait::SaltTolerance => 29,
        CropTrait::HeatTolerance => 43,
        CropTrait::PestResistance => 59,
        CropTrait::NutrientEfficiency => 71,
    }
}

fn class_affinity(a: ResidueClass, b: ResidueClass) -> f64 {
    if a == b {
        SAME_CLASS_AFFINITY
    } else if a.is_related(b) {
        RELATED_CLASS_AFFINITY
    } else {
        DISTANT_CLASS_AFFINITY
    }
}

/// The raw placeholder score in [0,1]. Assumes both letters are canonical
/// residues; callers validate first.
pub fn score(crop_trait: CropTrait, position: usize, original: char, mutated: char) -> f64 {
    let a = RESIDUES.class_of(original).unwrap_or(ResidueClass::Small);
    let b = RESIDUES.class_of(mutated).unwrap_or(ResidueClass::Small);
    AFFINITY_WEIGHT * class_affinity(a, b)
        + POSITION_WEIGHT * positional_factor(trait_seed(crop_trait), position, original, mutated)
}

/// Threshold mapping; the band between the thresholds is Neutral, bounds
/// included.
pub fn impact_for_score(score: f64) -> Impact {
    if score > ENHANCE_THRESHOLD {
        Impact::Enhance
    } else if score < IMPAIR_THRESHOLD {
        Impact::Impair
    } else {
        Impact::Neutral
    }
}

/// Confidence from the distance to the nearest impact threshold.
pub fn confidence_for_score(score: f64) -> Confidence {
    let margin = (score - ENHANCE_THRESHOLD)
        .abs()
        .min((score - IMPAIR_THRESHOLD).abs());
    if margin >= HIGH_CONFIDENCE_MARGIN {
        Confidence::High
    } else if margin >= MEDIUM_CONFIDENCE_MARGIN {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// The classifier proper. Pure except for id/timestamp generation, which
/// comes from the injected [`IdSource`] and [`Clock`].
pub struct Classifier {
    ids: Box<dyn IdSource>,
    clock: Box<dyn Clock>,
}

impl Default for Classifier {
    fn default() -> Self {
        let clock = SystemClock;
        Self {
            ids: Box::new(TokenSource::new(&clock)),
            clock: Box::new(clock),
        }
    }
}

impl Classifier {
    pub fn new(ids: Box<dyn IdSource>, clock: Box<dyn Clock>) -> Self {
        Self { ids, clock }
    }

    /// Classifies a point mutation. Validation failures block prediction
    /// creation; no partial result is produced. Never touches history.
    pub fn classify(
        &mut self,
        gene: &Gene,
        position: i64,
        original: char,
        mutated: char,
    ) -> Result<Prediction, TraitcastError> {
        GENES.validate_position(gene, position)?;
        let position = position as usize;
        let original = original.to_ascii_uppercase();
        let mutated = mutated.to_ascii_uppercase();

        let actual = gene
            .residue_at(position)
            .ok_or(TraitcastError::PositionOutOfRange {
                position: position as i64,
                length: gene.len(),
            })?;
        if actual != original {
            return Err(TraitcastError::ResidueMismatch {
                position,
                stated: original,
                actual,
            });
        }
        if !RESIDUES.is_valid_letter(mutated) {
            return Err(TraitcastError::InvalidSubstitution {
                original,
                mutated,
                reason: "not a canonical amino-acid letter".to_string(),
            });
        }
        if mutated == original {
            return Err(TraitcastError::InvalidSubstitution {
                original,
                mutated,
                reason: "substitution must change the residue".to_string(),
            });
        }

        let s = score(gene.crop_trait, position, original, mutated);
        Ok(Prediction {
            id: self.ids.next_id(),
            gene_id: gene.id.clone(),
            position,
            original,
            mutated,
            impact: impact_for_score(s),
            confidence: confidence_for_score(s),
            created_at_unix_ms: self.clock.now_unix_ms(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{FixedClock, SeqIds};
    use super::*;

    fn test_classifier() -> Classifier {
        Classifier::new(Box::new(SeqIds::default()), Box::new(FixedClock(1_000)))
    }

    #[test]
    fn test_classify_is_deterministic() {
        let gene = GENES.gene("DREB1A").unwrap();
        let mut c = test_classifier();
        let a = c.classify(gene, 142, 'A', 'V').unwrap();
        let b = c.classify(gene, 142, 'A', 'V').unwrap();
        assert_eq!((a.impact, a.confidence), (b.impact, b.confidence));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_known_scores() {
        // Small -> Hydrophobic is a related-class exchange; the positional
        // factor cannot push it out of the neutral band.
        let gene = GENES.gene("DREB1A").unwrap();
        let mut c = test_classifier();
        let p = c.classify(gene, 142, 'A', 'V').unwrap();
        assert_eq!(p.impact, Impact::Neutral);
        assert_eq!(p.confidence, Confidence::Low);

        let s = score(CropTrait::SaltTolerance, 10, 'L', 'D');
        assert_eq!(impact_for_score(s), Impact::Impair);
        assert_eq!(confidence_for_score(s), Confidence::High);

        let s = score(CropTrait::HeatTolerance, 5, 'F', 'W');
        assert_eq!(impact_for_score(s), Impact::Enhance);
        assert_eq!(confidence_for_score(s), Confidence::High);

        let s = score(CropTrait::DroughtTolerance, 1, 'M', 'K');
        assert_eq!(impact_for_score(s), Impact::Impair);
        assert_eq!(confidence_for_score(s), Confidence::Medium);
    }

    #[test]
    fn test_threshold_boundaries_are_exact() {
        assert_eq!(impact_for_score(ENHANCE_THRESHOLD), Impact::Neutral);
        assert_eq!(impact_for_score(ENHANCE_THRESHOLD + 1e-9), Impact::Enhance);
        assert_eq!(impact_for_score(IMPAIR_THRESHOLD), Impact::Neutral);
        assert_eq!(impact_for_score(IMPAIR_THRESHOLD - 1e-9), Impact::Impair);

        assert_eq!(confidence_for_score(ENHANCE_THRESHOLD), Confidence::Low);
        assert_eq!(
            confidence_for_score(ENHANCE_THRESHOLD + MEDIUM_CONFIDENCE_MARGIN),
            Confidence::Medium
        );
        assert_eq!(
            confidence_for_score(ENHANCE_THRESHOLD + HIGH_CONFIDENCE_MARGIN),
            Confidence::High
        );
    }

    #[test]
    fn test_validation_failures() {
        let gene = GENES.gene("DREB1A").unwrap();
        let mut c = test_classifier();
        assert!(matches!(
            c.classify(gene, 0, 'A', 'V'),
            Err(TraitcastError::PositionOutOfRange { .. })
        ));
        assert!(matches!(
            c.classify(gene, gene.len() as i64 + 1, 'A', 'V'),
            Err(TraitcastError::PositionOutOfRange { .. })
        ));
        assert!(matches!(
            c.classify(gene, 142, 'T', 'V'),
            Err(TraitcastError::ResidueMismatch { actual: 'A', .. })
        ));
        assert!(matches!(
            c.classify(gene, 142, 'A', 'A'),
            Err(TraitcastError::InvalidSubstitution { .. })
        ));
        assert!(matches!(
            c.classify(gene, 142, 'A', 'X'),
            Err(TraitcastError::InvalidSubstitution { .. })
        ));
    }

    #[test]
    fn test_lowercase_input_is_normalized() {
        let gene = GENES.gene("DREB1A").unwrap();
        let mut c = test_classifier();
        let upper = c.classify(gene, 142, 'A', 'V').unwrap();
        let lower = c.classify(gene, 142, 'a', 'v').unwrap();
        assert_eq!(upper.impact, lower.impact);
        assert_eq!(upper.confidence, lower.confidence);
    }
}
