use crate::{error::TraitcastError, RESIDUES};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Phenotypic trait a gene is evaluated against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropTrait {
    DroughtTolerance,
    SaltTolerance,
    HeatTolerance,
    PestResistance,
    NutrientEfficiency,
}

impl CropTrait {
    pub fn label(&self) -> &'static str {
        match self {
            Self::DroughtTolerance => "Drought Tolerance",
            Self::SaltTolerance => "Salt Tolerance",
            Self::HeatTolerance => "Heat Tolerance",
            Self::PestResistance => "Pest Resistance",
            Self::NutrientEfficiency => "Nutrient Efficiency",
        }
    }

    /// Display color for radar/gauge rendering. Exhaustive; collaborators
    /// that see a trait they do not recognize should use [`Self::FALLBACK_COLOR`].
    pub fn color(&self) -> &'static str {
        match self {
            Self::DroughtTolerance => "#d97706",
            Self::SaltTolerance => "#0891b2",
            Self::HeatTolerance => "#dc2626",
            Self::PestResistance => "#65a30d",
            Self::NutrientEfficiency => "#7c3aed",
        }
    }

    pub const FALLBACK_COLOR: &'static str = "#6b7280";
}

/// One reference gene. Immutable after catalog load.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Gene {
    pub id: String,
    pub name: String,
    #[serde(rename = "trait")]
    pub crop_trait: CropTrait,
    pub description: String,
    pub sequence: String,
}

impl Gene {
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Residue at a 1-based position, if in range.
    #[inline(always)]
    pub fn residue_at(&self, position: usize) -> Option<char> {
        if position < 1 {
            return None;
        }
        self.sequence.chars().nth(position - 1)
    }
}

/// Static catalog of reference genes. Read-only after construction; the
/// catalog is reference data and is never persisted with user predictions.
#[derive(Clone, Debug, Default)]
pub struct GeneCatalog {
    genes: HashMap<String, Gene>,
    order: Vec<String>,
}

impl GeneCatalog {
    pub fn load() -> Self {
        let data = include_str!("../assets/genes.json");
        let rows: Vec<serde_json::Value> =
            serde_json::from_str(data).expect("Gene catalog is not a JSON array");
        let mut ret = Self::default();
        for row in rows {
            let gene: Gene = match serde_json::from_value(row.clone()) {
                Ok(gene) => gene,
                Err(e) => {
                    log::warn!("Skipping bad gene catalog entry: {row}: {e}");
                    continue;
                }
            };
            match Self::normalize(gene) {
                Ok(gene) => {
                    ret.order.push(gene.id.clone());
                    ret.genes.insert(gene.id.clone(), gene);
                }
                Err(e) => log::warn!("Skipping invalid gene: {e}"),
            }
        }
        ret
    }

    /// Uppercases the sequence and rejects genes that are empty or carry
    /// letters outside the canonical alphabet.
    fn normalize(mut gene: Gene) -> Result<Gene, TraitcastError> {
        gene.sequence = gene.sequence.to_ascii_uppercase();
        if gene.sequence.is_empty() {
            return Err(TraitcastError::InvalidGene(format!(
                "{} has an empty sequence",
                gene.id
            )));
        }
        for (i, aa) in gene.sequence.chars().enumerate() {
            if !RESIDUES.is_valid_letter(aa) {
                return Err(TraitcastError::InvalidGene(format!(
                    "{} has non-residue '{aa}' at index {i}",
                    gene.id
                )));
            }
        }
        Ok(gene)
    }

    pub fn gene(&self, id: &str) -> Result<&Gene, TraitcastError> {
        self.genes
            .get(id)
            .ok_or_else(|| TraitcastError::GeneNotFound(id.to_string()))
    }

    /// 1-based position bounds check against the gene's sequence.
    pub fn validate_position(&self, gene: &Gene, position: i64) -> Result<(), TraitcastError> {
        if position < 1 || position > gene.len() as i64 {
            return Err(TraitcastError::PositionOutOfRange {
                position,
                length: gene.len(),
            });
        }
        Ok(())
    }

    /// Genes in catalog file order.
    pub fn iter(&self) -> impl Iterator<Item = &Gene> {
        self.order.iter().filter_map(|id| self.genes.get(id))
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}
