use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Coarse physicochemical class of an amino acid side chain. Transitions
/// between distant classes bias the classifier toward `Impair`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResidueClass {
    Hydrophobic,
    Polar,
    Charged,
    Small,
    Cyclic,
}

impl ResidueClass {
    fn from_label(label: &str) -> Option<Self> {
        match label {
            "Hydrophobic" => Some(Self::Hydrophobic),
            "Polar" => Some(Self::Polar),
            "Charged" => Some(Self::Charged),
            "Small" => Some(Self::Small),
            "Cyclic" => Some(Self::Cyclic),
            _ => None,
        }
    }

    /// Class pairs that tolerate substitution without a strong bias either
    /// way. Symmetric.
    pub fn is_related(self, other: Self) -> bool {
        use ResidueClass::*;
        matches!(
            (self, other),
            (Hydrophobic, Cyclic)
                | (Cyclic, Hydrophobic)
                | (Small, Polar)
                | (Polar, Small)
                | (Polar, Charged)
                | (Charged, Polar)
                | (Small, Hydrophobic)
                | (Hydrophobic, Small)
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Residue {
    pub aa: char,
    pub tla: String,
    pub name: String,
    pub class: ResidueClass,
}

/// The 20-letter canonical amino-acid table, keyed by single-letter code.
#[derive(Clone, Debug)]
pub struct Residues {
    residues: HashMap<char, Residue>,
}

impl Default for Residues {
    fn default() -> Self {
        Self::load()
    }
}

impl Residues {
    pub fn load() -> Self {
        let data = include_str!("../assets/residues.csv");
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .from_reader(data.as_bytes());
        let mut residues = HashMap::new();
        for result in rdr.records() {
            let record = result.expect("Bad residue CSV line");
            let aa = record
                .get(0)
                .and_then(|s| s.chars().next())
                .expect("Missing residue letter");
            let class = record
                .get(3)
                .and_then(ResidueClass::from_label)
                .expect("Unknown residue class");
            residues.insert(
                aa,
                Residue {
                    aa,
                    tla: record.get(1).unwrap_or_default().to_string(),
                    name: record.get(2).unwrap_or_default().to_string(),
                    class,
                },
            );
        }
        Self { residues }
    }

    #[inline(always)]
    pub fn get(&self, aa: char) -> Option<&Residue> {
        self.residues.get(&aa.to_ascii_uppercase())
    }

    #[inline(always)]
    pub fn is_valid_letter(&self, aa: char) -> bool {
        self.residues.contains_key(&aa.to_ascii_uppercase())
    }

    #[inline(always)]
    pub fn class_of(&self, aa: char) -> Option<ResidueClass> {
        self.get(aa).map(|r| r.class)
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}
