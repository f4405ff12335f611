use gene_catalog::GeneCatalog;
use lazy_static::lazy_static;
use residues::Residues;

pub mod classifier;
pub mod error;
pub mod gene_catalog;
pub mod history;
pub mod projector;
pub mod renderer;
pub mod residues;

lazy_static! {
    // Canonical amino-acid reference table
    pub static ref RESIDUES: Residues = Residues::default();

    // Reference gene catalog (static data, never persisted with predictions)
    pub static ref GENES: GeneCatalog = GeneCatalog::load();
}
