use thiserror::Error;

/// Error taxonomy for the prediction core.
///
/// Validation errors block prediction creation and are surfaced to the
/// caller; `PersistenceCorrupt` is recovered locally by the history store
/// and only ever logged.
#[derive(Debug, Error)]
pub enum TraitcastError {
    #[error("Unknown gene '{0}'")]
    GeneNotFound(String),

    #[error("Position {position} is out of range 1..={length}")]
    PositionOutOfRange { position: i64, length: usize },

    #[error("Residue at position {position} is '{actual}', not '{stated}'")]
    ResidueMismatch {
        position: usize,
        stated: char,
        actual: char,
    },

    #[error("Invalid substitution '{original}' -> '{mutated}': {reason}")]
    InvalidSubstitution {
        original: char,
        mutated: char,
        reason: String,
    },

    #[error("Invalid gene catalog entry: {0}")]
    InvalidGene(String),

    #[error("Persisted history is unreadable: {0}")]
    PersistenceCorrupt(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}
