//! End-to-end flow: classify a point mutation and track it through the
//! persisted prediction history.

use std::collections::HashSet;
use traitcast::{
    classifier::{Classifier, Clock, Confidence, IdSource, Impact},
    error::TraitcastError,
    history::{MemoryStore, PredictionHistory, HISTORY_CAP},
    GENES,
};

struct FixedClock(u64);

impl Clock for FixedClock {
    fn now_unix_ms(&self) -> u64 {
        self.0
    }
}

#[derive(Default)]
struct SeqIds(u64);

impl IdSource for SeqIds {
    fn next_id(&mut self) -> String {
        self.0 += 1;
        format!("t-{}", self.0)
    }
}

fn test_classifier() -> Classifier {
    Classifier::new(Box::new(SeqIds::default()), Box::new(FixedClock(42)))
}

#[test]
fn classify_and_record_dreb1a_substitution() {
    let gene = GENES.gene("DREB1A").unwrap();
    assert_eq!(gene.residue_at(142), Some('A'));

    let mut classifier = test_classifier();
    let mut history = PredictionHistory::open(Box::new(MemoryStore::default()));

    let prediction = classifier.classify(gene, 142, 'A', 'V').unwrap();
    assert!(matches!(
        prediction.impact,
        Impact::Enhance | Impact::Neutral | Impact::Impair
    ));
    assert!(matches!(
        prediction.confidence,
        Confidence::Low | Confidence::Medium | Confidence::High
    ));

    history.record(prediction.clone());
    let head = &history.list()[0];
    assert_eq!(head.gene_id, "DREB1A");
    assert_eq!(head, &prediction);
}

#[test]
fn residue_mismatch_leaves_history_unchanged() {
    let gene = GENES.gene("DREB1A").unwrap();
    let mut classifier = test_classifier();
    let mut history = PredictionHistory::open(Box::new(MemoryStore::default()));

    let recorded = classifier.classify(gene, 142, 'A', 'V').unwrap();
    history.record(recorded);
    let before = history.len();

    // Stated original 'T' does not match the actual residue 'A'; the
    // attempt must fail and nothing may reach the history.
    let err = classifier.classify(gene, 142, 'T', 'V').unwrap_err();
    assert!(matches!(
        err,
        TraitcastError::ResidueMismatch {
            stated: 'T',
            actual: 'A',
            ..
        }
    ));
    assert_eq!(history.len(), before);
}

#[test]
fn repeated_predictions_respect_cap_and_order() {
    let gene = GENES.gene("SOS1").unwrap();
    let mut classifier = test_classifier();
    let mut history = PredictionHistory::open(Box::new(MemoryStore::default()));

    // Walk the sequence recording one valid substitution per position.
    let mut recorded = 0;
    for (index, original) in gene.sequence.chars().enumerate() {
        let mutated = if original == 'A' { 'V' } else { 'A' };
        let prediction = classifier
            .classify(gene, index as i64 + 1, original, mutated)
            .unwrap();
        history.record(prediction);
        recorded += 1;
        assert!(history.len() <= HISTORY_CAP);
        if recorded > HISTORY_CAP + 5 {
            break;
        }
    }
    assert_eq!(history.len(), HISTORY_CAP);

    // Newest first: ids are sequential, so they must strictly descend.
    let ids: Vec<u64> = history
        .list()
        .iter()
        .map(|p| p.id.trim_start_matches("t-").parse().unwrap())
        .collect();
    assert!(ids.windows(2).all(|w| w[0] > w[1]));

    // remove() keeps the relative order of the survivors.
    let victims: HashSet<String> = ids
        .iter()
        .step_by(2)
        .map(|id| format!("t-{id}"))
        .collect();
    history.remove(&victims);
    let rest: Vec<u64> = history
        .list()
        .iter()
        .map(|p| p.id.trim_start_matches("t-").parse().unwrap())
        .collect();
    assert!(rest.windows(2).all(|w| w[0] > w[1]));
    assert_eq!(rest.len(), HISTORY_CAP / 2);
}
