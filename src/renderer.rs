//! Chunked, position-indexed view of a gene sequence.

use crate::{gene_catalog::Gene, RESIDUES};
use serde::{Deserialize, Serialize};

/// Residues per rendered line unless the caller asks otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 60;

/// One rendered line: a 1-based start position and up to `chunk_size`
/// residues.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceLine {
    pub start_position: usize,
    pub residues: String,
}

/// Lazy iterator over the chunked lines of a gene sequence. Finite, and
/// restartable by calling [`render`] again.
pub struct SequenceLines<'a> {
    sequence: &'a str,
    chunk_size: usize,
    offset: usize,
}

impl<'a> Iterator for SequenceLines<'a> {
    type Item = SequenceLine;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.sequence.len() {
            return None;
        }
        let end = (self.offset + self.chunk_size).min(self.sequence.len());
        let line = SequenceLine {
            start_position: self.offset + 1,
            residues: self.sequence[self.offset..end].to_string(),
        };
        self.offset = end;
        Some(line)
    }
}

/// Chunked view of the gene sequence. A `chunk_size` of zero falls back to
/// [`DEFAULT_CHUNK_SIZE`].
pub fn render(gene: &Gene, chunk_size: usize) -> SequenceLines<'_> {
    let chunk_size = if chunk_size == 0 {
        DEFAULT_CHUNK_SIZE
    } else {
        chunk_size
    };
    SequenceLines {
        sequence: &gene.sequence,
        chunk_size,
        offset: 0,
    }
}

/// Descriptive label for a residue letter. Total: unknown characters echo
/// back as their own label rather than failing.
pub fn annotate(aa: char) -> String {
    match RESIDUES.get(aa) {
        Some(residue) => residue.name.clone(),
        None => aa.to_string(),
    }
}

/// Resolves a 0-based global index to `(line_index, offset_in_line)`. An
/// out-of-range target is simply unresolved (no highlight), not an error.
pub fn locate(gene: &Gene, global_index: i64, chunk_size: usize) -> Option<(usize, usize)> {
    let chunk_size = if chunk_size == 0 {
        DEFAULT_CHUNK_SIZE
    } else {
        chunk_size
    };
    if global_index < 0 || global_index >= gene.len() as i64 {
        return None;
    }
    let index = global_index as usize;
    Some((index / chunk_size, index % chunk_size))
}
