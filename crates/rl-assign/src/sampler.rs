//! Balanced sampling of condition labels for one cell.
//!
//! The pool is the vocabulary repeated in whole cycles until it covers the
//! cell (`ceil(n / k)` cycles). Only the final cycle may be cut short, so the
//! labels it contributes are shuffled first and the leading
//! `n - (cycles - 1) * k` of them are kept. The surviving `n` labels are then
//! shuffled uniformly. Every label therefore appears `floor(n / k)` or
//! `ceil(n / k)` times, and exactly `n / k` times when `k` divides `n`.

use rand::seq::SliceRandom;
use rand::Rng;
use rl_core::errors::{codes, ErrorInfo, RlError};

use crate::vocabulary::ConditionVocabulary;

/// Draws `n` vocabulary indices in `0..k` with counts differing by at most one.
///
/// `n == 0` returns an empty vector without touching `rng`.
pub fn balanced_indices<R: Rng + ?Sized>(
    n: usize,
    k: usize,
    rng: &mut R,
) -> Result<Vec<usize>, RlError> {
    if n == 0 {
        return Ok(Vec::new());
    }
    if k == 0 {
        return Err(RlError::Design(
            ErrorInfo::new(codes::INVALID_VOCABULARY, "cannot sample from an empty vocabulary")
                .with_context("cell_size", n.to_string()),
        ));
    }
    let cycles = (n + k - 1) / k;
    let mut pool: Vec<usize> = (0..cycles).flat_map(|_| 0..k).collect();
    let last_cycle = (cycles - 1) * k;
    pool[last_cycle..].shuffle(rng);
    pool.truncate(n);
    pool.shuffle(rng);
    Ok(pool)
}

/// Draws `n` condition labels from `vocabulary`.
pub fn balanced_sample<R: Rng + ?Sized>(
    n: usize,
    vocabulary: &ConditionVocabulary,
    rng: &mut R,
) -> Result<Vec<String>, RlError> {
    let labels = vocabulary.labels();
    Ok(balanced_indices(n, labels.len(), rng)?
        .into_iter()
        .map(|idx| labels[idx].clone())
        .collect())
}

/// Per-label counts of a drawn sequence of indices.
pub fn index_counts(indices: &[usize], k: usize) -> Vec<usize> {
    let mut counts = vec![0; k];
    for &idx in indices {
        counts[idx] += 1;
    }
    counts
}
