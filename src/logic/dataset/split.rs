//! Seeded train/test split and contiguous k-fold partitioning.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::loader::DatasetError;
use super::record::TrainingSample;

/// Result of a train/test split
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Vec<TrainingSample>,
    pub test: Vec<TrainingSample>,
}

/// Shuffle with a fixed seed and hold out `ceil(n * test_fraction)` samples.
/// The held-out samples are the first ones of the permutation.
pub fn train_test_split(
    samples: &[TrainingSample],
    test_fraction: f64,
    seed: u64,
) -> Result<Split, DatasetError> {
    let n = samples.len();
    if n < 2 {
        return Err(DatasetError::TooSmall { needed: 2, got: n });
    }

    let n_test = ((n as f64) * test_fraction).ceil() as usize;
    let n_test = n_test.clamp(1, n - 1);

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    Ok(Split {
        train: train_idx.iter().map(|&i| samples[i]).collect(),
        test: test_idx.iter().map(|&i| samples[i]).collect(),
    })
}

/// Index sets of one cross-validation fold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

/// Contiguous, unshuffled folds. The first `n % k` folds get one extra sample.
pub fn k_fold(n: usize, k: usize) -> Result<Vec<Fold>, DatasetError> {
    if k < 2 || n < k {
        return Err(DatasetError::TooSmall { needed: k.max(2), got: n });
    }

    let base = n / k;
    let extra = n % k;
    let mut folds = Vec::with_capacity(k);
    let mut start = 0;

    for fold in 0..k {
        let size = base + usize::from(fold < extra);
        let end = start + size;
        folds.push(Fold {
            train: (0..start).chain(end..n).collect(),
            validation: (start..end).collect(),
        });
        start = end;
    }

    Ok(folds)
}
