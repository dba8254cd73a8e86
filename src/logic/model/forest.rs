//! Random Forest regressor (bagged regression trees)

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::tree::{RegressionTree, TreeParams};

/// Hyperparameters searched by the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl ForestParams {
    pub fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        }
    }
}

impl std::fmt::Display for ForestParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let depth = self
            .max_depth
            .map_or_else(|| "None".to_string(), |d| d.to_string());
        write!(
            f,
            "n_estimators={}, max_depth={}, min_samples_split={}, min_samples_leaf={}",
            self.n_estimators, depth, self.min_samples_split, self.min_samples_leaf
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub params: ForestParams,
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fit `params.n_estimators` trees, each on a bootstrap sample of
    /// `(x, y)`. Per-tree seeds are drawn from one RNG seeded with `seed`,
    /// so a given seed always yields the same forest.
    pub fn fit(x: &[f64], y: &[f64], params: ForestParams, seed: u64) -> Self {
        let n = x.len().min(y.len());
        let tree_params = params.tree_params();
        let mut seeder = StdRng::seed_from_u64(seed);

        let trees = (0..params.n_estimators.max(1))
            .map(|_| {
                let mut rng = StdRng::seed_from_u64(seeder.gen());
                let bootstrap: Vec<(f64, f64)> = (0..n)
                    .map(|_| {
                        let i = rng.gen_range(0..n);
                        (x[i], y[i])
                    })
                    .collect();
                RegressionTree::fit(bootstrap, &tree_params)
            })
            .collect();

        Self { params, trees }
    }

    /// Mean of the per-tree predictions
    pub fn predict(&self, x: f64) -> f64 {
        if self.trees.is_empty() {
            return f64::NAN;
        }
        self.trees.iter().map(|t| t.predict(x)).sum::<f64>() / self.trees.len() as f64
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }
}
