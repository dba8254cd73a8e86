//! Exhaustive hyperparameter grid

use rayon::prelude::*;
use serde::Serialize;

use crate::logic::dataset::{TrainingSample, DatasetError};
use crate::logic::model::ForestParams;

use super::cv::{cross_validate, CvScore};

/// Candidate values for each forest hyperparameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamGrid {
    pub n_estimators: Vec<usize>,
    pub max_depth: Vec<Option<usize>>,
    pub min_samples_split: Vec<usize>,
    pub min_samples_leaf: Vec<usize>,
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self {
            n_estimators: vec![50, 100, 150, 200],
            max_depth: vec![None, Some(10), Some(20), Some(30)],
            min_samples_split: vec![2, 5, 10],
            min_samples_leaf: vec![1, 2, 4],
        }
    }
}

impl ParamGrid {
    /// All combinations. Parameter names are iterated alphabetically with
    /// the last one varying fastest, so the order (and therefore tie-breaking)
    /// is stable.
    pub fn candidates(&self) -> Vec<ForestParams> {
        let mut out = Vec::with_capacity(self.len());
        for &max_depth in &self.max_depth {
            for &min_samples_leaf in &self.min_samples_leaf {
                for &min_samples_split in &self.min_samples_split {
                    for &n_estimators in &self.n_estimators {
                        out.push(ForestParams {
                            n_estimators,
                            max_depth,
                            min_samples_split,
                            min_samples_leaf,
                        });
                    }
                }
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.n_estimators.len()
            * self.max_depth.len()
            * self.min_samples_split.len()
            * self.min_samples_leaf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of the search
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub best_params: ForestParams,
    pub best_score: CvScore,
    pub evaluated: usize,
}

/// Grid search configuration
#[derive(Debug, Clone)]
pub struct GridSearch {
    pub grid: ParamGrid,
    pub folds: usize,
    pub seed: u64,
}

impl GridSearch {
    pub fn new(grid: ParamGrid, folds: usize, seed: u64) -> Self {
        Self { grid, folds, seed }
    }

    /// Score every candidate in parallel and pick the lowest mean MAE.
    /// Ties keep the earlier candidate.
    pub fn run(&self, samples: &[TrainingSample]) -> Result<Option<SearchResult>, DatasetError> {
        let candidates = self.grid.candidates();
        log::info!(
            "Fitting {} folds for each of {} candidates, totalling {} fits",
            self.folds,
            candidates.len(),
            self.folds * candidates.len()
        );

        let scores = candidates
            .par_iter()
            .map(|params| cross_validate(samples, *params, self.folds, self.seed))
            .collect::<Result<Vec<_>, _>>()?;

        let mut best: Option<(usize, CvScore)> = None;
        for (idx, score) in scores.iter().enumerate() {
            log::debug!("[{}] {} -> mean MAE {:.4}", idx, candidates[idx], score.mean_mae);
            if best.as_ref().map_or(true, |(_, b)| score.mean_mae < b.mean_mae) {
                best = Some((idx, score.clone()));
            }
        }

        Ok(best.map(|(idx, best_score)| SearchResult {
            best_params: candidates[idx],
            best_score,
            evaluated: candidates.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_has_144_candidates() {
        let grid = ParamGrid::default();
        assert_eq!(grid.len(), 144);
        let candidates = grid.candidates();
        assert_eq!(candidates.len(), 144);

        // Last parameter (n_estimators) varies fastest
        assert_eq!(candidates[0], ForestParams { n_estimators: 50, max_depth: None, min_samples_split: 2, min_samples_leaf: 1 });
        assert_eq!(candidates[1].n_estimators, 100);
        assert_eq!(candidates[4].min_samples_split, 5);
        assert_eq!(candidates[143], ForestParams { n_estimators: 200, max_depth: Some(30), min_samples_split: 10, min_samples_leaf: 4 });
    }

    #[test]
    fn test_search_is_deterministic() {
        let samples: Vec<TrainingSample> = (0..30)
            .map(|i| TrainingSample::new(i as f64 * 0.05, 90.0 + ((i * 7) % 11) as f64 * 6.0))
            .collect();
        let grid = ParamGrid {
            n_estimators: vec![3, 5],
            max_depth: vec![None, Some(2)],
            min_samples_split: vec![2],
            min_samples_leaf: vec![1, 4],
        };
        let search = GridSearch::new(grid, 5, 42);

        let a = search.run(&samples).unwrap().unwrap();
        let b = search.run(&samples).unwrap().unwrap();
        assert_eq!(a.evaluated, 8);
        assert_eq!(a.best_params, b.best_params);
        assert_eq!(a.best_score.mean_mae, b.best_score.mean_mae);
    }

    #[test]
    fn test_empty_grid_yields_nothing() {
        let grid = ParamGrid { n_estimators: vec![], ..Default::default() };
        let samples: Vec<TrainingSample> = (0..10).map(|i| TrainingSample::new(i as f64, i as f64)).collect();
        assert!(GridSearch::new(grid, 5, 42).run(&samples).unwrap().is_none());
    }
}
