//! Fitted pipeline: StandardScaler -> RandomForest

use serde::{Deserialize, Serialize};

use crate::logic::dataset::TrainingSample;

use super::forest::{ForestParams, RandomForest};
use super::scaler::StandardScaler;
use super::Regressor;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlucoseModel {
    pub scaler: StandardScaler,
    pub forest: RandomForest,
}

impl GlucoseModel {
    /// Fit the scaler on `samples` only, then the forest on the scaled feature
    pub fn fit(samples: &[TrainingSample], params: ForestParams, seed: u64) -> Self {
        let (x, y) = crate::logic::dataset::record::columns(samples);
        let scaler = StandardScaler::fit(&x);
        let scaled = scaler.transform_all(&x);
        let forest = RandomForest::fit(&scaled, &y, params, seed);
        Self { scaler, forest }
    }

    pub fn params(&self) -> ForestParams {
        self.forest.params
    }
}

impl Regressor for GlucoseModel {
    fn predict(&self, absorbance: f64) -> f64 {
        self.forest.predict(self.scaler.transform(absorbance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaler_fitted_on_training_samples_only() {
        let samples: Vec<TrainingSample> = (0..20)
            .map(|i| TrainingSample::new(0.5 + i as f64 * 0.05, 90.0 + i as f64 * 4.0))
            .collect();
        let model = GlucoseModel::fit(&samples, ForestParams { n_estimators: 5, ..Default::default() }, 42);

        let mean = samples.iter().map(|s| s.absorbance).sum::<f64>() / 20.0;
        assert!((model.scaler.mean - mean).abs() < 1e-12);
        assert_eq!(model.params().n_estimators, 5);
    }

    #[test]
    fn test_predict_is_finite_for_finite_inputs() {
        let samples: Vec<TrainingSample> = (0..30)
            .map(|i| TrainingSample::new(i as f64 * 0.03, 70.0 + (i % 7) as f64 * 15.0))
            .collect();
        let model = GlucoseModel::fit(&samples, ForestParams { n_estimators: 8, max_depth: Some(10), ..Default::default() }, 42);

        for x in [f64::MIN, -1.0, 0.0, 0.5, 1.0, 3.3, f64::MAX] {
            assert!(model.predict(x).is_finite(), "predict({}) not finite", x);
        }
        // Repeated predictions never change the model
        assert_eq!(model.predict(0.42), model.predict(0.42));
    }
}
