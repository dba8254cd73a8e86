//! K-fold cross-validation of one forest configuration

use serde::Serialize;

use crate::logic::dataset::{k_fold, DatasetError, TrainingSample};
use crate::logic::model::metrics::mean_absolute_error;
use crate::logic::model::{ForestParams, GlucoseModel, Regressor};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CvScore {
    pub fold_mae: Vec<f64>,
    pub mean_mae: f64,
}

/// Fit a fresh pipeline per fold (scaler included) and score it on the
/// held-out fold. Every fold uses the same forest seed.
pub fn cross_validate(
    samples: &[TrainingSample],
    params: ForestParams,
    folds: usize,
    seed: u64,
) -> Result<CvScore, DatasetError> {
    let fold_mae = k_fold(samples.len(), folds)?
        .into_iter()
        .map(|fold| {
            let train: Vec<TrainingSample> = fold.train.iter().map(|&i| samples[i]).collect();
            let model = GlucoseModel::fit(&train, params, seed);

            let actual: Vec<f64> = fold.validation.iter().map(|&i| samples[i].glucose).collect();
            let predicted: Vec<f64> = fold
                .validation
                .iter()
                .map(|&i| model.predict(samples[i].absorbance))
                .collect();
            mean_absolute_error(&actual, &predicted)
        })
        .collect::<Vec<_>>();

    let mean_mae = fold_mae.iter().sum::<f64>() / fold_mae.len() as f64;
    Ok(CvScore { fold_mae, mean_mae })
}
