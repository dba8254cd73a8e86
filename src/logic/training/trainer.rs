//! End-to-end training run

use serde::Serialize;
use thiserror::Error;

use crate::logic::config::TrainingConfig;
use crate::logic::dataset::{self, DatasetError, TrainingSample};
use crate::logic::model::{self, ForestParams, GlucoseModel, ModelError, RegressionMetrics, Regressor};

use super::grid::{GridSearch, ParamGrid};

/// Absorbance used for the sample prediction in the report
pub const EXAMPLE_ABSORBANCE: f64 = 1.0;

/// Points sampled across the observed absorbance range
pub const CURVE_POINTS: usize = 100;

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("hyperparameter grid is empty")]
    EmptyGrid,
}

/// Everything printed after a run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub best_params: ForestParams,
    pub cv_mean_mae: f64,
    pub n_train: usize,
    pub n_test: usize,
    pub metrics: RegressionMetrics,
    /// (actual, predicted) for every test sample
    pub test_predictions: Vec<(f64, f64)>,
    pub example_prediction: f64,
    /// (min, max) prediction across the absorbance range of the dataset
    pub curve_range: (f64, f64),
    pub checksum: Option<String>,
}

impl TrainingReport {
    pub fn log(&self) {
        log::info!("Best parameters: {}", self.best_params);
        log::info!("Best CV mean absolute error: {:.2} mg/dL", self.cv_mean_mae);
        log::info!("Mean Absolute Error: {:.2} mg/dL", self.metrics.mae);
        log::info!("Root Mean Squared Error: {:.2} mg/dL", self.metrics.rmse);
        log::info!("Mean Squared Error: {:.2} mg/dL", self.metrics.mse);
        log::info!("R² Score: {:.4}", self.metrics.r2);

        log::info!("Actual vs Predicted Values:");
        for (actual, predicted) in &self.test_predictions {
            log::info!("Actual: {:.1}, Predicted: {:.1}", actual, predicted);
        }

        log::info!(
            "For absorbance value of {}, predicted glucose: {:.1} mg/dL",
            EXAMPLE_ABSORBANCE,
            self.example_prediction
        );
        log::info!(
            "Predictions across absorbance range: {:.1} - {:.1} mg/dL",
            self.curve_range.0,
            self.curve_range.1
        );
    }
}

/// Load the dataset, fit, evaluate and persist the artifact
pub fn train(config: &TrainingConfig) -> Result<TrainingReport, TrainingError> {
    let samples = dataset::load_samples(&config.dataset_path)?;
    let (fitted, mut report) = train_on_samples(&samples, &ParamGrid::default(), config)?;

    report.checksum = Some(model::save_model(&fitted, &config.model_path)?);
    Ok(report)
}

/// Fit and evaluate without touching the filesystem
pub fn train_on_samples(
    samples: &[TrainingSample],
    grid: &ParamGrid,
    config: &TrainingConfig,
) -> Result<(GlucoseModel, TrainingReport), TrainingError> {
    let split = dataset::train_test_split(samples, config.test_fraction, config.seed)?;
    log::info!("Split: {} train / {} test samples", split.train.len(), split.test.len());

    let search = GridSearch::new(grid.clone(), config.cv_folds, config.seed);
    let result = search.run(&split.train)?.ok_or(TrainingError::EmptyGrid)?;

    let best = GlucoseModel::fit(&split.train, result.best_params, config.seed);

    let actual: Vec<f64> = split.test.iter().map(|s| s.glucose).collect();
    let absorbance: Vec<f64> = split.test.iter().map(|s| s.absorbance).collect();
    let predicted = best.predict_many(&absorbance);
    let metrics = RegressionMetrics::compute(&actual, &predicted);

    let report = TrainingReport {
        best_params: result.best_params,
        cv_mean_mae: result.best_score.mean_mae,
        n_train: split.train.len(),
        n_test: split.test.len(),
        metrics,
        test_predictions: actual.into_iter().zip(predicted).collect(),
        example_prediction: best.predict(EXAMPLE_ABSORBANCE),
        curve_range: response_range(&best, samples),
        checksum: None,
    };

    Ok((best, report))
}

/// Min and max prediction over evenly spaced absorbance values
fn response_range(model: &GlucoseModel, samples: &[TrainingSample]) -> (f64, f64) {
    let lo = samples.iter().map(|s| s.absorbance).fold(f64::INFINITY, f64::min);
    let hi = samples.iter().map(|s| s.absorbance).fold(f64::NEG_INFINITY, f64::max);

    linspace(lo, hi, CURVE_POINTS)
        .into_iter()
        .map(|x| model.predict(x))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(mn, mx), p| (mn.min(p), mx.max(p)))
}

fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (points - 1) as f64;
            (0..points).map(|i| start + step * i as f64).collect()
        }
    }
}
