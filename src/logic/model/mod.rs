//! Model Module - Absorbance to glucose regression
//!
//! `GlucoseModel` is the fitted pipeline (standard scaler + random forest).
//! It is written once by the training flow and loaded once by the
//! inference flow through `artifact`.

pub mod scaler;
pub mod tree;
pub mod forest;
pub mod pipeline;
pub mod artifact;
pub mod metrics;

pub use artifact::{load_model, save_model, ModelError};
pub use forest::{ForestParams, RandomForest};
pub use metrics::RegressionMetrics;
pub use pipeline::GlucoseModel;
pub use scaler::StandardScaler;

/// Anything that maps one absorbance reading to a glucose estimate.
///
/// Implemented by the fitted pipeline; tests substitute fixed stubs.
pub trait Regressor {
    fn predict(&self, absorbance: f64) -> f64;

    fn predict_many(&self, absorbance: &[f64]) -> Vec<f64> {
        absorbance.iter().map(|&a| self.predict(a)).collect()
    }
}
