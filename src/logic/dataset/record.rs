use serde::{Deserialize, Serialize};

/// One row of the training table. Column names match the CSV header.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TrainingSample {
    /// Optical absorbance (feature)
    #[serde(rename = "X")]
    pub absorbance: f64,

    /// Reference glucose in mg/dL (target)
    #[serde(rename = "y")]
    pub glucose: f64,
}

impl TrainingSample {
    pub fn new(absorbance: f64, glucose: f64) -> Self {
        Self { absorbance, glucose }
    }
}

/// Split a slice of samples into feature and target columns
pub fn columns(samples: &[TrainingSample]) -> (Vec<f64>, Vec<f64>) {
    samples.iter().map(|s| (s.absorbance, s.glucose)).unzip()
}
