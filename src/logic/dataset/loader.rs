//! CSV loader for the training table.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use super::record::TrainingSample;

/// Required header names
pub const FEATURE_COLUMN: &str = "X";
pub const TARGET_COLUMN: &str = "y";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset is missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("malformed row: {0}")]
    Malformed(#[from] csv::Error),

    #[error("non-finite value on data row {row}")]
    NonFinite { row: usize },

    #[error("dataset has no rows")]
    Empty,

    #[error("need at least {needed} samples, got {got}")]
    TooSmall { needed: usize, got: usize },
}

/// Load every sample from a CSV file with `X` and `y` columns
pub fn load_samples(path: impl AsRef<Path>) -> Result<Vec<TrainingSample>, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let samples = read_samples(file)?;
    log::info!("Loaded {} samples from {}", samples.len(), path.display());
    Ok(samples)
}

/// Parse samples from any reader. Extra columns are ignored.
pub fn read_samples<R: Read>(reader: R) -> Result<Vec<TrainingSample>, DatasetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in [FEATURE_COLUMN, TARGET_COLUMN] {
        if !headers.iter().any(|h| h == column) {
            return Err(DatasetError::MissingColumn(column));
        }
    }

    let mut samples = Vec::new();
    for (idx, row) in rdr.deserialize::<TrainingSample>().enumerate() {
        let sample = row?;
        if !sample.absorbance.is_finite() || !sample.glucose.is_finite() {
            return Err(DatasetError::NonFinite { row: idx + 1 });
        }
        samples.push(sample);
    }

    if samples.is_empty() {
        return Err(DatasetError::Empty);
    }

    Ok(samples)
}
