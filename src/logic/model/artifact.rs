//! Model artifact persistence
//!
//! The artifact is the JSON form of `GlucoseModel`. It is the only handoff
//! between training and inference. A SHA-256 of the file is logged on both
//! sides so an operator can match a served model to a training run.

use std::fs;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};
use thiserror::Error;

use super::pipeline::GlucoseModel;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model file '{path}' was not found (working directory: {cwd})")]
    NotFound { path: String, cwd: String },

    #[error("failed to access model file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("model file is not a valid artifact: {0}")]
    Format(#[from] serde_json::Error),

    #[error("model artifact is inconsistent: {0}")]
    Invalid(&'static str),
}

/// Hex SHA-256 of the artifact bytes
pub fn artifact_checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Serialize the fitted model to `path`, returning its checksum
pub fn save_model(model: &GlucoseModel, path: impl AsRef<Path>) -> Result<String, ModelError> {
    let path = path.as_ref();
    let bytes = serde_json::to_vec(model)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| io_error(path, source))?;
    }
    fs::write(path, &bytes).map_err(|source| io_error(path, source))?;

    let checksum = artifact_checksum(&bytes);
    log::info!("Model saved to {} (sha256 {})", path.display(), checksum);
    Ok(checksum)
}

/// Load a previously saved model
pub fn load_model(path: impl AsRef<Path>) -> Result<GlucoseModel, ModelError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ModelError::NotFound {
                path: path.display().to_string(),
                cwd: std::env::current_dir()
                    .map(|d| d.display().to_string())
                    .unwrap_or_else(|_| "unknown".to_string()),
            }
        } else {
            io_error(path, source)
        }
    })?;

    let model: GlucoseModel = serde_json::from_slice(&bytes)?;
    validate(&model)?;

    log::info!(
        "Model loaded from {} ({} trees, sha256 {})",
        path.display(),
        model.forest.n_trees(),
        artifact_checksum(&bytes)
    );
    Ok(model)
}

fn validate(model: &GlucoseModel) -> Result<(), ModelError> {
    if model.forest.n_trees() == 0 {
        return Err(ModelError::Invalid("forest has no trees"));
    }
    if !model.scaler.mean.is_finite() || !model.scaler.scale.is_finite() || model.scaler.scale == 0.0 {
        return Err(ModelError::Invalid("scaler parameters are not usable"));
    }
    if !model.forest.trees().iter().all(|t| t.is_well_formed()) {
        return Err(ModelError::Invalid("tree structure is corrupt"));
    }
    Ok(())
}

fn io_error(path: &Path, source: io::Error) -> ModelError {
    ModelError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::dataset::TrainingSample;
    use crate::logic::model::{ForestParams, Regressor};
    use tempfile::tempdir;

    fn fitted() -> GlucoseModel {
        let samples: Vec<TrainingSample> = (0..25)
            .map(|i| TrainingSample::new(0.2 + i as f64 * 0.04, 85.0 + i as f64 * 3.0))
            .collect();
        GlucoseModel::fit(&samples, ForestParams { n_estimators: 6, ..Default::default() }, 42)
    }

    #[test]
    fn test_save_then_load_twice_predicts_identically() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rf_glucose_model.json");
        let model = fitted();

        let checksum = save_model(&model, &path).unwrap();
        assert_eq!(checksum.len(), 64);

        let first = load_model(&path).unwrap();
        let second = load_model(&path).unwrap();
        assert_eq!(first, model);

        for x in [0.1, 0.5, 0.873, 1.0] {
            let a = first.predict(x);
            assert_eq!(a, first.predict(x));
            assert_eq!(a, second.predict(x));
            assert_eq!(a, model.predict(x));
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_model(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ModelError::NotFound { .. }));
    }

    #[test]
    fn test_garbage_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, b"not json").unwrap();
        assert!(matches!(load_model(&path).unwrap_err(), ModelError::Format(_)));
    }

    #[test]
    fn test_empty_forest_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut value = serde_json::to_value(fitted()).unwrap();
        value["forest"]["trees"] = serde_json::json!([]);
        fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();

        assert!(matches!(load_model(&path).unwrap_err(), ModelError::Invalid(_)));
    }

    #[test]
    fn test_checksum_is_stable() {
        assert_eq!(
            artifact_checksum(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
