//! Glucosync - Model training
//!
//! Fits the absorbance -> glucose pipeline on the configured dataset and
//! writes the artifact consumed by the inference service.

use anyhow::Context;

use glucosync::constants;
use glucosync::logic::config::TrainingConfig;
use glucosync::logic::training;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenvy::dotenv().ok();

    log::info!("Starting {} v{} (training)", constants::APP_NAME, constants::APP_VERSION);

    let config = TrainingConfig::from_env();
    if let Err(e) = run(&config) {
        log::error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

fn run(config: &TrainingConfig) -> anyhow::Result<()> {
    let report = training::train(config)
        .with_context(|| format!("training on {} failed", config.dataset_path.display()))?;

    report.log();
    log::info!("Model written to {}", config.model_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_dataset_reports_path() {
        let dir = tempdir().unwrap();
        let config = TrainingConfig {
            dataset_path: dir.path().join("missing.csv"),
            model_path: dir.path().join("rf_glucose_model.json"),
            test_fraction: 0.25,
            cv_folds: 5,
            seed: 42,
        };

        let err = run(&config).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.starts_with("training on "), "{}", message);
        assert!(message.contains("missing.csv"), "{}", message);
        assert!(!config.model_path.exists());
    }
}
