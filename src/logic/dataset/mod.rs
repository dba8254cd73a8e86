//! Dataset Module - Training data for the absorbance regressor
//!
//! Loads (absorbance, glucose) pairs from a two-column CSV file and
//! produces the seeded train/test split and cross-validation folds.

pub mod record;
pub mod loader;
pub mod split;


pub use loader::{load_samples, read_samples, DatasetError};
pub use record::TrainingSample;
pub use split::{k_fold, train_test_split, Fold, Split};
