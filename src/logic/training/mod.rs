//! Training Module - Grid-searched random forest fitting
//!
//! Flow: load dataset -> seeded 75/25 split -> 5-fold grid search on the
//! training split (lowest mean MAE wins) -> refit on the full training split
//! -> evaluate on the test split -> persist the artifact.

pub mod grid;
pub mod cv;
pub mod trainer;

pub use cv::{cross_validate, CvScore};
pub use grid::{GridSearch, ParamGrid, SearchResult};
pub use trainer::{train, train_on_samples, TrainingError, TrainingReport};
