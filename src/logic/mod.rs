//! Logic Module - Training pipeline & inference engine
//!
//! - `dataset/` - CSV loading, train/test split, k-fold
//! - `model/` - scaler + random forest pipeline, artifact persistence, metrics
//! - `training/` - grid search and the end-to-end training run
//! - `serial/` - serial transport and frame parsing
//! - `cloud_sync/` - reading records and the remote table client
//! - `inference_loop` - read -> predict -> publish -> echo

pub mod config;
pub mod dataset;
pub mod model;
pub mod training;
pub mod serial;
pub mod cloud_sync;
pub mod inference_loop;
