//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Every value can be overridden through the environment (or a `.env` file).

use std::time::Duration;

/// Default serial port of the sensor board
pub const DEFAULT_SERIAL_PORT: &str = "COM6";

/// Default baud rate
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Serial read timeout, set once when the port is opened
pub const SERIAL_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Default path of the persisted estimator
pub const DEFAULT_MODEL_PATH: &str = "rf_glucose_model.json";

/// Default training dataset
pub const DEFAULT_DATASET_PATH: &str = "data/data.csv";

/// Remote table receiving readings
pub const DEFAULT_TABLE: &str = "glucose_readings";

/// Default HTTP timeout for remote inserts (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Marker token every inbound frame must start with
pub const FRAME_MARKER: &str = "DATA";

/// Field delimiter of inbound frames
pub const FRAME_DELIMITER: char = ',';

/// Pause after an unexpected loop failure
pub const ERROR_PAUSE: Duration = Duration::from_secs(1);

/// Back-off while no serial input is buffered
pub const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Synthetic heart rate range (inclusive)
pub const HEART_RATE_RANGE: (i32, i32) = (72, 92);

/// Synthetic SpO2 range (inclusive)
pub const SPO2_RANGE: (i32, i32) = (91, 98);

/// IST offset applied to every timestamp, in seconds east of UTC
pub const TIMESTAMP_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Seed shared by the train/test split and the forest
pub const RANDOM_SEED: u64 = 42;

/// Held-out fraction
pub const TEST_FRACTION: f64 = 0.25;

/// Cross-validation folds
pub const CV_FOLDS: usize = 5;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Glucosync";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get serial port from environment or use default
pub fn get_serial_port() -> String {
    std::env::var("GLUCOSYNC_SERIAL_PORT")
        .unwrap_or_else(|_| DEFAULT_SERIAL_PORT.to_string())
}

/// Get baud rate from environment or use default
pub fn get_baud_rate() -> u32 {
    std::env::var("GLUCOSYNC_BAUD_RATE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_BAUD_RATE)
}

/// Get model artifact path from environment or use default
pub fn get_model_path() -> String {
    std::env::var("GLUCOSYNC_MODEL_PATH")
        .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}

/// Get dataset path from environment or use default
pub fn get_dataset_path() -> String {
    std::env::var("GLUCOSYNC_DATASET_PATH")
        .unwrap_or_else(|_| DEFAULT_DATASET_PATH.to_string())
}

/// Get remote table name from environment or use default
pub fn get_table() -> String {
    std::env::var("GLUCOSYNC_TABLE")
        .unwrap_or_else(|_| DEFAULT_TABLE.to_string())
}

/// Get HTTP timeout from environment or use default
pub fn get_http_timeout() -> u64 {
    std::env::var("GLUCOSYNC_HTTP_TIMEOUT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
}

/// Supabase project URL. No default: must be supplied by the operator.
pub fn get_supabase_url() -> Option<String> {
    std::env::var("SUPABASE_URL").ok()
}

/// Supabase access key. No default: must be supplied by the operator.
pub fn get_supabase_key() -> Option<String> {
    std::env::var("SUPABASE_KEY").ok()
}
