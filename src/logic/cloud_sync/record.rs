use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{HEART_RATE_RANGE, SPO2_RANGE, TIMESTAMP_OFFSET_SECS};

/// Placeholder vitals attached to every reading. Not sensor-derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalSigns {
    pub heart_rate: i32,
    pub spo2: i32,
}

impl VitalSigns {
    /// Independent uniform draws from the inclusive ranges
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            heart_rate: rng.gen_range(HEART_RATE_RANGE.0..=HEART_RATE_RANGE.1),
            spo2: rng.gen_range(SPO2_RANGE.0..=SPO2_RANGE.1),
        }
    }
}

/// Row inserted into the remote table
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReadingRecord {
    pub absorbance: f64,
    pub glucose: i64,
    /// RFC 3339 at +05:30
    pub created_at: String,
    #[serde(rename = "hr")]
    pub heart_rate: i32,
    pub spo2: i32,
}

impl ReadingRecord {
    /// Glucose is rounded half-to-even to a whole mg/dL
    pub fn new(absorbance: f64, glucose: f64, vitals: VitalSigns, now: DateTime<Utc>) -> Self {
        Self {
            absorbance,
            glucose: glucose.round_ties_even() as i64,
            created_at: to_ist(now).to_rfc3339_opts(SecondsFormat::Micros, false),
            heart_rate: vitals.heart_rate,
            spo2: vitals.spo2,
        }
    }
}

/// Convert to the fixed +05:30 offset, independent of the host timezone
pub fn to_ist(now: DateTime<Utc>) -> DateTime<FixedOffset> {
    match FixedOffset::east_opt(TIMESTAMP_OFFSET_SECS) {
        Some(offset) => now.with_timezone(&offset),
        None => now.fixed_offset(),
    }
}
