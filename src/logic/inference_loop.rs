//! Realtime inference loop
//!
//! serial frame -> absorbance -> prediction -> enriched record -> remote
//! table, then the prediction is echoed back to the board. One frame at a
//! time, in arrival order. All handles live in an explicit
//! `InferenceContext` so the serial transport and the sink can be faked.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::constants::{ERROR_PAUSE, IDLE_POLL_INTERVAL};
use crate::logic::cloud_sync::{PublishError, ReadingRecord, ReadingSink, SupabaseClient, VitalSigns};
use crate::logic::config::InferenceConfig;
use crate::logic::model::{self, GlucoseModel, ModelError, Regressor};
use crate::logic::serial::{decode_line, parse_frame, FrameError, SerialDevice, SerialLink};

/// Failures that abort the current iteration (followed by a pause)
#[derive(Debug, Error)]
pub enum LoopError {
    #[error("failed to poll serial input: {0}")]
    Poll(#[source] io::Error),

    #[error("failed to read serial line: {0}")]
    Read(#[source] io::Error),

    #[error("failed to echo prediction: {0}")]
    Echo(#[source] io::Error),
}

/// Fatal start-up failures
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to load model: {0}")]
    Model(#[from] ModelError),

    #[error("failed to connect to the serial port: {0}")]
    Serial(#[from] serialport::Error),
}

/// A frame that made it through prediction
#[derive(Debug)]
pub struct Processed {
    pub glucose: f64,
    pub record: ReadingRecord,
    /// Set when the remote insert failed; the echo was still sent
    pub publish_error: Option<PublishError>,
}

/// Result of one poll/read/process iteration
#[derive(Debug)]
pub enum StepOutcome {
    /// Nothing buffered
    Idle,
    /// Line without the frame marker
    Discarded,
    /// Malformed frame, sample dropped
    Skipped(FrameError),
    Processed(Processed),
}

/// Counters reported when the loop stops
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopStats {
    pub processed: u64,
    pub discarded: u64,
    pub skipped: u64,
    pub publish_failures: u64,
    pub errors: u64,
}

/// Everything the loop owns for its lifetime
pub struct InferenceContext<L, S, M> {
    pub link: L,
    pub sink: S,
    pub model: M,
    pub rng: StdRng,
    pub clock: fn() -> DateTime<Utc>,
    pub idle_interval: Duration,
    pub error_pause: Duration,
}

impl<L: SerialLink, S: ReadingSink, M: Regressor> InferenceContext<L, S, M> {
    pub fn new(link: L, sink: S, model: M) -> Self {
        Self {
            link,
            sink,
            model,
            rng: StdRng::from_entropy(),
            clock: Utc::now,
            idle_interval: IDLE_POLL_INTERVAL,
            error_pause: ERROR_PAUSE,
        }
    }

    /// One iteration: poll, read, parse, predict, publish, echo
    pub fn step(&mut self) -> Result<StepOutcome, LoopError> {
        if self.link.bytes_available().map_err(LoopError::Poll)? == 0 {
            return Ok(StepOutcome::Idle);
        }

        let raw = self.link.read_line().map_err(LoopError::Read)?;
        let line = decode_line(&raw);
        log::debug!("Received: {}", line);

        let frame = match parse_frame(&line) {
            Ok(frame) => frame,
            Err(e) if e.is_noise() => return Ok(StepOutcome::Discarded),
            Err(e) => {
                log::warn!("Invalid or incomplete data: {}. Skipping...", e);
                return Ok(StepOutcome::Skipped(e));
            }
        };
        log::debug!("Parsed: {:?}", frame.fields);

        let glucose = self.model.predict(frame.absorbance);
        log::info!("abs: {:.4}, glucose: {:.0} mg/dl", frame.absorbance, glucose);

        let vitals = VitalSigns::sample(&mut self.rng);
        let record = ReadingRecord::new(frame.absorbance, glucose, vitals, (self.clock)());

        let publish_error = match self.sink.insert(&record) {
            Ok(()) => {
                log::info!("Data sent to remote table: {:?}", record);
                None
            }
            Err(e) => {
                log::warn!("Remote insert failed: {}. Continuing...", e);
                Some(e)
            }
        };

        self.link
            .write_all(format!("{:.2}\n", glucose).as_bytes())
            .map_err(LoopError::Echo)?;

        Ok(StepOutcome::Processed(Processed {
            glucose,
            record,
            publish_error,
        }))
    }

    /// Run until `shutdown` is set. Iteration failures are logged and
    /// followed by `error_pause`; they never stop the loop.
    pub fn run(&mut self, shutdown: &AtomicBool) -> LoopStats {
        let mut stats = LoopStats::default();
        log::info!("Listening for sensor data...");

        while !shutdown.load(Ordering::SeqCst) {
            match self.step() {
                Ok(StepOutcome::Idle) => thread::sleep(self.idle_interval),
                Ok(StepOutcome::Discarded) => stats.discarded += 1,
                Ok(StepOutcome::Skipped(_)) => stats.skipped += 1,
                Ok(StepOutcome::Processed(p)) => {
                    stats.processed += 1;
                    if p.publish_error.is_some() {
                        stats.publish_failures += 1;
                    }
                }
                Err(e) => {
                    stats.errors += 1;
                    log::error!("An unexpected error occurred: {}", e);
                    thread::sleep(self.error_pause);
                }
            }
        }

        log::info!(
            "Loop stopped: {} processed, {} skipped, {} discarded, {} publish failures, {} errors",
            stats.processed,
            stats.skipped,
            stats.discarded,
            stats.publish_failures,
            stats.errors
        );
        stats
    }
}

/// Production context: Supabase client, then model, then serial port.
/// Any failure here is fatal.
pub fn bootstrap(
    config: &InferenceConfig,
) -> Result<InferenceContext<SerialDevice, SupabaseClient, GlucoseModel>, BootstrapError> {
    let sink = SupabaseClient::new(&config.remote);
    let model = model::load_model(&config.model_path)?;
    let link = SerialDevice::open(&config.serial)?;
    Ok(InferenceContext::new(link, sink, model))
}
