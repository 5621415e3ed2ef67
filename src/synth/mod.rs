//! Synthetic training dataset generator.
//!
//! Fabricates patient/appointment records with a deliberately engineered
//! relationship between features and the no-show label:
//! independent draws → linear risk base → logistic link → intercept
//! calibration → Bernoulli draw.

pub mod generator;
pub mod writer;

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

pub use generator::{calibrate_intercept, generate, Dataset, DatasetRow};
pub use writer::write_csv;

use crate::config::DEFAULT_DATASET_PATH;

pub const DEFAULT_ROWS: usize = 2000;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_TARGET_RATE: f64 = 0.23;

#[derive(Error, Debug)]
pub enum SynthError {
    #[error("Invalid synthesizer configuration: {0}")]
    InvalidConfig(String),

    #[error("Distribution parameters rejected: {0}")]
    Distribution(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Synthesizer settings. Flags fall back to `CARELINK_SYNTH_*` variables.
#[derive(Debug, Clone, Parser)]
#[command(name = "carelink-synth", version, about = "Generate a synthetic no-show training dataset")]
pub struct SynthConfig {
    /// Number of records to generate.
    #[arg(long, env = "CARELINK_SYNTH_ROWS", default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    /// RNG seed; the same seed always yields the same dataset.
    #[arg(long, env = "CARELINK_SYNTH_SEED", default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Desired share of positive (no-show) labels, strictly between 0 and 1.
    #[arg(long, env = "CARELINK_SYNTH_TARGET_RATE", default_value_t = DEFAULT_TARGET_RATE)]
    pub target_rate: f64,

    /// Output CSV path.
    #[arg(long, short, env = "CARELINK_SYNTH_OUTPUT", default_value = DEFAULT_DATASET_PATH)]
    pub output: PathBuf,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            seed: DEFAULT_SEED,
            target_rate: DEFAULT_TARGET_RATE,
            output: PathBuf::from(DEFAULT_DATASET_PATH),
        }
    }
}

impl SynthConfig {
    pub fn validate(&self) -> Result<(), SynthError> {
        if self.rows == 0 {
            return Err(SynthError::InvalidConfig("rows must be at least 1".into()));
        }
        if !(self.target_rate > 0.0 && self.target_rate < 1.0) {
            return Err(SynthError::InvalidConfig(format!(
                "target_rate must be strictly between 0 and 1, got {}",
                self.target_rate
            )));
        }
        Ok(())
    }
}
