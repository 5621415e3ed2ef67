//! Probability → risk score → risk band.
//!
//! Bands are closed on their upper edge: a score of exactly 300, 600 or 800
//! falls in the lower band.

use crate::models::{RiskAssessment, RiskBand};
use crate::pipeline::{FeatureRow, PipelineError, ScoringPipeline};

pub const MAX_RISK_SCORE: u16 = 1000;

const LOW_BAND_MAX: u16 = 300;
const MEDIUM_BAND_MAX: u16 = 600;
const HIGH_BAND_MAX: u16 = 800;

/// `round(p * 1000)` with ties to even. Inputs outside [0, 1] are clamped.
pub fn risk_score(probability: f64) -> u16 {
    let p = if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    };
    (p * f64::from(MAX_RISK_SCORE)).round_ties_even() as u16
}

pub fn risk_band(score: u16) -> RiskBand {
    match score {
        0..=LOW_BAND_MAX => RiskBand::Low,
        s if s <= MEDIUM_BAND_MAX => RiskBand::Medium,
        s if s <= HIGH_BAND_MAX => RiskBand::High,
        _ => RiskBand::Critical,
    }
}

pub fn assessment_for(probability: f64) -> RiskAssessment {
    let score = risk_score(probability);
    RiskAssessment {
        no_show_probability: probability,
        risk_score: score,
        risk_band: risk_band(score),
    }
}

/// Score one row end to end: schema check, inference, banding.
///
/// A probability the pipeline returns outside [0, 1] (or NaN) is treated
/// as an inference failure rather than silently clamped.
pub fn assess(
    pipeline: &dyn ScoringPipeline,
    row: &FeatureRow,
) -> Result<RiskAssessment, PipelineError> {
    pipeline.schema().validate(row)?;

    let probability = pipeline.predict_proba(row)?;
    if !(0.0..=1.0).contains(&probability) {
        return Err(PipelineError::InvalidProbability(probability));
    }

    Ok(assessment_for(probability))
}
