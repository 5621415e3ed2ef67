use serde::Serialize;

use super::enums::RiskBand;

/// Outcome of scoring one patient record. Computed per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub no_show_probability: f64,
    pub risk_score: u16,
    pub risk_band: RiskBand,
}

impl RiskAssessment {
    /// One-line human-readable summary returned alongside the score.
    pub fn interpretation(&self) -> String {
        format!("Patient classified as {} risk", self.risk_band)
    }
}
