pub mod assessment;
pub mod enums;
pub mod patient;

pub use assessment::RiskAssessment;
pub use enums::{IncomeTier, InvalidEnum, RiskBand, SpecialtyTier};
pub use patient::{
    PatientRecord, FEATURE_COLUMNS, HIGH_INCOME_NEIGHBORHOODS, HIGH_RISK_SPECIALTIES,
    LOW_INCOME_NEIGHBORHOODS, MAX_CONSECUTIVE_MISSED, MAX_PATIENT_AGE,
    MIDDLE_INCOME_NEIGHBORHOODS, MIN_PATIENT_AGE, STANDARD_SPECIALTIES,
};
