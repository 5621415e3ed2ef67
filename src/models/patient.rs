use serde::{Deserialize, Serialize};

use super::enums::{IncomeTier, SpecialtyTier};

/// Feature columns in the order the scoring pipeline was trained on.
pub const FEATURE_COLUMNS: [&str; 9] = [
    "patient_age",
    "patient_neighborhood",
    "digital_affinity_score",
    "has_caregiver",
    "appointment_specialty",
    "consecutive_missed_appointments",
    "historical_absenteeism_rate",
    "days_since_last_appointment",
    "days_since_first_appointment",
];

pub const MIN_PATIENT_AGE: u8 = 18;
pub const MAX_PATIENT_AGE: u8 = 100;
pub const MAX_CONSECUTIVE_MISSED: u8 = 3;

pub const LOW_INCOME_NEIGHBORHOODS: [&str; 6] = [
    "Grajaú",
    "Marsilac",
    "Brasilândia",
    "Parelheiros",
    "Lajeado",
    "Cidade Tiradentes",
];

pub const MIDDLE_INCOME_NEIGHBORHOODS: [&str; 6] = [
    "Tatuapé",
    "Mooca",
    "Santana",
    "Vila Mariana",
    "Saúde",
    "Butantã",
];

pub const HIGH_INCOME_NEIGHBORHOODS: [&str; 6] = [
    "Jardins",
    "Itaim Bibi",
    "Pinheiros",
    "Moema",
    "Higienópolis",
    "Morumbi",
];

pub const HIGH_RISK_SPECIALTIES: [&str; 3] =
    ["Speech Therapy", "Occupational Therapy", "Psychology"];

pub const STANDARD_SPECIALTIES: [&str; 8] = [
    "Physiotherapy",
    "Neurology",
    "Social Work",
    "Physical Conditioning",
    "Assistive Technologies",
    "Dentistry",
    "Nursing",
    "Nutrition",
];

impl IncomeTier {
    pub const ALL: [IncomeTier; 3] = [IncomeTier::Low, IncomeTier::Middle, IncomeTier::High];

    pub fn neighborhoods(&self) -> &'static [&'static str] {
        match self {
            IncomeTier::Low => &LOW_INCOME_NEIGHBORHOODS,
            IncomeTier::Middle => &MIDDLE_INCOME_NEIGHBORHOODS,
            IncomeTier::High => &HIGH_INCOME_NEIGHBORHOODS,
        }
    }

    /// Tier of a known neighborhood, `None` for names outside the vocabulary.
    pub fn of_neighborhood(name: &str) -> Option<IncomeTier> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.neighborhoods().contains(&name))
    }
}

impl SpecialtyTier {
    pub fn specialties(&self) -> &'static [&'static str] {
        match self {
            SpecialtyTier::HighRisk => &HIGH_RISK_SPECIALTIES,
            SpecialtyTier::Standard => &STANDARD_SPECIALTIES,
        }
    }

    pub fn of_specialty(name: &str) -> Option<SpecialtyTier> {
        [SpecialtyTier::HighRisk, SpecialtyTier::Standard]
            .into_iter()
            .find(|tier| tier.specialties().contains(&name))
    }
}

/// One patient/appointment observation with the nine model features.
///
/// Field declaration order matches [`FEATURE_COLUMNS`]; serializing a
/// record therefore yields an object the scoring pipeline accepts as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub patient_age: u8,
    pub patient_neighborhood: String,
    pub digital_affinity_score: u8,
    pub has_caregiver: bool,
    pub appointment_specialty: String,
    pub consecutive_missed_appointments: u8,
    pub historical_absenteeism_rate: f64,
    pub days_since_last_appointment: u32,
    pub days_since_first_appointment: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PatientRecord {
        PatientRecord {
            patient_age: 72,
            patient_neighborhood: "Mooca".into(),
            digital_affinity_score: 40,
            has_caregiver: false,
            appointment_specialty: "Psychology".into(),
            consecutive_missed_appointments: 1,
            historical_absenteeism_rate: 0.18,
            days_since_last_appointment: 15,
            days_since_first_appointment: 64,
        }
    }

    #[test]
    fn serialized_keys_follow_feature_order() {
        let value = serde_json::to_value(sample()).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, FEATURE_COLUMNS);
    }

    #[test]
    fn neighborhood_maps_to_income_tier() {
        assert_eq!(IncomeTier::of_neighborhood("Grajaú"), Some(IncomeTier::Low));
        assert_eq!(IncomeTier::of_neighborhood("Mooca"), Some(IncomeTier::Middle));
        assert_eq!(IncomeTier::of_neighborhood("Morumbi"), Some(IncomeTier::High));
        assert_eq!(IncomeTier::of_neighborhood("Atlantis"), None);
    }

    #[test]
    fn specialty_maps_to_tier() {
        assert_eq!(
            SpecialtyTier::of_specialty("Speech Therapy"),
            Some(SpecialtyTier::HighRisk)
        );
        assert_eq!(
            SpecialtyTier::of_specialty("Nursing"),
            Some(SpecialtyTier::Standard)
        );
        assert_eq!(SpecialtyTier::of_specialty("Astrology"), None);
    }

    #[test]
    fn vocabularies_do_not_overlap() {
        for name in LOW_INCOME_NEIGHBORHOODS {
            assert!(!MIDDLE_INCOME_NEIGHBORHOODS.contains(&name));
            assert!(!HIGH_INCOME_NEIGHBORHOODS.contains(&name));
        }
        for name in HIGH_RISK_SPECIALTIES {
            assert!(!STANDARD_SPECIALTIES.contains(&name));
        }
    }
}
