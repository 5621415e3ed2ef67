//! CSV export of a generated dataset.

use std::path::Path;

use serde::Serialize;

use super::generator::{Dataset, DatasetRow};
use super::SynthError;

/// Flat CSV row. Booleans are written as 0/1 like the training tooling expects.
#[derive(Serialize)]
struct CsvRow<'a> {
    patient_age: u8,
    patient_neighborhood: &'a str,
    digital_affinity_score: u8,
    has_caregiver: u8,
    appointment_specialty: &'a str,
    consecutive_missed_appointments: u8,
    historical_absenteeism_rate: f64,
    days_since_last_appointment: u32,
    days_since_first_appointment: u32,
    no_show_target: u8,
}

impl<'a> From<&'a DatasetRow> for CsvRow<'a> {
    fn from(row: &'a DatasetRow) -> Self {
        let r = &row.record;
        Self {
            patient_age: r.patient_age,
            patient_neighborhood: &r.patient_neighborhood,
            digital_affinity_score: r.digital_affinity_score,
            has_caregiver: u8::from(r.has_caregiver),
            appointment_specialty: &r.appointment_specialty,
            consecutive_missed_appointments: r.consecutive_missed_appointments,
            historical_absenteeism_rate: r.historical_absenteeism_rate,
            days_since_last_appointment: r.days_since_last_appointment,
            days_since_first_appointment: r.days_since_first_appointment,
            no_show_target: u8::from(row.no_show),
        }
    }
}

/// Write `dataset` to `path` with a header row, replacing any existing file.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<(), SynthError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in &dataset.rows {
        writer.serialize(CsvRow::from(row))?;
    }
    writer.flush()?;
    tracing::info!(path = %path.display(), rows = dataset.len(), "Dataset written");
    Ok(())
}
