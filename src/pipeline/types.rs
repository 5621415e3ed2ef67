use serde_json::{Map, Value};

use super::schema::FeatureSchema;
use super::PipelineError;
use crate::models::PatientRecord;

/// A single value in a feature row, as decoded from the request.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// JSON arrays and objects. Never valid as a model input.
    Nested,
}

impl Cell {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Cell::Null => "null",
            Cell::Bool(_) => "boolean",
            Cell::Number(_) => "number",
            Cell::Text(_) => "string",
            Cell::Nested => "nested value",
        }
    }

    /// Numeric view of the cell. Booleans count as 0/1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&Value> for Cell {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Null,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(Cell::Null, Cell::Number),
            Value::String(s) => Cell::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => Cell::Nested,
        }
    }
}

/// Single-row feature table handed to a scoring pipeline.
///
/// Column order is the order the keys appeared in the source object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRow {
    columns: Vec<(String, Cell)>,
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from a decoded JSON object. Never fails: shape problems
    /// surface later when the row is checked against a pipeline schema.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        Self {
            columns: object
                .iter()
                .map(|(name, value)| (name.clone(), Cell::from(value)))
                .collect(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, cell: Cell) {
        self.columns.push((name.into(), cell));
    }

    pub fn get(&self, name: &str) -> Option<&Cell> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, cell)| cell)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.columns.iter().map(|(name, cell)| (name.as_str(), cell))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl From<&PatientRecord> for FeatureRow {
    fn from(record: &PatientRecord) -> Self {
        let mut row = FeatureRow::new();
        row.push("patient_age", Cell::Number(f64::from(record.patient_age)));
        row.push(
            "patient_neighborhood",
            Cell::Text(record.patient_neighborhood.clone()),
        );
        row.push(
            "digital_affinity_score",
            Cell::Number(f64::from(record.digital_affinity_score)),
        );
        row.push("has_caregiver", Cell::Bool(record.has_caregiver));
        row.push(
            "appointment_specialty",
            Cell::Text(record.appointment_specialty.clone()),
        );
        row.push(
            "consecutive_missed_appointments",
            Cell::Number(f64::from(record.consecutive_missed_appointments)),
        );
        row.push(
            "historical_absenteeism_rate",
            Cell::Number(record.historical_absenteeism_rate),
        );
        row.push(
            "days_since_last_appointment",
            Cell::Number(f64::from(record.days_since_last_appointment)),
        );
        row.push(
            "days_since_first_appointment",
            Cell::Number(f64::from(record.days_since_first_appointment)),
        );
        row
    }
}

/// A trained scoring pipeline: preprocessing plus a binary classifier.
///
/// Implementations are loaded once at startup and shared read-only across
/// concurrent requests, hence `Send + Sync` and `&self`.
pub trait ScoringPipeline: Send + Sync {
    /// Columns, types and order the pipeline was trained on.
    fn schema(&self) -> &FeatureSchema;

    /// Probability of the positive class (no-show) for one row.
    fn predict_proba(&self, row: &FeatureRow) -> Result<f64, PipelineError>;
}
