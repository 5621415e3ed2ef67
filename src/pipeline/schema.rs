//! Trained column schema and row validation.
//!
//! A pipeline only accepts rows whose columns match the ones it was
//! trained on: same names, same order, compatible types. Validation reports
//! the first offending column by name so callers get a usable diagnostic
//! instead of an opaque inference failure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{Cell, FeatureRow};
use crate::models::FEATURE_COLUMNS;

/// Value type a trained column expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Whole number (a JSON number with no fractional part).
    Integer,
    Real,
    /// JSON boolean, or the numbers 0 and 1.
    Boolean,
    /// Free text matched against the encoder's known categories.
    Categorical,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Real => "real",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Categorical => "categorical",
        }
    }

    pub fn accepts(&self, cell: &Cell) -> bool {
        match (self, cell) {
            (ColumnKind::Integer, Cell::Number(n)) => n.is_finite() && n.fract() == 0.0,
            (ColumnKind::Real, Cell::Number(n)) => n.is_finite(),
            (ColumnKind::Boolean, Cell::Bool(_)) => true,
            (ColumnKind::Boolean, Cell::Number(n)) => *n == 0.0 || *n == 1.0,
            (ColumnKind::Categorical, Cell::Text(_)) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

/// First mismatch found between a row and a schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaViolation {
    #[error("missing column '{column}' (expected {expected} columns, got {found})")]
    MissingColumn {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("unexpected column '{column}' not seen during training")]
    UnexpectedColumn { column: String },

    #[error("column order mismatch at position {position}: expected '{expected}', found '{found}'")]
    ColumnOrder {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("column '{column}' expects {expected}, got {found}")]
    ColumnType {
        column: String,
        expected: ColumnKind,
        found: &'static str,
    },
}

/// Ordered set of columns a pipeline was trained on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<ColumnSpec>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// The nine-column patient schema the CareLink pipeline is trained on.
    pub fn carelink() -> Self {
        let kinds = [
            ColumnKind::Integer,
            ColumnKind::Categorical,
            ColumnKind::Integer,
            ColumnKind::Boolean,
            ColumnKind::Categorical,
            ColumnKind::Integer,
            ColumnKind::Real,
            ColumnKind::Integer,
            ColumnKind::Integer,
        ];
        Self::new(
            FEATURE_COLUMNS
                .iter()
                .zip(kinds)
                .map(|(name, kind)| ColumnSpec {
                    name: (*name).to_string(),
                    kind,
                })
                .collect(),
        )
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check a row against the schema.
    ///
    /// Checks run in a fixed order (missing, unexpected, order, type) so
    /// the reported violation is stable for a given row.
    pub fn validate(&self, row: &FeatureRow) -> Result<(), SchemaViolation> {
        if let Some(missing) = self.columns.iter().find(|c| row.get(&c.name).is_none()) {
            return Err(SchemaViolation::MissingColumn {
                column: missing.name.clone(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }

        if let Some(extra) = row.names().find(|name| self.column(name).is_none()) {
            return Err(SchemaViolation::UnexpectedColumn {
                column: extra.to_string(),
            });
        }

        for (position, (spec, found)) in self.columns.iter().zip(row.names()).enumerate() {
            if spec.name != found {
                return Err(SchemaViolation::ColumnOrder {
                    position: position + 1,
                    expected: spec.name.clone(),
                    found: found.to_string(),
                });
            }
        }

        for (spec, (_, cell)) in self.columns.iter().zip(row.iter()) {
            if !spec.kind.accepts(cell) {
                return Err(SchemaViolation::ColumnType {
                    column: spec.name.clone(),
                    expected: spec.kind,
                    found: cell.kind_name(),
                });
            }
        }

        Ok(())
    }
}
