//! Logistic-regression scoring pipeline loaded from a JSON artifact.
//!
//! The artifact bundles the whole trained pipeline: a standard scaler for
//! numeric columns, a one-hot encoder for categorical columns and the
//! logistic-regression weights. It is exported once by the training job;
//! this module only reads it.
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "intercept": -1.21,
//!   "columns": [
//!     { "name": "patient_age", "kind": "integer",
//!       "encoding": { "type": "standardize", "mean": 65.0, "std": 14.6, "coefficient": 0.55 } },
//!     { "name": "patient_neighborhood", "kind": "categorical",
//!       "encoding": { "type": "one_hot", "categories": { "Mooca": 0.0 }, "handle_unknown": "ignore" } }
//!   ]
//! }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::schema::{ColumnKind, ColumnSpec, FeatureSchema};
use super::types::{FeatureRow, ScoringPipeline};
use super::PipelineError;

/// Artifact layout version this build understands.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Logistic link.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Inverse of [`sigmoid`], defined on the open interval (0, 1).
pub fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

// ═══════════════════════════════════════════════════════════
// Artifact types
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineArtifact {
    pub format_version: u32,
    pub intercept: f64,
    pub columns: Vec<ColumnArtifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnArtifact {
    pub name: String,
    pub kind: ColumnKind,
    pub encoding: Encoding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Encoding {
    /// `(x - mean) / std * coefficient`
    Standardize { mean: f64, std: f64, coefficient: f64 },
    /// One indicator per known category, each with its own coefficient.
    OneHot {
        categories: BTreeMap<String, f64>,
        #[serde(default)]
        handle_unknown: UnknownCategory,
    },
}

/// What the encoder does with a category it never saw during training.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCategory {
    /// All indicators zero: the column contributes nothing.
    #[default]
    Ignore,
    Error,
}

// ═══════════════════════════════════════════════════════════
// Pipeline
// ═══════════════════════════════════════════════════════════

/// A validated, ready-to-serve logistic pipeline.
#[derive(Debug, Clone)]
pub struct LogisticPipeline {
    schema: FeatureSchema,
    intercept: f64,
    encodings: Vec<(String, Encoding)>,
}

impl LogisticPipeline {
    /// Read and validate an artifact from disk.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::ModelNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        let artifact: PipelineArtifact = serde_json::from_str(&raw)?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: PipelineArtifact) -> Result<Self, PipelineError> {
        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(PipelineError::InvalidArtifact(format!(
                "unsupported format_version {} (expected {ARTIFACT_FORMAT_VERSION})",
                artifact.format_version
            )));
        }
        if artifact.columns.is_empty() {
            return Err(PipelineError::InvalidArtifact("artifact declares no columns".into()));
        }
        if !artifact.intercept.is_finite() {
            return Err(PipelineError::InvalidArtifact("intercept is not finite".into()));
        }

        let mut seen = HashSet::new();
        for column in &artifact.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(PipelineError::InvalidArtifact(format!(
                    "duplicate column '{}'",
                    column.name
                )));
            }
            validate_encoding(column)?;
        }

        let schema = FeatureSchema::new(
            artifact
                .columns
                .iter()
                .map(|c| ColumnSpec {
                    name: c.name.clone(),
                    kind: c.kind,
                })
                .collect(),
        );

        Ok(Self {
            schema,
            intercept: artifact.intercept,
            encodings: artifact
                .columns
                .into_iter()
                .map(|c| (c.name, c.encoding))
                .collect(),
        })
    }

    /// Linear predictor (log-odds) for a row.
    fn decision_function(&self, row: &FeatureRow) -> Result<f64, PipelineError> {
        let mut z = self.intercept;

        for (name, encoding) in &self.encodings {
            let cell = row.get(name).ok_or_else(|| PipelineError::MissingFeature(name.clone()))?;

            z += match encoding {
                Encoding::Standardize { mean, std, coefficient } => {
                    let value = cell.as_f64().ok_or_else(|| {
                        PipelineError::Inference(format!(
                            "could not convert {} in '{name}' to a number",
                            cell.kind_name()
                        ))
                    })?;
                    (value - mean) / std * coefficient
                }
                Encoding::OneHot {
                    categories,
                    handle_unknown,
                } => {
                    let value = cell.as_text().ok_or_else(|| {
                        PipelineError::Inference(format!(
                            "expected a category string in '{name}', got {}",
                            cell.kind_name()
                        ))
                    })?;
                    match (categories.get(value), handle_unknown) {
                        (Some(weight), _) => *weight,
                        (None, UnknownCategory::Ignore) => 0.0,
                        (None, UnknownCategory::Error) => {
                            return Err(PipelineError::UnknownCategory {
                                column: name.clone(),
                                value: value.to_string(),
                            })
                        }
                    }
                }
            };
        }

        Ok(z)
    }
}

fn validate_encoding(column: &ColumnArtifact) -> Result<(), PipelineError> {
    let invalid = |reason: &str| {
        Err(PipelineError::InvalidArtifact(format!(
            "column '{}': {reason}",
            column.name
        )))
    };

    match (&column.encoding, column.kind) {
        (Encoding::OneHot { .. }, ColumnKind::Categorical) => {}
        (Encoding::Standardize { .. }, ColumnKind::Categorical) => {
            return invalid("categorical columns must use one_hot encoding")
        }
        (Encoding::OneHot { .. }, _) => return invalid("one_hot encoding requires a categorical column"),
        (Encoding::Standardize { .. }, _) => {}
    }

    match &column.encoding {
        Encoding::Standardize { mean, std, coefficient } => {
            if !mean.is_finite() || !coefficient.is_finite() {
                return invalid("mean and coefficient must be finite");
            }
            if !std.is_finite() || *std <= 0.0 {
                return invalid("std must be a positive number");
            }
        }
        Encoding::OneHot { categories, .. } => {
            if categories.is_empty() {
                return invalid("one_hot encoding needs at least one category");
            }
            if categories.values().any(|w| !w.is_finite()) {
                return invalid("category coefficients must be finite");
            }
        }
    }

    Ok(())
}

impl ScoringPipeline for LogisticPipeline {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict_proba(&self, row: &FeatureRow) -> Result<f64, PipelineError> {
        Ok(sigmoid(self.decision_function(row)?))
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::Cell;
    use serde_json::json;

    fn two_column_artifact() -> serde_json::Value {
        json!({
            "format_version": 1,
            "intercept": 0.0,
            "columns": [
                {
                    "name": "patient_age",
                    "kind": "integer",
                    "encoding": { "type": "standardize", "mean": 60.0, "std": 10.0, "coefficient": 1.0 }
                },
                {
                    "name": "patient_neighborhood",
                    "kind": "categorical",
                    "encoding": {
                        "type": "one_hot",
                        "categories": { "Grajaú": 0.5, "Moema": -0.5 }
                    }
                }
            ]
        })
    }

    fn pipeline_from(value: serde_json::Value) -> Result<LogisticPipeline, PipelineError> {
        LogisticPipeline::from_artifact(serde_json::from_value(value).unwrap())
    }

    fn row(age: f64, neighborhood: &str) -> FeatureRow {
        let mut row = FeatureRow::new();
        row.push("patient_age", Cell::Number(age));
        row.push("patient_neighborhood", Cell::Text(neighborhood.into()));
        row
    }

    #[test]
    fn sigmoid_and_logit_are_inverse() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        for p in [0.01, 0.23, 0.5, 0.9] {
            assert!((sigmoid(logit(p)) - p).abs() < 1e-12);
        }
    }

    #[test]
    fn schema_follows_artifact_column_order() {
        let pipeline = pipeline_from(two_column_artifact()).unwrap();
        let names: Vec<&str> = pipeline
            .schema()
            .columns()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["patient_age", "patient_neighborhood"]);
    }

    #[test]
    fn neutral_row_scores_one_half() {
        let pipeline = pipeline_from(two_column_artifact()).unwrap();
        // mean age, unknown (ignored) neighborhood
        let p = pipeline.predict_proba(&row(60.0, "Mooca")).unwrap();
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn applies_scaler_and_encoder_weights() {
        let pipeline = pipeline_from(two_column_artifact()).unwrap();
        // (70 - 60) / 10 * 1.0 + 0.5
        let p = pipeline.predict_proba(&row(70.0, "Grajaú")).unwrap();
        assert!((p - sigmoid(1.5)).abs() < 1e-12);

        let p = pipeline.predict_proba(&row(60.0, "Moema")).unwrap();
        assert!((p - sigmoid(-0.5)).abs() < 1e-12);
    }

    #[test]
    fn unknown_category_can_be_an_error() {
        let mut artifact = two_column_artifact();
        artifact["columns"][1]["encoding"]["handle_unknown"] = json!("error");
        let pipeline = pipeline_from(artifact).unwrap();

        let err = pipeline.predict_proba(&row(60.0, "Atlantis")).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownCategory { ref value, .. } if value == "Atlantis"));
    }

    #[test]
    fn missing_feature_is_reported() {
        let pipeline = pipeline_from(two_column_artifact()).unwrap();
        let mut partial = FeatureRow::new();
        partial.push("patient_age", Cell::Number(60.0));

        let err = pipeline.predict_proba(&partial).unwrap_err();
        assert!(matches!(err, PipelineError::MissingFeature(ref c) if c == "patient_neighborhood"));
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut artifact = two_column_artifact();
        artifact["format_version"] = json!(2);
        assert!(matches!(
            pipeline_from(artifact),
            Err(PipelineError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn rejects_zero_std() {
        let mut artifact = two_column_artifact();
        artifact["columns"][0]["encoding"]["std"] = json!(0.0);
        assert!(matches!(
            pipeline_from(artifact),
            Err(PipelineError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn rejects_mismatched_encoding() {
        let mut artifact = two_column_artifact();
        artifact["columns"][0]["kind"] = json!("categorical");
        assert!(matches!(
            pipeline_from(artifact),
            Err(PipelineError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn rejects_duplicate_columns() {
        let mut artifact = two_column_artifact();
        artifact["columns"][1]["name"] = json!("patient_age");
        artifact["columns"][1]["kind"] = json!("categorical");
        let err = pipeline_from(artifact).unwrap_err();
        assert!(err.to_string().contains("duplicate column 'patient_age'"));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(
            LogisticPipeline::load(&path),
            Err(PipelineError::ModelNotFound(p)) if p == path
        ));
    }

    #[test]
    fn load_reports_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            LogisticPipeline::load(&path),
            Err(PipelineError::Decode(_))
        ));
    }

    #[test]
    fn load_reads_artifact_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, two_column_artifact().to_string()).unwrap();

        let pipeline = LogisticPipeline::load(&path).unwrap();
        assert_eq!(pipeline.schema().len(), 2);
    }
}
