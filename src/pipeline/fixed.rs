use super::schema::FeatureSchema;
use super::types::{FeatureRow, ScoringPipeline};
use super::PipelineError;

/// Pipeline stand-in that always returns the same probability.
///
/// Used by tests and local demos where a trained artifact is not at hand.
/// It still reports the CareLink schema so request validation behaves
/// exactly as it does against a real pipeline.
#[derive(Debug, Clone)]
pub struct FixedPipeline {
    schema: FeatureSchema,
    probability: f64,
}

impl FixedPipeline {
    pub fn new(probability: f64) -> Self {
        Self::with_schema(FeatureSchema::carelink(), probability)
    }

    pub fn with_schema(schema: FeatureSchema, probability: f64) -> Self {
        Self { schema, probability }
    }
}

impl ScoringPipeline for FixedPipeline {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict_proba(&self, _row: &FeatureRow) -> Result<f64, PipelineError> {
        Ok(self.probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_configured_probability() {
        let pipeline = FixedPipeline::new(0.45);
        assert_eq!(pipeline.predict_proba(&FeatureRow::new()).unwrap(), 0.45);
        assert_eq!(pipeline.schema(), &FeatureSchema::carelink());
    }
}
