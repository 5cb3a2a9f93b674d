use crate::domain::model::{FeatureVector, PredictionResult};
use crate::domain::ports::ProbabilityModel;
use crate::utils::error::{Result, RiskError};
use std::sync::Arc;

/// Runs one inference call against an injected model handle.
#[derive(Clone)]
pub struct Predictor {
    model: Arc<dyn ProbabilityModel>,
}

impl Predictor {
    pub fn new(model: Arc<dyn ProbabilityModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult> {
        if let Some(trained_on) = self.model.feature_schema() {
            if trained_on != features.schema_id {
                return Err(RiskError::inference(format!(
                    "model '{}' was trained on schema {} but the inputs use {}",
                    self.model.name(),
                    trained_on,
                    features.schema_id
                )));
            }
        }

        let values = features.values();
        let proba = self.model.predict_proba(&values)?;
        let result = PredictionResult::from_proba(&proba)?;

        tracing::debug!(
            model = %self.model.name(),
            no_recurrence = result.no_recurrence,
            recurrence = result.recurrence,
            "Inference complete"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FieldValue;

    /// Fixed-output model used in place of a real artifact.
    struct FixtureModel {
        schema: Option<&'static str>,
        output: [f64; 2],
    }

    impl ProbabilityModel for FixtureModel {
        fn name(&self) -> &str {
            "fixture"
        }

        fn n_features(&self) -> usize {
            6
        }

        fn feature_schema(&self) -> Option<&str> {
            self.schema
        }

        fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2]> {
            if features.len() != 6 {
                return Err(RiskError::inference("wrong arity"));
            }
            Ok(self.output)
        }
    }

    fn vector(schema_id: &str, n: usize) -> FeatureVector {
        FeatureVector {
            schema_id: schema_id.to_string(),
            fields: (0..n)
                .map(|i| FieldValue {
                    name: format!("f{}", i),
                    label: "0".to_string(),
                    value: 0.0,
                })
                .collect(),
        }
    }

    #[test]
    fn test_predict_returns_pair() {
        let predictor = Predictor::new(Arc::new(FixtureModel {
            schema: Some("staging-v2"),
            output: [0.8, 0.2],
        }));

        let result = predictor.predict(&vector("staging-v2", 6)).unwrap();
        assert_eq!(result.no_recurrence, 0.8);
        assert_eq!(result.recurrence, 0.2);
        assert_eq!(predictor.model_name(), "fixture");
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let predictor = Predictor::new(Arc::new(FixtureModel {
            schema: Some("smoking-v1"),
            output: [0.8, 0.2],
        }));

        let err = predictor.predict(&vector("staging-v2", 6)).unwrap_err();
        assert!(err.to_string().contains("smoking-v1"));
    }

    #[test]
    fn test_undeclared_schema_is_accepted() {
        let predictor = Predictor::new(Arc::new(FixtureModel {
            schema: None,
            output: [0.5, 0.5],
        }));

        assert!(predictor.predict(&vector("smoking-v1", 6)).is_ok());
    }

    #[test]
    fn test_model_rejection_propagates() {
        let predictor = Predictor::new(Arc::new(FixtureModel {
            schema: None,
            output: [0.5, 0.5],
        }));

        let err = predictor.predict(&vector("staging-v2", 4)).unwrap_err();
        assert!(matches!(err, RiskError::InferenceError { .. }));
    }

    #[test]
    fn test_invalid_model_output_rejected() {
        let predictor = Predictor::new(Arc::new(FixtureModel {
            schema: None,
            output: [0.9, 0.9],
        }));

        assert!(predictor.predict(&vector("staging-v2", 6)).is_err());
    }
}
