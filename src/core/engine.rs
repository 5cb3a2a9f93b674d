use crate::adapters::AnyModelSource;
use crate::core::collector::{FeatureCollector, FieldInputs};
use crate::core::predictor::Predictor;
use crate::domain::model::{FeatureVector, PredictionResult};
use crate::domain::ports::{ConfigProvider, ModelSource};
use crate::model::ModelCache;
use crate::utils::error::Result;
use std::time::Duration;

/// Output of one submission.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub model_name: String,
    pub features: FeatureVector,
    pub result: PredictionResult,
}

/// Load, collect, predict.
///
/// The model is fetched on first use and reused afterwards. If it cannot be
/// loaded nothing downstream runs.
pub struct PredictionEngine<S: ModelSource> {
    cache: ModelCache<S>,
    collector: FeatureCollector,
}

impl<S: ModelSource> PredictionEngine<S> {
    pub fn new(source: S, collector: FeatureCollector) -> Self {
        Self {
            cache: ModelCache::new(source),
            collector,
        }
    }

    pub fn collector(&self) -> &FeatureCollector {
        &self.collector
    }

    /// Loads (or reuses) the model and hands back a predictor bound to it.
    pub async fn predictor(&self) -> Result<Predictor> {
        let model = self.cache.get().await?;
        Ok(Predictor::new(model))
    }

    pub async fn predict(&self, inputs: &FieldInputs) -> Result<Prediction> {
        let predictor = self.predictor().await?;
        let features = self.collector.collect(inputs)?;
        let result = predictor.predict(&features)?;

        tracing::info!(
            "Prediction complete: recurrence {:.2}%",
            result.recurrence_percent()
        );

        Ok(Prediction {
            model_name: predictor.model_name().to_string(),
            features,
            result,
        })
    }
}

impl PredictionEngine<AnyModelSource> {
    /// Engine wired from configuration: model location, schema and timeout.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let collector = FeatureCollector::for_schema_id(config.schema_id())?;
        let timeout = config.timeout_seconds().map(Duration::from_secs);
        let source = AnyModelSource::from_location(config.model_location(), timeout)?;
        Ok(Self::new(source, collector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::HttpModelSource;
    use crate::config::RiskSettings;
    use crate::domain::model::ModelLocation;
    use crate::domain::schema::STAGING_V2;
    use crate::utils::error::RiskError;
    use httpmock::prelude::*;

    fn model_body() -> String {
        serde_json::json!({
            "name": "thyroid_model_1",
            "feature_schema": "staging-v2",
            "n_features": 6,
            "estimator": {
                "type": "logistic_regression",
                "coefficients": [0.02, 0.6, 0.3, 0.5, 0.4, 1.2],
                "intercept": -3.5
            }
        })
        .to_string()
    }

    fn baseline() -> FieldInputs {
        [
            ("age", "45"),
            ("stage", "I"),
            ("t_stage", "T1a"),
            ("n_stage", "N0"),
            ("adenopathy", "No"),
            ("response", "Excellent"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[tokio::test]
    async fn test_predict_end_to_end() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/model.json");
            then.status(200).body(model_body());
        });

        let source = HttpModelSource::new(&server.url("/model.json")).unwrap();
        let engine = PredictionEngine::new(source, FeatureCollector::new(&STAGING_V2));

        let first = engine.predict(&baseline()).await.unwrap();
        let second = engine.predict(&baseline()).await.unwrap();

        // 模型只下載一次
        api_mock.assert_hits(1);
        assert_eq!(first.features.values(), vec![45.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(first.result, second.result);
        assert!((first.result.no_recurrence + first.result.recurrence - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_load_failure_short_circuits() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/model.json");
            then.status(404);
        });

        let source = HttpModelSource::new(&server.url("/model.json")).unwrap();
        let engine = PredictionEngine::new(source, FeatureCollector::new(&STAGING_V2));

        let err = engine.predict(&baseline()).await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, RiskError::ModelStatusError { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_from_config_uses_location_and_schema() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/configured.json");
            then.status(200).body(model_body());
        });

        let mut settings = RiskSettings::new(ModelLocation::Url(server.url("/configured.json")));
        settings.timeout_seconds = Some(5);
        let engine = PredictionEngine::from_config(&settings).unwrap();

        assert_eq!(engine.collector().schema().id, "staging-v2");
        engine.predict(&baseline()).await.unwrap();
        api_mock.assert();
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_model() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/model.json");
            then.status(200).body(model_body());
        });

        let source = HttpModelSource::new(&server.url("/model.json")).unwrap();
        let engine = PredictionEngine::new(source, FeatureCollector::new(&STAGING_V2));

        let mut inputs = baseline();
        inputs.insert("age".to_string(), "121".to_string());

        let err = engine.predict(&inputs).await.unwrap_err();
        assert!(matches!(err, RiskError::FieldValidationError { .. }));
    }
}
