use crate::domain::model::ModelLocation;
use crate::utils::error::Result;

/// Supplies the raw bytes of a serialized model.
pub trait ModelSource: Send + Sync {
    fn location(&self) -> ModelLocation;
    fn fetch(&self) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// A loaded two-class classifier.
pub trait ProbabilityModel: Send + Sync {
    fn name(&self) -> &str;

    /// Number of input columns the model was trained on.
    fn n_features(&self) -> usize;

    /// Schema id recorded at export time, if the artifact carries one.
    fn feature_schema(&self) -> Option<&str>;

    /// Returns `[p_class0, p_class1]` for one row.
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2]>;
}

pub trait ConfigProvider: Send + Sync {
    fn model_location(&self) -> &ModelLocation;
    fn schema_id(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
}
