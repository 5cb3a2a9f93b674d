//! Model artifact loader

use crate::domain::ports::{ModelSource, ProbabilityModel};
use crate::model::artifact::ModelArtifact;
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::{error, info};

/// Fetches and deserializes model artifacts
#[derive(Debug, Default, Clone)]
pub struct ModelLoader;

impl ModelLoader {
    pub fn new() -> Self {
        Self
    }

    /// Fetch the artifact from `source` and build the model.
    ///
    /// Any failure (transport, status, read, decode) is returned as a load
    /// error and no model is produced.
    pub async fn load<S: ModelSource>(&self, source: &S) -> Result<Arc<dyn ProbabilityModel>> {
        let location = source.location();
        info!(source = %location, "Loading model");

        let bytes = match source.fetch().await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(source = %location, error = %e, "Error downloading model");
                return Err(e);
            }
        };

        let model = self.load_bytes(&bytes).inspect_err(|e| {
            error!(source = %location, error = %e, "Error loading model");
        })?;

        info!(
            model = %model.name(),
            n_features = model.n_features(),
            schema = model.feature_schema().unwrap_or("undeclared"),
            bytes = bytes.len(),
            "Model loaded successfully"
        );
        Ok(model)
    }

    pub fn load_bytes(&self, bytes: &[u8]) -> Result<Arc<dyn ProbabilityModel>> {
        let artifact = ModelArtifact::from_slice(bytes)?;
        Ok(Arc::new(artifact))
    }
}
