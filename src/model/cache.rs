use crate::domain::model::ModelLocation;
use crate::domain::ports::{ModelSource, ProbabilityModel};
use crate::model::loader::ModelLoader;
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Process-wide model handle, loaded at most once.
///
/// Concurrent callers wait on the same in-flight load. A failed load leaves
/// the cache empty and returns the error; nothing retries on its own.
pub struct ModelCache<S: ModelSource> {
    source: S,
    loader: ModelLoader,
    model: OnceCell<Arc<dyn ProbabilityModel>>,
}

impl<S: ModelSource> ModelCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            loader: ModelLoader::new(),
            model: OnceCell::new(),
        }
    }

    pub async fn get(&self) -> Result<Arc<dyn ProbabilityModel>> {
        self.model
            .get_or_try_init(|| self.loader.load(&self.source))
            .await
            .map(Arc::clone)
    }

    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    pub fn location(&self) -> ModelLocation {
        self.source.location()
    }
}
