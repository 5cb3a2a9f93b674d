use crate::domain::model::ModelLocation;
use crate::domain::ports::ModelSource;
use crate::utils::error::{Result, RiskError};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileModelSource {
    path: PathBuf,
}

impl FileModelSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ModelSource for FileModelSource {
    fn location(&self) -> ModelLocation {
        ModelLocation::Path(self.path.clone())
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        tracing::debug!("Reading model artifact from {}", self.path.display());
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|source| RiskError::ModelReadError {
                path: self.path.display().to_string(),
                source,
            })?;
        tracing::debug!("Read {} bytes", data.len());
        Ok(data)
    }
}
