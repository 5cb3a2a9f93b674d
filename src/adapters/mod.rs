// Adapters layer: concrete model sources (http, local file).

pub mod file;
pub mod http;

pub use file::FileModelSource;
pub use http::HttpModelSource;

use crate::domain::model::ModelLocation;
use crate::domain::ports::ModelSource;
use crate::utils::error::Result;
use std::time::Duration;

/// Source picked at runtime from configuration.
#[derive(Debug, Clone)]
pub enum AnyModelSource {
    Http(HttpModelSource),
    File(FileModelSource),
}

impl AnyModelSource {
    pub fn from_location(location: &ModelLocation, timeout: Option<Duration>) -> Result<Self> {
        Ok(match location {
            ModelLocation::Url(url) => AnyModelSource::Http(HttpModelSource::with_timeout(url, timeout)?),
            ModelLocation::Path(path) => AnyModelSource::File(FileModelSource::new(path)),
        })
    }
}

impl ModelSource for AnyModelSource {
    fn location(&self) -> ModelLocation {
        match self {
            AnyModelSource::Http(source) => source.location(),
            AnyModelSource::File(source) => source.location(),
        }
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        match self {
            AnyModelSource::Http(source) => source.fetch().await,
            AnyModelSource::File(source) => source.fetch().await,
        }
    }
}
