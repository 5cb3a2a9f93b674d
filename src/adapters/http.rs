use crate::domain::model::ModelLocation;
use crate::domain::ports::ModelSource;
use crate::utils::error::{Result, RiskError};
use reqwest::{Client, StatusCode};
use std::time::Duration;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpModelSource {
    url: String,
    client: Client,
}

impl HttpModelSource {
    pub fn new(url: &str) -> Result<Self> {
        Self::with_timeout(url, None)
    }

    pub fn with_timeout(url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            url: url.to_string(),
            client: builder.build()?,
        })
    }
}

impl ModelSource for HttpModelSource {
    fn location(&self) -> ModelLocation {
        ModelLocation::Url(self.url.clone())
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        tracing::debug!("Downloading model from: {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        tracing::debug!("Model download status: {}", response.status());

        // 只接受 200，其他狀態碼一律視為載入失敗
        if response.status() != StatusCode::OK {
            return Err(RiskError::ModelStatusError {
                url: self.url.clone(),
                status: response.status().as_u16(),
            });
        }

        let data = response.bytes().await?;
        tracing::debug!("Downloaded {} bytes", data.len());
        Ok(data.to_vec())
    }
}
