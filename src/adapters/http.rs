use crate::config::toml_config::HttpConfig;
use crate::domain::ports::SheetSource;
use crate::utils::error::{ChecklistError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Talks to the published sheet over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSheetSource {
    client: Client,
}

impl HttpSheetSource {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SheetSource for HttpSheetSource {
    async fn head(&self, url: &str) -> Result<bool> {
        tracing::debug!("Making HEAD request to: {}", url);
        let response = self.client.head(url).send().await?;
        tracing::debug!("HEAD response status: {}", response.status());
        Ok(response.status().is_success())
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        tracing::debug!("Making GET request to: {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("GET response status: {}", status);

        if !status.is_success() {
            return Err(ChecklistError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}
