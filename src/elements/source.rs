use async_trait::async_trait;
use std::time::Duration;

use crate::elements::error::FetchError;

/// Upstream provider of raw element-set text, addressed by group name.
#[async_trait]
pub trait ElementSource: Send + Sync {
    async fn fetch(&self, group: &str) -> Result<String, FetchError>;
}

pub struct CelestrakSource {
    client: reqwest::Client,
    base_url: String,
}

impl CelestrakSource {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl ElementSource for CelestrakSource {
    async fn fetch(&self, group: &str) -> Result<String, FetchError> {
        log::debug!("Fetching element sets for group {} from {}", group, self.base_url);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("GROUP", group), ("FORMAT", "tle")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
