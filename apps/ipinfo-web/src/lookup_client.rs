use anyhow::Result;
use axum::body::Bytes;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::UpstreamConfig;
use crate::error::PipelineError;

const USER_AGENT: &str = concat!("ipinfo-web/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct LookupClient {
    client: Client,
    url: Url,
}

impl LookupClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            url: config.request_url()?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the body exactly as the lookup API sent it.
    pub async fn fetch(&self) -> Result<Bytes, PipelineError> {
        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Lookup API answered {} for {}", status, self.url);
        }

        let body = response.bytes().await?;
        debug!("Fetched {} bytes from {}", body.len(), self.url);
        Ok(body)
    }
}
