use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::InsightRecord,
    error::ErrorBody,
    protocol::{
        BrandSummary, CompetitorsResponse, ANALYSIS_PATH, BRANDS_PATH, COMPETITORS_PATH,
        WEBSITE_URL_PARAM,
    },
};
use tracing::debug;
use url::Url;

use crate::{config::Settings, error::OperationError};

/// Remote analysis service as seen by the orchestrator.
#[async_trait]
pub trait InsightsApi: Send + Sync {
    async fn fetch_insights(&self, website_url: &str) -> Result<InsightRecord, OperationError>;
    async fn fetch_competitors(
        &self,
        website_url: &str,
    ) -> Result<CompetitorsResponse, OperationError>;
    async fn list_brands(&self) -> Result<Vec<BrandSummary>, OperationError>;
}

pub struct HttpInsightsClient {
    http: Client,
    base_url: Url,
}

impl HttpInsightsClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self { http, base_url })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.api_base_url.clone(), settings.request_timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, OperationError> {
        self.base_url
            .join(path)
            .map_err(|err| OperationError::Transport(format!("invalid endpoint '{path}': {err}")))
    }

    async fn post_for_store<T: DeserializeOwned>(
        &self,
        path: &str,
        website_url: &str,
    ) -> Result<T, OperationError> {
        let endpoint = self.endpoint(path)?;
        debug!(endpoint = %endpoint, website_url, "posting analysis request");
        let response = self
            .http
            .post(endpoint)
            .query(&[(WEBSITE_URL_PARAM, website_url)])
            .send()
            .await
            .map_err(OperationError::transport)?;
        decode_response(response).await
    }
}

#[async_trait]
impl InsightsApi for HttpInsightsClient {
    async fn fetch_insights(&self, website_url: &str) -> Result<InsightRecord, OperationError> {
        self.post_for_store(ANALYSIS_PATH, website_url).await
    }

    async fn fetch_competitors(
        &self,
        website_url: &str,
    ) -> Result<CompetitorsResponse, OperationError> {
        self.post_for_store(COMPETITORS_PATH, website_url).await
    }

    async fn list_brands(&self) -> Result<Vec<BrandSummary>, OperationError> {
        let endpoint = self.endpoint(BRANDS_PATH)?;
        let response = self
            .http
            .get(endpoint)
            .send()
            .await
            .map_err(OperationError::transport)?;
        decode_response(response).await
    }
}

/// Maps a response to its JSON body, preferring the server's `detail` over a
/// generic status message on failure.
async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, OperationError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|err| OperationError::Transport(format!("invalid response payload: {err}")));
    }

    let body = response.bytes().await.unwrap_or_default();
    let detail = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .and_then(|body| body.message());
    debug!(status = status.as_u16(), has_detail = detail.is_some(), "analysis service returned error");

    match detail {
        Some(detail) => Err(OperationError::Server {
            status: status.as_u16(),
            detail,
        }),
        None => Err(OperationError::Transport(format!(
            "request failed with status code {}",
            status.as_u16()
        ))),
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
