use crate::collections::OrderedStringMap;
use crate::core::relay::FailureRelay;
use crate::domain::ports::{FailableService, Fetcher};
use crate::utils::error::{Result, SvcError};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// JSON-over-HTTP service wrapper.
///
/// Every failed call is returned to the caller and also reported to the
/// client's failure observers under the caller's operation name.
#[derive(Debug)]
pub struct ApiClient {
    base_url: Url,
    headers: OrderedStringMap,
    timeout: Option<Duration>,
    client: Client,
    relay: FailureRelay,
}

impl ApiClient {
    pub fn new(name: impl Into<String>, base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            headers: OrderedStringMap::new(),
            timeout: None,
            client: Client::new(),
            relay: FailureRelay::new(name),
        })
    }

    pub fn with_headers(mut self, headers: OrderedStringMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Appends `path` to the base URL and `params` as the query, in order.
    pub fn build_url(&self, path: &str, params: &OrderedStringMap) -> Result<Url> {
        let mut url = if path.is_empty() {
            self.base_url.clone()
        } else {
            let base = self.base_url.as_str().trim_end_matches('/');
            Url::parse(&format!("{}/{}", base, path.trim_start_matches('/')))?
        };

        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }

        Ok(url)
    }

    /// Awaits `call`, reporting its error under `operation` before returning it.
    pub async fn guard<T, F>(&self, operation: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let result = call.await;
        self.relay
            .observe(operation, result)
            .map_err(|source| SvcError::OperationFailed {
                operation: operation.to_string(),
                source,
            })
    }

    async fn get_json(&self, path: &str, params: &OrderedStringMap) -> Result<serde_json::Value> {
        let url = self.build_url(path, params)?;
        tracing::debug!(service = %self.relay.sender(), "Making API request to: {}", url);

        let mut request = self.client.get(url.clone());

        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(SvcError::StatusError {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl FailableService for ApiClient {
    fn failure_relay(&self) -> &FailureRelay {
        &self.relay
    }
}

#[async_trait::async_trait]
impl Fetcher for ApiClient {
    async fn fetch_json(
        &self,
        operation: &str,
        path: &str,
        params: &OrderedStringMap,
    ) -> Result<serde_json::Value> {
        self.guard(operation, self.get_json(path, params)).await
    }
}
