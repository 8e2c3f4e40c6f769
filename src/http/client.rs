//! HTTP client with built-in retry logic and basic authentication.

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::StatusError;
use crate::config::Config;
use crate::retry::{RetryPolicy, with_retry};

/// HTTP client bound to one service address and one set of credentials.
///
/// Every request goes through the retry wrapper: transport failures and non-2xx
/// responses are retried identically, and the last attempt's error propagates.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: Config,
    policy: RetryPolicy,
}

impl HttpClient {
    pub fn new(config: Config, policy: RetryPolicy) -> Self {
        Self {
            client: Client::new(),
            config,
            policy,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.basic_auth(&self.config.username, Some(&self.config.password))
    }

    /// Performs a GET request and deserializes the JSON response.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, operation: &str, path: &str) -> Result<T> {
        self.get_json_with_query(operation, path, &[]).await
    }

    /// Performs a GET request with query parameters and deserializes the JSON
    /// response.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url(path);
        debug!("{}: GET {}", operation, url);

        with_retry(&self.policy, operation, || async {
            let request = self.authed(self.client.get(&url)).query(query);
            let response = request.send().await.context("Failed to send request")?;
            let response = check_status(response).await?;

            response
                .json::<T>()
                .await
                .context("Failed to parse JSON response")
        })
        .await
    }

    /// Performs a POST request with a JSON body and discards any response
    /// body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post<B: Serialize>(&self, operation: &str, path: &str, body: &B) -> Result<()> {
        let url = self.url(path);
        debug!("{}: POST {}", operation, url);

        with_retry(&self.policy, operation, || async {
            let request = self.authed(self.client.post(&url)).json(body);
            let response = request.send().await.context("Failed to send request")?;
            check_status(response).await?;
            Ok(())
        })
        .await
    }

    /// Performs a POST request without a body and discards any response body.
    #[tracing::instrument(skip(self))]
    pub async fn post_empty(&self, operation: &str, path: &str) -> Result<()> {
        let url = self.url(path);
        debug!("{}: POST {}", operation, url);

        with_retry(&self.policy, operation, || async {
            let request = self.authed(self.client.post(&url));
            let response = request.send().await.context("Failed to send request")?;
            check_status(response).await?;
            Ok(())
        })
        .await
    }

    /// Performs a POST request with a JSON body and deserializes the JSON
    /// response.
    #[tracing::instrument(skip(self, body))]
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        debug!("{}: POST {}", operation, url);

        with_retry(&self.policy, operation, || async {
            let request = self.authed(self.client.post(&url)).json(body);
            let response = request.send().await.context("Failed to send request")?;
            let response = check_status(response).await?;

            response
                .json::<T>()
                .await
                .context("Failed to parse JSON response")
        })
        .await
    }

    /// Performs a PATCH request with a JSON body and discards any response
    /// body.
    #[tracing::instrument(skip(self, body))]
    pub async fn patch<B: Serialize>(&self, operation: &str, path: &str, body: &B) -> Result<()> {
        let url = self.url(path);
        debug!("{}: PATCH {}", operation, url);

        with_retry(&self.policy, operation, || async {
            let request = self.authed(self.client.patch(&url)).json(body);
            let response = request.send().await.context("Failed to send request")?;
            check_status(response).await?;
            Ok(())
        })
        .await
    }

    /// Performs a best-effort DELETE request. Transport failures are retried
    /// and propagated; a non-2xx response is logged and ignored.
    #[tracing::instrument(skip(self))]
    pub async fn delete_best_effort(&self, operation: &str, path: &str) -> Result<()> {
        let url = self.url(path);
        debug!("{}: DELETE {}", operation, url);

        with_retry(&self.policy, operation, || async {
            let request = self.authed(self.client.delete(&url));
            let response = request.send().await.context("Failed to send request")?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                warn!("{}: ignoring HTTP {} response: {}", operation, status, body);
            }
            Ok(())
        })
        .await
    }
}

/// Turns a non-2xx response into a [`StatusError`] carrying the response body.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(StatusError { status, body }.into())
    }
}
