//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - A single attempt per request; failures are reported, never retried
//! - Typed JSON responses with registry error context

use crate::error::RegistryError;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("upgrade-interactive/", env!("CARGO_PKG_VERSION"));

/// HTTP client wrapper adding registry error context
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                RegistryError::network_error(
                    "",
                    "HTTP client",
                    format!("failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self { client })
    }

    #[cfg(test)]
    pub(crate) fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Perform one GET request, returning the successful response
    async fn get_with_context(
        &self,
        url: &str,
        accept: &'static str,
        package: &str,
        registry: &str,
    ) -> Result<reqwest::Response, RegistryError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static(accept))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RegistryError::timeout(package, registry)
                } else {
                    RegistryError::network_error(package, registry, e.to_string())
                }
            })?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => Err(RegistryError::RateLimitExceeded {
                registry: registry.to_string(),
            }),
            StatusCode::NOT_FOUND => Err(RegistryError::package_not_found(package, registry)),
            status if !status.is_success() => {
                debug!(url, %status, "registry request failed");
                Err(RegistryError::network_error(
                    package,
                    registry,
                    format!("HTTP {}", status),
                ))
            }
            _ => Ok(response),
        }
    }

    /// Perform a GET request and parse the JSON body
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        accept: &'static str,
        package: &str,
        registry: &str,
    ) -> Result<T, RegistryError> {
        let response = self.get_with_context(url, accept, package, registry).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| RegistryError::InvalidResponse {
                package: package.to_string(),
                registry: registry.to_string(),
                message: format!("failed to parse JSON: {}", e),
            })
    }
}
