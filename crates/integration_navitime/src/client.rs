//! Navitime route client via RapidAPI
//!
//! Sends a [`RouteQuery`] to the `route_transit` endpoint and hands the body
//! to [`crate::parser`]. Every call is a single exchange; the client never
//! retries.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use secrecy::ExposeSecret;
use tracing::{debug, instrument, warn};

use crate::config::NavitimeConfig;
use crate::error::RouteError;
use crate::models::RouteResponse;
use crate::parser;
use crate::query::RouteQuery;

/// Header carrying the RapidAPI key
pub const API_KEY_HEADER: &str = "X-RapidAPI-Key";
/// Header carrying the RapidAPI host
pub const API_HOST_HEADER: &str = "X-RapidAPI-Host";

/// Trait for route search clients
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RouteClient: Send + Sync {
    /// Execute a route query with the client's configured timeout
    async fn execute(&self, query: &RouteQuery) -> Result<RouteResponse, RouteError>;

    /// Execute a route query with an explicit timeout
    async fn execute_with_timeout(
        &self,
        query: &RouteQuery,
        timeout: Duration,
    ) -> Result<RouteResponse, RouteError>;

    /// Check if the route service is reachable
    async fn is_healthy(&self) -> bool;
}

/// Lifecycle of a single request/response exchange
///
/// `Idle` then `Sent`, ending in `Succeeded` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    /// Request built, nothing sent yet
    Idle,
    /// Request sent, waiting for the response
    Sent,
    /// Response received and parsed
    Succeeded,
    /// Exchange ended with an error
    Failed,
}

impl ExchangeState {
    /// State reached after an exchange produced `result`
    #[must_use]
    pub const fn settle<T, E>(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => Self::Succeeded,
            Err(_) => Self::Failed,
        }
    }
}

impl fmt::Display for ExchangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Sent => "sent",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Navitime Route TotalNavi client
///
/// Holds no per-request state, so a single instance can be shared between tasks.
#[derive(Debug)]
pub struct NavitimeRouteClient {
    client: Client,
    config: NavitimeConfig,
}

impl NavitimeRouteClient {
    /// Create a new Navitime route client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &NavitimeConfig) -> Result<Self, RouteError> {
        config.validate().map_err(RouteError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| RouteError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn exchange(&self, url: &str, timeout: Duration) -> Result<RouteResponse, RouteError> {
        let request = self
            .client
            .get(url)
            .header(API_KEY_HEADER, self.config.api_key.expose_secret())
            .header(API_HOST_HEADER, &self.config.api_host)
            .header("Accept", "application/json")
            .timeout(timeout);

        debug!(state = %ExchangeState::Sent, "Request sent");

        let response = request
            .send()
            .await
            .map_err(|e| classify_transport_error(&e, timeout))?;

        let status = response.status();
        debug!(status = %status, "Received route response");

        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(&e, timeout))?;

        if !status.is_success() {
            return Err(RouteError::Http {
                status: status.as_u16(),
                raw_body: body,
            });
        }

        parser::parse(&body)
    }
}

fn classify_transport_error(error: &reqwest::Error, timeout: Duration) -> RouteError {
    if error.is_timeout() {
        RouteError::Timeout {
            timeout_secs: timeout.as_secs(),
        }
    } else {
        RouteError::Network(error.to_string())
    }
}

#[async_trait]
impl RouteClient for NavitimeRouteClient {
    async fn execute(&self, query: &RouteQuery) -> Result<RouteResponse, RouteError> {
        self.execute_with_timeout(query, Duration::from_secs(self.config.timeout_secs))
            .await
    }

    #[instrument(
        skip(self, query),
        fields(start = %query.origin(), goal = %query.destination(), timeout_secs = timeout.as_secs())
    )]
    async fn execute_with_timeout(
        &self,
        query: &RouteQuery,
        timeout: Duration,
    ) -> Result<RouteResponse, RouteError> {
        let url = self.config.request_url(query);
        debug!(state = %ExchangeState::Idle, url = %url, "Searching routes");

        let result = self.exchange(&url, timeout).await;
        let state = ExchangeState::settle(&result);

        match &result {
            Ok(response) if response.is_empty() => {
                warn!(%state, "No itineraries found");
            },
            Ok(response) => {
                debug!(%state, count = response.len(), "Itineraries found");
            },
            Err(e) => {
                debug!(%state, error = %e, "Route search failed");
            },
        }

        result
    }

    async fn is_healthy(&self) -> bool {
        self.client.get(&self.config.base_url).send().await.is_ok()
    }
}
