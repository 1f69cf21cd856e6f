//! Order relay client.
//!
//! Orders are not stored by the storefront. Each one is posted once, as JSON,
//! to a third-party form-relay endpoint that mails it to the shop. Only the
//! response status is interpreted.

use std::future::Future;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use thiserror::Error;
use url::Url;

use crate::checkout::OrderSubmission;
use crate::config::RelayConfig;

/// Errors that can occur when relaying an order.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The request could not be sent or timed out.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The relay answered with a non-success status.
    #[error("Relay rejected order: {status} - {message}")]
    Rejected { status: u16, message: String },
}

impl RelayError {
    /// Whether the request ran past the configured timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}

/// Destination for submitted orders.
pub trait OrderRelay: Send + Sync {
    /// Deliver one order. No retries are made.
    fn submit(
        &self,
        order: &OrderSubmission,
    ) -> impl Future<Output = Result<(), RelayError>> + Send;
}

impl<R: OrderRelay> OrderRelay for &R {
    fn submit(
        &self,
        order: &OrderSubmission,
    ) -> impl Future<Output = Result<(), RelayError>> + Send {
        (**self).submit(order)
    }
}

/// HTTP client for the form-relay endpoint.
#[derive(Debug, Clone)]
pub struct FormRelayClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl FormRelayClient {
    /// Create a new relay client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.url.clone(),
        })
    }

    /// The endpoint orders are posted to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl OrderRelay for FormRelayClient {
    async fn submit(&self, order: &OrderSubmission) -> Result<(), RelayError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(order)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RelayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(status = status.as_u16(), "Order relayed");
        Ok(())
    }
}
