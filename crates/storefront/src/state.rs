//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tidepool_core::Product;
use tower_sessions::session::Id;

use crate::checkout::SubmitControl;
use crate::config::StorefrontConfig;
use crate::services::{FormRelayClient, RelayError};

/// Checkout pages idle longer than this lose their submit control.
const SUBMIT_CONTROL_IDLE: Duration = Duration::from_secs(30 * 60);

/// Upper bound on tracked checkout pages.
const SUBMIT_CONTROL_CAPACITY: u64 = 10_000;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, the order relay and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<[Product]>,
    relay: FormRelayClient,
    submit_controls: Cache<Id, SubmitControl>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay HTTP client cannot be built.
    pub fn new(
        config: StorefrontConfig,
        catalog: impl Into<Arc<[Product]>>,
    ) -> Result<Self, RelayError> {
        let relay = FormRelayClient::new(&config.relay)?;
        let submit_controls = Cache::builder()
            .max_capacity(SUBMIT_CONTROL_CAPACITY)
            .time_to_idle(SUBMIT_CONTROL_IDLE)
            .build();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: catalog.into(),
                relay,
                submit_controls,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The product catalog, in catalog order.
    #[must_use]
    pub fn catalog(&self) -> Arc<[Product]> {
        Arc::clone(&self.inner.catalog)
    }

    /// Get a reference to the order relay client.
    #[must_use]
    pub fn relay(&self) -> &FormRelayClient {
        &self.inner.relay
    }

    /// Submit control of the checkout page belonging to a session.
    ///
    /// Requests from the same session share one control. A session that has
    /// not been saved yet gets a control of its own.
    pub async fn submit_control(&self, session: Option<Id>) -> SubmitControl {
        match session {
            Some(id) => {
                self.inner
                    .submit_controls
                    .get_with(id, async { SubmitControl::new() })
                    .await
            }
            None => SubmitControl::new(),
        }
    }

    /// Drop a session's submit control once its order has been placed, so
    /// the next checkout starts with an enabled control.
    pub async fn retire_submit_control(&self, session: Option<Id>) {
        if let Some(id) = session {
            self.inner.submit_controls.invalidate(&id).await;
        }
    }
}
