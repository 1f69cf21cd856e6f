//! Tidepool storefront library.
//!
//! The storefront is three page controllers sharing one persisted bag:
//!
//! - [`catalog`] - filter and sort the product catalog, add cards to the bag
//! - [`bag`] - change quantities, remove lines, show the order summary
//! - [`checkout`] - summarize the bag and relay the order
//!
//! Controllers reach the bag only through a [`store::BagStore`]. The HTTP
//! front end in [`routes`] uses the visitor's session; the terminal front end
//! uses a JSON file.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bag;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

#[cfg(test)]
mod test_support;

use axum::{Router, extract::Request};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the storefront application with its middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());
    let rate_limit = state.config().rate_limit;

    Router::new()
        .merge(routes::routes(rate_limit))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
