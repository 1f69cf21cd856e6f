//! HTTP route handlers for storefront.
//!
//! Every request is one page load: the handler builds the page's controller
//! over the visitor's session bag, performs one action and returns the
//! rendered view as JSON.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                      - Health check
//!
//! # Catalog
//! GET    /catalog                     - Filtered, sorted catalog (?search&category&price&sort)
//! POST   /catalog/{card}/bag          - Add a card to the bag
//!
//! # Bag
//! GET    /bag                         - Bag page
//! GET    /bag/count                   - Bag count indicator
//! POST   /bag/items/{index}/quantity  - Change quantity by {"delta": n}
//! DELETE /bag/items/{index}           - Remove item
//! POST   /bag/checkout                - Proceed to checkout (303 to /checkout)
//!
//! # Checkout
//! GET    /checkout                    - Checkout summary
//! POST   /checkout                    - Place order
//! ```
//!
//! Responses to bag-changing requests carry the new item count in the
//! `x-bag-count` header.

pub mod bag;
pub mod catalog;
pub mod checkout;

use axum::{
    Router,
    response::AppendHeaders,
    routing::{delete, get, post},
};

use crate::middleware::{api_rate_limiter, checkout_rate_limiter};
use crate::state::AppState;

/// Header carrying the bag item count after a bag change.
pub const BAG_COUNT_HEADER: &str = "x-bag-count";

/// Response header with the current bag item count.
fn bag_count_header(count: u64) -> AppendHeaders<[(&'static str, String); 1]> {
    AppendHeaders([(BAG_COUNT_HEADER, count.to_string())])
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/{card}/bag", post(catalog::add_to_bag))
}

/// Create the bag routes router.
pub fn bag_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(bag::show))
        .route("/count", get(bag::count))
        .route("/items/{index}/quantity", post(bag::adjust_quantity))
        .route("/items/{index}", delete(bag::remove))
        .route("/checkout", post(bag::checkout))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new().route("/", get(checkout::show).post(checkout::submit))
}

/// Create all routes for the storefront.
///
/// With `rate_limit` set, order submission gets a strict per-IP limit and
/// the catalog and bag routes a relaxed one.
pub fn routes(rate_limit: bool) -> Router<AppState> {
    let mut browse = Router::new()
        .nest("/catalog", catalog_routes())
        .nest("/bag", bag_routes());
    let mut checkout = checkout_routes();

    if rate_limit {
        browse = browse.layer(api_rate_limiter());
        checkout = checkout.layer(checkout_rate_limiter());
    }

    Router::new()
        .route("/health", get(health))
        .merge(browse)
        .nest("/checkout", checkout)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
