//! External services used by the storefront.
//!
//! # Services
//!
//! - `relay` - Order delivery to the form-relay endpoint

pub mod relay;

pub use relay::{FormRelayClient, OrderRelay, RelayError};
