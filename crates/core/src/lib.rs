//! Tidepool Core - Shared types library.
//!
//! This crate provides the domain types used across all Tidepool components:
//! - `storefront` - Catalog, bag and checkout controllers plus the HTTP front end
//! - `cli` - Terminal front end over a file-backed bag
//!
//! # Architecture
//!
//! The core crate contains only types and pure computations - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Money, bag items, order summaries and catalog entries

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
