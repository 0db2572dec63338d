//! GreenBasket Storefront - cart reconciliation and faceted catalog search.
//!
//! # Architecture
//!
//! - [`cart`] keeps an in-memory cart consistent with its cookie-persisted
//!   representation under add/remove operations
//! - [`catalog`] selects one of four faceted query strategies, delegates to a
//!   product repository, and manages result sorting
//! - The catalog backend is reached over its REST API via [`catalog::CatalogClient`]
//!
//! All state is explicit: the cart and the search session are passed-in
//! values, never ambient globals, so both components are independently
//! testable against in-memory collaborators.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod state;
