//! GreenBasket Core - Shared types library.
//!
//! This crate provides common types used across all GreenBasket components:
//! - `storefront` - Cart reconciliation and faceted catalog search
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, and catalog facets

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
