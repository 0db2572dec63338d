//! Core types for GreenBasket.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod product;

pub use id::*;
pub use money::Money;
pub use product::{Color, Condition, ParseFacetError, ProductSummary};
