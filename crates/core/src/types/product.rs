//! Catalog product types and filter facets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::money::Money;

/// Error parsing a facet value from a string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown facet value: {0}")]
pub struct ParseFacetError(pub String);

/// Product condition facet.
///
/// `All` means the facet is inactive and places no constraint on results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    #[default]
    All,
    New,
    Used,
}

impl Condition {
    /// Whether this facet is inactive (matches everything).
    #[must_use]
    pub const fn is_any(self) -> bool {
        matches!(self, Self::All)
    }

    /// The wire value used by the catalog backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::New => "new",
            Self::Used => "used",
        }
    }
}

impl FromStr for Condition {
    type Err = ParseFacetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "new" => Ok(Self::New),
            "used" => Ok(Self::Used),
            other => Err(ParseFacetError(other.to_string())),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product color facet.
///
/// `All` means the facet is inactive and places no constraint on results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    All,
    Blue,
    White,
    Green,
    Black,
    Red,
}

impl Color {
    /// Whether this facet is inactive (matches everything).
    #[must_use]
    pub const fn is_any(self) -> bool {
        matches!(self, Self::All)
    }

    /// The wire value used by the catalog backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Blue => "blue",
            Self::White => "white",
            Self::Green => "green",
            Self::Black => "black",
            Self::Red => "red",
        }
    }
}

impl FromStr for Color {
    type Err = ParseFacetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "blue" => Ok(Self::Blue),
            "white" => Ok(Self::White),
            "green" => Ok(Self::Green),
            "black" => Ok(Self::Black),
            "red" => Ok(Self::Red),
            other => Err(ParseFacetError(other.to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only product projection returned by the catalog repository.
///
/// The storefront never mutates these; they are display data plus the unit
/// price needed for cart reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub image_url: String,
    pub price: Money,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_round_trip() {
        for cond in [Condition::All, Condition::New, Condition::Used] {
            assert_eq!(cond.as_str().parse::<Condition>(), Ok(cond));
        }
    }

    #[test]
    fn test_color_round_trip() {
        for color in [
            Color::All,
            Color::Blue,
            Color::White,
            Color::Green,
            Color::Black,
            Color::Red,
        ] {
            assert_eq!(color.as_str().parse::<Color>(), Ok(color));
        }
    }

    #[test]
    fn test_unknown_facet_value() {
        let err = "plaid".parse::<Color>().expect_err("should not parse");
        assert_eq!(err.to_string(), "unknown facet value: plaid");
    }

    #[test]
    fn test_is_any() {
        assert!(Condition::All.is_any());
        assert!(!Condition::New.is_any());
        assert!(Color::All.is_any());
        assert!(!Color::Red.is_any());
    }
}
