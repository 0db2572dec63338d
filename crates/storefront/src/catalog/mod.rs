//! Faceted catalog search.
//!
//! A [`FilterSpec`] selects exactly one of four query strategies, which is
//! dispatched to a [`ProductRepository`]. The four-way branch is deliberate
//! and load-bearing for behavior parity with the catalog backend: there is
//! no general predicate composition, and combinations outside the four are
//! unreachable by construction.
//!
//! Two trigger paths bypass the filter spec entirely: category-scoped
//! listing and free-text search. A [`SearchSession`] holds the current
//! result list, the active sort order, and a request generation counter so
//! that a late-arriving response from a superseded search cannot overwrite
//! newer results.

mod api;
mod cache;
pub mod repository;

use tracing::{debug, instrument};

use greenbasket_core::{CategoryId, Color, Condition, Money, ProductSummary};

pub use api::CatalogClient;
pub use repository::{ProductRepository, RepositoryError};

/// Sparse set of optional filter facets, constructed fresh per search.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub price_min: Money,
    pub price_max: Money,
    pub condition: Condition,
    pub color: Color,
}

impl FilterSpec {
    /// A spec with only the price range active.
    #[must_use]
    pub const fn price_range(min: Money, max: Money) -> Self {
        Self {
            price_min: min,
            price_max: max,
            condition: Condition::All,
            color: Color::All,
        }
    }

    /// Select the single query strategy for this spec.
    ///
    /// Strict priority: combined beats single-facet beats price-only. The
    /// price range always applies.
    #[must_use]
    pub const fn strategy(&self) -> QueryStrategy {
        match (self.condition.is_any(), self.color.is_any()) {
            (false, false) => QueryStrategy::ConditionAndColor,
            (false, true) => QueryStrategy::ConditionWithPrice,
            (true, false) => QueryStrategy::ColorWithPrice,
            (true, true) => QueryStrategy::PriceOnly,
        }
    }
}

/// The four mutually exclusive faceted query strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStrategy {
    /// Price range + condition + color.
    ConditionAndColor,
    /// Price range + condition.
    ConditionWithPrice,
    /// Price range + color.
    ColorWithPrice,
    /// Price range only.
    PriceOnly,
}

/// Result list ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// The repository's default order.
    #[default]
    Recommended,
    /// Ascending price.
    PriceLowToHigh,
    /// Descending price.
    PriceHighToLow,
}

impl SortOrder {
    /// Parse a sort order from its storefront parameter value.
    ///
    /// Unrecognized values fall back to `Recommended`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "lowest" => Self::PriceLowToHigh,
            "highest" => Self::PriceHighToLow,
            _ => Self::Recommended,
        }
    }

    /// The storefront parameter value for this order.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::PriceLowToHigh => "lowest",
            Self::PriceHighToLow => "highest",
        }
    }
}

/// Sort a product list in place.
///
/// Stable for equal prices, so insertion (fetch) order is the tie-break and
/// repeated sorts in the same direction are idempotent. `Recommended` leaves
/// the list as fetched; it does not undo a previous price sort.
pub fn sort_products(products: &mut [ProductSummary], order: SortOrder) {
    match order {
        SortOrder::Recommended => {}
        SortOrder::PriceLowToHigh => {
            products.sort_by(|a, b| a.price.total_cmp(b.price));
        }
        SortOrder::PriceHighToLow => {
            products.sort_by(|a, b| b.price.total_cmp(a.price));
        }
    }
}

/// Token identifying one issued search request.
///
/// Only the most recently issued ticket is accepted on completion; stale
/// completions are dropped so a slow older response cannot overwrite the
/// results of a newer search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

/// Per-view search state: the displayed result list and its sort order.
///
/// Operations run to completion in response to a single external trigger;
/// the session is a passed-in value, not a global. Failed repository calls
/// propagate without touching the displayed list.
#[derive(Debug, Default)]
pub struct SearchSession {
    products: Vec<ProductSummary>,
    sort: SortOrder,
    generation: u64,
}

impl SearchSession {
    /// Create a session with an empty result list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently displayed products.
    #[must_use]
    pub fn products(&self) -> &[ProductSummary] {
        &self.products
    }

    /// The active sort order.
    #[must_use]
    pub const fn sort(&self) -> SortOrder {
        self.sort
    }

    /// Issue a new search, superseding any in-flight one.
    pub fn begin(&mut self) -> SearchTicket {
        self.generation += 1;
        SearchTicket(self.generation)
    }

    /// Complete a search. Returns `false` (leaving state untouched) when the
    /// ticket has been superseded by a later [`begin`](Self::begin).
    ///
    /// Accepting a result resets the sort order to recommended.
    pub fn accept(&mut self, ticket: SearchTicket, products: Vec<ProductSummary>) -> bool {
        if ticket.0 != self.generation {
            debug!(
                ticket = ticket.0,
                current = self.generation,
                "dropping stale search response"
            );
            return false;
        }
        self.products = products;
        self.sort = SortOrder::Recommended;
        true
    }

    /// Re-sort the displayed products in place.
    pub fn sort_by(&mut self, order: SortOrder) {
        self.sort = order;
        sort_products(&mut self.products, order);
    }

    /// Run a faceted query, dispatching on the spec's strategy.
    ///
    /// # Errors
    ///
    /// Propagates repository failures; the displayed list is unchanged.
    #[instrument(skip(self, repo))]
    pub async fn run_filters<R: ProductRepository>(
        &mut self,
        repo: &R,
        spec: &FilterSpec,
    ) -> Result<(), RepositoryError> {
        let ticket = self.begin();
        let products = match spec.strategy() {
            QueryStrategy::ConditionAndColor => {
                repo.find_by_condition_and_color(
                    spec.condition,
                    spec.color,
                    spec.price_min,
                    spec.price_max,
                )
                .await?
            }
            QueryStrategy::ConditionWithPrice => {
                repo.find_by_condition(spec.condition, spec.price_min, spec.price_max)
                    .await?
            }
            QueryStrategy::ColorWithPrice => {
                repo.find_by_color(spec.color, spec.price_min, spec.price_max)
                    .await?
            }
            QueryStrategy::PriceOnly => {
                repo.find_by_price_range(spec.price_min, spec.price_max)
                    .await?
            }
        };
        self.accept(ticket, products);
        Ok(())
    }

    /// List all products in a category.
    ///
    /// # Errors
    ///
    /// Propagates repository failures; the displayed list is unchanged.
    #[instrument(skip(self, repo))]
    pub async fn run_category<R: ProductRepository>(
        &mut self,
        repo: &R,
        category: &CategoryId,
    ) -> Result<(), RepositoryError> {
        let ticket = self.begin();
        let products = repo.find_by_category(category).await?;
        self.accept(ticket, products);
        Ok(())
    }

    /// Run a free-text search.
    ///
    /// A query that trims to empty triggers no repository call and leaves
    /// the displayed list unchanged.
    ///
    /// # Errors
    ///
    /// Propagates repository failures; the displayed list is unchanged.
    #[instrument(skip(self, repo))]
    pub async fn run_text<R: ProductRepository>(
        &mut self,
        repo: &R,
        query: &str,
    ) -> Result<(), RepositoryError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }

        let ticket = self.begin();
        let products = repo.find_by_text(query).await?;
        self.accept(ticket, products);
        Ok(())
    }
}
