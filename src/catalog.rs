//! Catalog

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::items::ItemId;

/// Errors raised while resolving item prices.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog has no item with this identifier.
    #[error("unknown item {0}")]
    UnknownItem(ItemId),

    /// The catalog could not be reached.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

#[automock]
#[async_trait]
/// Resolves current item prices.
pub trait Catalog: Send + Sync {
    /// The currency all prices are expressed in.
    fn currency(&self) -> &'static Currency;

    /// The current unit price of an item.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownItem`] if the catalog has no such item.
    async fn price(&self, item: &ItemId) -> Result<Money<'static, Currency>, CatalogError>;
}

/// A catalog with a fixed price list.
#[derive(Debug, Clone)]
pub struct FixedCatalog {
    currency: &'static Currency,
    prices: FxHashMap<ItemId, Money<'static, Currency>>,
}

impl FixedCatalog {
    /// Creates an empty catalog pricing in `currency`.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            currency,
            prices: FxHashMap::default(),
        }
    }

    /// Adds an item priced in minor units, returning the catalog.
    #[must_use]
    pub fn with_price(mut self, item: impl Into<ItemId>, minor: i64) -> Self {
        self.insert(item, minor);
        self
    }

    /// Sets the price of an item in minor units.
    pub fn insert(&mut self, item: impl Into<ItemId>, minor: i64) {
        self.prices
            .insert(item.into(), Money::from_minor(minor, self.currency));
    }
}

#[async_trait]
impl Catalog for FixedCatalog {
    fn currency(&self) -> &'static Currency {
        self.currency
    }

    async fn price(&self, item: &ItemId) -> Result<Money<'static, Currency>, CatalogError> {
        self.prices
            .get(item)
            .copied()
            .ok_or_else(|| CatalogError::UnknownItem(item.clone()))
    }
}
