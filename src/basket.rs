//! Basket

use std::fmt::{Display, Formatter, Result as FmtResult};

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::items::{ItemId, Quantity};

/// Errors related to basket mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BasketError {
    /// The item is not present in the basket.
    #[error("item {0} not found in basket")]
    ItemNotFound(ItemId),

    /// An owner token was empty or blank.
    #[error("owner token must not be empty")]
    EmptyOwnerToken,
}

/// Opaque token scoping a basket to a single client.
///
/// Usually the value of a client cookie. It is never authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerToken(String);

impl OwnerToken {
    /// Creates a new owner token.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::EmptyOwnerToken`] if the token is empty or only whitespace.
    pub fn new(token: impl Into<String>) -> Result<Self, BasketError> {
        let token = token.into();

        if token.trim().is_empty() {
            return Err(BasketError::EmptyOwnerToken);
        }

        Ok(Self(token))
    }

    /// Returns the token as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OwnerToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// A client's basket: item identifiers mapped to the quantity held.
///
/// A basket never holds an entry with a quantity of zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Basket {
    owner: OwnerToken,
    items: FxHashMap<ItemId, Quantity>,
}

impl Basket {
    /// Create a new, empty basket for the given owner.
    pub fn new(owner: OwnerToken) -> Self {
        Basket {
            owner,
            items: FxHashMap::default(),
        }
    }

    /// Create a basket for the given owner holding the given items.
    ///
    /// Repeated identifiers accumulate and zero quantities are dropped.
    pub fn with_items(
        owner: OwnerToken,
        items: impl IntoIterator<Item = (ItemId, Quantity)>,
    ) -> Self {
        let mut basket = Basket::new(owner);

        for (item, quantity) in items {
            basket.add_item(item, quantity);
        }

        basket
    }

    /// The token of the client owning this basket.
    pub fn owner(&self) -> &OwnerToken {
        &self.owner
    }

    /// Add `quantity` units of an item, accumulating onto any existing quantity.
    ///
    /// Quantities saturate at [`Quantity::MAX`]. Adding zero units is a no-op.
    pub fn add_item(&mut self, item: ItemId, quantity: Quantity) -> &mut Self {
        if quantity == 0 {
            return self;
        }

        self.items
            .entry(item)
            .and_modify(|existing| *existing = existing.saturating_add(quantity))
            .or_insert(quantity);

        self
    }

    /// Add a single unit of an item.
    pub fn add_one(&mut self, item: ItemId) -> &mut Self {
        self.add_item(item, 1)
    }

    /// Remove `quantity` units of an item.
    ///
    /// The entry is removed entirely once its quantity would drop to zero or below.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::ItemNotFound`] if the item is not in the basket, in
    /// which case the basket is left unchanged.
    pub fn remove_item(&mut self, item: &ItemId, quantity: Quantity) -> Result<(), BasketError> {
        let existing = self
            .quantity(item)
            .ok_or_else(|| BasketError::ItemNotFound(item.clone()))?;

        match existing.saturating_sub(quantity) {
            0 => {
                self.items.remove(item);
            }
            remaining => {
                self.items.insert(item.clone(), remaining);
            }
        }

        Ok(())
    }

    /// Remove a single unit of an item.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::ItemNotFound`] if the item is not in the basket.
    pub fn remove_one(&mut self, item: &ItemId) -> Result<(), BasketError> {
        self.remove_item(item, 1)
    }

    /// The quantity held of an item, if present.
    pub fn quantity(&self, item: &ItemId) -> Option<Quantity> {
        self.items.get(item).copied()
    }

    /// The items in the basket.
    pub fn items(&self) -> &FxHashMap<ItemId, Quantity> {
        &self.items
    }

    /// Iterate over the items and their quantities.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, Quantity)> {
        self.items.iter().map(|(item, quantity)| (item, *quantity))
    }

    /// An owned copy of the item mapping.
    pub fn snapshot(&self) -> FxHashMap<ItemId, Quantity> {
        self.items.clone()
    }

    /// Get the number of distinct items in the basket.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the basket is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all items.
    pub fn unit_count(&self) -> u64 {
        self.items.values().map(|quantity| u64::from(*quantity)).sum()
    }

    /// Empty the basket.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
