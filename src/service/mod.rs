//! Basket service.
//!
//! Request-scoped basket operations: every call loads the owner's basket
//! fresh from the store, applies one change and writes it back.

use rusty_money::{Money, iso::Currency};
use tracing::{info, warn};

use crate::{
    basket::{Basket, OwnerToken},
    catalog::Catalog,
    channel::PersistenceChannel,
    items::{ItemId, Quantity},
    orders::{NewOrder, OrderService, PlacedOrder},
    pricing::{TotalError, calculate_total},
    store::{BasketStore, StoreError},
};

pub mod errors;

pub use errors::{BasketServiceError, CheckoutError};

/// Basket operations for a web handler layer.
#[derive(Debug)]
pub struct BasketService<P, C, O> {
    store: BasketStore<P>,
    catalog: C,
    orders: O,
}

impl<P, C, O> BasketService<P, C, O>
where
    P: PersistenceChannel,
    C: Catalog,
    O: OrderService,
{
    /// Creates a service over the given store and collaborators.
    #[must_use]
    pub fn new(store: BasketStore<P>, catalog: C, orders: O) -> Self {
        Self {
            store,
            catalog,
            orders,
        }
    }

    /// The underlying basket store.
    pub fn store(&self) -> &BasketStore<P> {
        &self.store
    }

    /// The catalog prices are resolved from.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// The order service baskets are submitted to.
    pub fn orders(&self) -> &O {
        &self.orders
    }

    /// Retrieve the current basket for an owner.
    #[tracing::instrument(name = "basket.get", skip_all, fields(owner = %owner))]
    pub async fn basket(&self, owner: &OwnerToken) -> Basket {
        self.store.load(owner.clone()).await
    }

    /// Add units of an item to the owner's basket.
    ///
    /// # Errors
    ///
    /// Returns [`BasketServiceError::Store`] if the basket could not be saved.
    #[tracing::instrument(
        name = "basket.add_item",
        skip_all,
        fields(owner = %owner, item = %item, quantity = quantity),
        err
    )]
    pub async fn add_item(
        &self,
        owner: &OwnerToken,
        item: ItemId,
        quantity: Quantity,
    ) -> Result<Basket, BasketServiceError> {
        let mut basket = self.store.load(owner.clone()).await;

        basket.add_item(item, quantity);

        self.store.save(&basket).await?;

        Ok(basket)
    }

    /// Remove units of an item from the owner's basket.
    ///
    /// # Errors
    ///
    /// Returns [`BasketServiceError::Basket`] if the item is not in the basket,
    /// in which case nothing is written, or [`BasketServiceError::Store`] if
    /// the basket could not be saved.
    #[tracing::instrument(
        name = "basket.remove_item",
        skip_all,
        fields(owner = %owner, item = %item, quantity = quantity),
        err
    )]
    pub async fn remove_item(
        &self,
        owner: &OwnerToken,
        item: &ItemId,
        quantity: Quantity,
    ) -> Result<Basket, BasketServiceError> {
        let mut basket = self.store.load(owner.clone()).await;

        basket.remove_item(item, quantity)?;

        self.store.save(&basket).await?;

        Ok(basket)
    }

    /// Calculate the owner's basket total from current catalog prices.
    ///
    /// For display only; never use this value to settle an order.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalError`] if any price could not be resolved.
    #[tracing::instrument(name = "basket.total", skip_all, fields(owner = %owner), err)]
    pub async fn total(&self, owner: &OwnerToken) -> Result<Money<'static, Currency>, TotalError> {
        let basket = self.store.load(owner.clone()).await;

        calculate_total(&basket, &self.catalog).await
    }

    /// Empty the owner's basket.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the persisted basket could not be cleared.
    #[tracing::instrument(name = "basket.clear", skip_all, fields(owner = %owner), err)]
    pub async fn clear(&self, owner: &OwnerToken) -> Result<(), StoreError> {
        let mut basket = Basket::new(owner.clone());

        self.store.delete(&mut basket).await
    }

    /// Check out the owner's basket.
    ///
    /// # Errors
    ///
    /// See [`BasketService::checkout_basket`].
    #[tracing::instrument(name = "basket.checkout", skip_all, fields(owner = %owner), err)]
    pub async fn checkout(&self, owner: &OwnerToken) -> Result<PlacedOrder, CheckoutError> {
        let mut basket = self.store.load(owner.clone()).await;

        self.checkout_basket(&mut basket).await
    }

    /// Submit a basket as an order and clear it once the order is accepted.
    ///
    /// The basket is only cleared after the order service has accepted the
    /// order. On any earlier failure the basket, in memory and persisted, is
    /// left as it was so checkout can be retried.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyBasket`]: there is nothing to order.
    /// - [`CheckoutError::Total`]: the total could not be calculated.
    /// - [`CheckoutError::OrderSubmission`]: the order service failed or refused the order.
    /// - [`CheckoutError::ClearFailed`]: the order was placed but the persisted
    ///   basket could not be cleared.
    pub async fn checkout_basket(&self, basket: &mut Basket) -> Result<PlacedOrder, CheckoutError> {
        if basket.is_empty() {
            return Err(CheckoutError::EmptyBasket);
        }

        let total = calculate_total(basket, &self.catalog).await?;

        let order = NewOrder {
            owner: basket.owner().clone(),
            items: basket.snapshot(),
            total,
        };

        let id = match self.orders.submit_order(&order).await {
            Ok(id) => id,
            Err(error) => {
                warn!(owner = %order.owner, %error, "order submission failed, basket kept");

                return Err(CheckoutError::OrderSubmission(error));
            }
        };

        if let Err(source) = self.store.delete(basket).await {
            return Err(CheckoutError::ClearFailed { order: id, source });
        }

        info!(order_id = %id, total = %order.total, items = order.items.len(), "checked out basket");

        Ok(PlacedOrder { id, order })
    }
}
