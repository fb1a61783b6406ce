//! Basket service errors.

use thiserror::Error;

use crate::{
    basket::BasketError,
    orders::{OrderId, OrderServiceError},
    pricing::TotalError,
    store::StoreError,
};

/// Errors raised by basket mutations.
#[derive(Debug, Error)]
pub enum BasketServiceError {
    /// The basket rejected the change.
    #[error(transparent)]
    Basket(#[from] BasketError),

    /// The basket could not be persisted.
    #[error("failed to persist basket")]
    Store(#[from] StoreError),
}

/// Errors raised by checkout.
///
/// Unless the variant is [`CheckoutError::ClearFailed`], no order was placed and
/// the persisted basket is unchanged.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The basket holds no items.
    #[error("cannot check out an empty basket")]
    EmptyBasket,

    /// The basket total could not be calculated.
    #[error("failed to total basket")]
    Total(#[from] TotalError),

    /// The order service failed or refused the order.
    #[error("order submission failed")]
    OrderSubmission(#[source] OrderServiceError),

    /// The order was placed, but the basket could not be cleared afterwards.
    #[error("order {order} placed but basket could not be cleared")]
    ClearFailed {
        /// Identifier of the placed order.
        order: OrderId,
        /// Why the basket could not be cleared.
        #[source]
        source: StoreError,
    },
}
