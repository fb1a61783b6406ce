//! Orders
//!
//! The external order service a basket is handed to at checkout.

use std::fmt::{Display, Formatter, Result as FmtResult};

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    basket::OwnerToken,
    items::{ItemId, Quantity},
};

/// Identifier assigned to a submitted order by the order service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderId(String);

impl OrderId {
    /// Creates a new order identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Order payload submitted at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    /// Owner of the basket the order was built from.
    pub owner: OwnerToken,

    /// Snapshot of the basket items at checkout.
    pub items: FxHashMap<ItemId, Quantity>,

    /// Total computed from catalog prices at checkout.
    pub total: Money<'static, Currency>,
}

/// An order accepted by the order service.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    /// Identifier assigned by the order service.
    pub id: OrderId,

    /// The submitted payload.
    pub order: NewOrder,
}

/// Errors returned by the order service.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderServiceError {
    /// The order service refused the order.
    #[error("order rejected: {0}")]
    Rejected(String),

    /// The order service could not be reached.
    #[error("order service unavailable: {0}")]
    Unavailable(String),
}

#[automock]
#[async_trait]
/// Accepts orders built from baskets.
pub trait OrderService: Send + Sync {
    /// Submits an order, returning the identifier it was accepted under.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderServiceError`] if the order was not accepted.
    async fn submit_order(&self, order: &NewOrder) -> Result<OrderId, OrderServiceError>;
}
