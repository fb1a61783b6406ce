//! Market prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{Basket, BasketError, OwnerToken},
    catalog::{Catalog, CatalogError, FixedCatalog},
    channel::{ChannelError, MemoryChannel, PersistenceChannel, StoredBasket},
    config::BasketConfig,
    items::{ItemId, Quantity},
    orders::{NewOrder, OrderId, OrderService, OrderServiceError, PlacedOrder},
    pricing::{TotalError, calculate_total},
    service::{BasketService, BasketServiceError, CheckoutError},
    store::{BasketStore, StoreError},
};
