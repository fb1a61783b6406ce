//! Integration test for the basket lifecycle across requests.
//!
//! Each step builds its basket fresh from the shared channel, the way a web
//! handler would on every request:
//!
//! 1. Add 2 × apple (£0.10) and 1 × pear (£0.05)
//! 2. Add 3 more apples, accumulating to 5
//! 3. Remove 4 apples, leaving 1
//! 4. Checkout while the order service is down: basket kept
//! 5. Checkout again once it recovers: one order placed, basket emptied

use async_trait::async_trait;
use parking_lot::Mutex;
use rusty_money::{Money, iso::GBP};
use testresult::TestResult;

use market::prelude::*;

/// Order service that refuses orders until switched online.
#[derive(Debug, Default)]
struct FlakyOrders {
    online: Mutex<bool>,
    placed: Mutex<Vec<NewOrder>>,
}

#[async_trait]
impl OrderService for FlakyOrders {
    async fn submit_order(&self, order: &NewOrder) -> Result<OrderId, OrderServiceError> {
        if !*self.online.lock() {
            return Err(OrderServiceError::Unavailable("offline".to_string()));
        }

        let mut placed = self.placed.lock();

        placed.push(order.clone());

        Ok(OrderId::new(format!("order-{}", placed.len())))
    }
}

#[tokio::test]
async fn basket_lifecycle_with_retried_checkout() -> TestResult {
    let catalog = FixedCatalog::new(GBP)
        .with_price("apple", 10)
        .with_price("pear", 5);

    let service = BasketService::new(
        BasketStore::new(MemoryChannel::new(), BasketConfig::default()),
        catalog,
        FlakyOrders::default(),
    );

    let owner = OwnerToken::new("visitor-42")?;
    let apple = ItemId::from("apple");
    let pear = ItemId::from("pear");

    service.add_item(&owner, apple.clone(), 2).await?;
    service.add_item(&owner, pear.clone(), 1).await?;

    assert_eq!(service.total(&owner).await?, Money::from_minor(25, GBP));

    service.add_item(&owner, apple.clone(), 3).await?;

    let basket = service.remove_item(&owner, &apple, 4).await?;

    assert_eq!(basket.quantity(&apple), Some(1));
    assert_eq!(basket.quantity(&pear), Some(1));

    let failed = service.checkout(&owner).await;

    assert!(
        matches!(failed, Err(CheckoutError::OrderSubmission(_))),
        "expected OrderSubmission, got {failed:?}"
    );
    assert_eq!(service.basket(&owner).await, basket);

    *service.orders().online.lock() = true;

    let placed = service.checkout(&owner).await?;

    assert_eq!(placed.id, OrderId::new("order-1"));
    assert_eq!(placed.order.total, Money::from_minor(15, GBP));
    assert_eq!(placed.order.items, basket.snapshot());
    assert!(service.basket(&owner).await.is_empty());
    assert!(service.store().channel().is_empty());

    Ok(())
}

#[tokio::test]
async fn baskets_do_not_leak_between_visitors() -> TestResult {
    let service = BasketService::new(
        BasketStore::new(MemoryChannel::new(), BasketConfig::default()),
        FixedCatalog::new(GBP).with_price("apple", 10),
        FlakyOrders::default(),
    );

    let alice = OwnerToken::new("visitor-a")?;
    let bob = OwnerToken::new("visitor-b")?;

    service.add_item(&alice, ItemId::from("apple"), 2).await?;

    assert!(service.basket(&bob).await.is_empty());
    assert_eq!(service.store().channel().len(), 1);

    Ok(())
}
