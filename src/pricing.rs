//! Pricing

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    basket::Basket,
    catalog::{Catalog, CatalogError},
    items::{ItemId, Quantity},
};

/// Errors that can occur while calculating a basket total.
#[derive(Debug, Error, PartialEq)]
pub enum TotalError {
    /// An item's price could not be resolved.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The catalog returned a negative price for an item.
    #[error("item {0} has a negative price")]
    NegativePrice(ItemId),

    /// A line total does not fit in minor units.
    #[error("line total for item {0} overflows")]
    Overflow(ItemId),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates the total value of a basket from current catalog prices.
///
/// Prices are resolved at call time; nothing is cached on the basket. The
/// result is only an indicator for display and must not be used to settle an
/// order.
///
/// # Errors
///
/// - [`TotalError::Catalog`]: an item's price could not be resolved. The
///   calculation aborts rather than skipping the item.
/// - [`TotalError::NegativePrice`]: the catalog priced an item below zero.
/// - [`TotalError::Overflow`]: price times quantity overflowed.
/// - [`TotalError::Money`]: wrapped money arithmetic or currency mismatch error.
pub async fn calculate_total<C>(
    basket: &Basket,
    catalog: &C,
) -> Result<Money<'static, Currency>, TotalError>
where
    C: Catalog + ?Sized,
{
    let mut total = Money::from_minor(0, catalog.currency());

    for (item, quantity) in basket.iter() {
        let price = catalog.price(item).await?;

        total = total.add(line_total(item, price, quantity)?)?;
    }

    Ok(total)
}

/// Calculates `price * quantity` for a single basket line.
///
/// # Errors
///
/// Returns [`TotalError::NegativePrice`] for prices below zero and
/// [`TotalError::Overflow`] if the product does not fit in minor units.
pub fn line_total(
    item: &ItemId,
    price: Money<'static, Currency>,
    quantity: Quantity,
) -> Result<Money<'static, Currency>, TotalError> {
    let unit = price.to_minor_units();

    if unit < 0 {
        return Err(TotalError::NegativePrice(item.clone()));
    }

    let minor = unit
        .checked_mul(i64::from(quantity))
        .ok_or_else(|| TotalError::Overflow(item.clone()))?;

    Ok(Money::from_minor(minor, price.currency()))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use crate::{
        basket::OwnerToken,
        catalog::{FixedCatalog, MockCatalog},
    };

    use super::*;

    fn basket(items: &[(&str, Quantity)]) -> Result<Basket, crate::basket::BasketError> {
        Ok(Basket::with_items(
            OwnerToken::new("client-1")?,
            items
                .iter()
                .map(|(item, quantity)| (ItemId::from(*item), *quantity)),
        ))
    }

    #[tokio::test]
    async fn sums_price_times_quantity() -> TestResult {
        let catalog = FixedCatalog::new(GBP)
            .with_price("a", 10)
            .with_price("b", 5);

        let total = calculate_total(&basket(&[("a", 2), ("b", 1)])?, &catalog).await?;

        assert_eq!(total, Money::from_minor(25, GBP));

        Ok(())
    }

    #[tokio::test]
    async fn empty_basket_totals_zero_in_catalog_currency() -> TestResult {
        let catalog = FixedCatalog::new(USD);

        let total = calculate_total(&basket(&[])?, &catalog).await?;

        assert_eq!(total, Money::from_minor(0, USD));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_item_aborts_the_total() -> TestResult {
        let catalog = FixedCatalog::new(GBP).with_price("a", 10);

        let result = calculate_total(&basket(&[("a", 1), ("ghost", 1)])?, &catalog).await;

        assert_eq!(
            result,
            Err(TotalError::Catalog(CatalogError::UnknownItem(ItemId::from(
                "ghost"
            ))))
        );

        Ok(())
    }

    #[tokio::test]
    async fn prices_are_resolved_on_every_call() -> TestResult {
        let mut catalog = FixedCatalog::new(GBP).with_price("a", 10);
        let basket = basket(&[("a", 3)])?;

        assert_eq!(
            calculate_total(&basket, &catalog).await?,
            Money::from_minor(30, GBP)
        );

        catalog.insert("a", 12);

        assert_eq!(
            calculate_total(&basket, &catalog).await?,
            Money::from_minor(36, GBP)
        );

        Ok(())
    }

    #[tokio::test]
    async fn currency_mismatch_is_reported() -> TestResult {
        let mut catalog = MockCatalog::new();

        catalog.expect_currency().return_const(GBP);
        catalog
            .expect_price()
            .returning(|_| Ok(Money::from_minor(100, USD)));

        let result = calculate_total(&basket(&[("a", 1)])?, &catalog).await;

        assert!(
            matches!(result, Err(TotalError::Money(_))),
            "expected Money error, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn catalog_outage_is_reported() -> TestResult {
        let mut catalog = MockCatalog::new();

        catalog.expect_currency().return_const(GBP);
        catalog
            .expect_price()
            .returning(|_| Err(CatalogError::Unavailable("timeout".to_string())));

        let result = calculate_total(&basket(&[("a", 1)])?, &catalog).await;

        assert_eq!(
            result,
            Err(TotalError::Catalog(CatalogError::Unavailable(
                "timeout".to_string()
            )))
        );

        Ok(())
    }

    #[test]
    fn negative_prices_are_rejected() {
        let result = line_total(&ItemId::from("a"), Money::from_minor(-1, GBP), 1);

        assert_eq!(result, Err(TotalError::NegativePrice(ItemId::from("a"))));
    }

    #[test]
    fn overflowing_line_is_rejected() {
        let result = line_total(
            &ItemId::from("a"),
            Money::from_minor(10_000_000_000_000, GBP),
            Quantity::MAX,
        );

        assert_eq!(result, Err(TotalError::Overflow(ItemId::from("a"))));
    }
}
