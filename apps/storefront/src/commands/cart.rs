//! # Cart Commands
//!
//! Thin handlers over [`CartStore`]. Each returns the cart as it stands
//! after the command.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐  add_to_cart   ┌──────────┐                               │
//! │  │  Empty   │───────────────►│ In Cart  │◄──┐ increase_quantity         │
//! │  │  Cart    │                │          │───┘ decrease_quantity         │
//! │  └──────────┘                └──────────┘     remove_from_cart          │
//! │       ▲                           │                                     │
//! │       │        clear_cart         │                                     │
//! │       └───────────────────────────┘   (last item removed → Empty)      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands on products that are not in the cart are no-ops, not errors.

use tracing::debug;

use crate::error::ApiError;
use crate::state::{CartSnapshot, CartStore};
use storefront_core::Catalog;

/// Gets the current cart contents.
pub fn get_cart(cart: &CartStore) -> CartSnapshot {
    debug!("get_cart command");
    cart.snapshot()
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - Product already in cart: quantity increases, locked discount kept
/// - Product not in cart: added with the discount the active rules give
///
/// ## Arguments
/// * `product_id` - Catalog id of the product
/// * `quantity` - Quantity to add (default: 1)
pub fn add_to_cart(
    cart: &CartStore,
    catalog: &Catalog,
    product_id: &str,
    quantity: Option<i64>,
) -> Result<CartSnapshot, ApiError> {
    let quantity = quantity.unwrap_or(1);
    debug!(product_id = %product_id, quantity = %quantity, "add_to_cart command");

    let product = catalog
        .get(product_id)
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    cart.add_to_cart(product, quantity)?;
    Ok(cart.snapshot())
}

/// Removes a product line from the cart.
pub fn remove_from_cart(cart: &CartStore, product_id: &str) -> CartSnapshot {
    debug!(product_id = %product_id, "remove_from_cart command");

    cart.remove_from_cart(product_id);
    cart.snapshot()
}

/// Adds one unit of a product already in the cart.
///
/// A product that is not in the cart is a no-op.
///
/// ## Errors
/// `CART_ERROR` when the line is already at the 999-unit cap; the cart is
/// left unchanged.
pub fn increase_quantity(cart: &CartStore, product_id: &str) -> Result<CartSnapshot, ApiError> {
    debug!(product_id = %product_id, "increase_quantity command");

    cart.increase_quantity(product_id)?;
    Ok(cart.snapshot())
}

/// Removes one unit; the line disappears when it reaches zero.
pub fn decrease_quantity(cart: &CartStore, product_id: &str) -> CartSnapshot {
    debug!(product_id = %product_id, "decrease_quantity command");

    cart.decrease_quantity(product_id);
    cart.snapshot()
}

/// Clears all items from the cart.
pub fn clear_cart(cart: &CartStore) -> CartSnapshot {
    debug!("clear_cart command");

    cart.clear_cart();
    cart.snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use storefront_core::catalog::ESPRESSO_ID;
    use storefront_core::RuleSet;
    use storefront_db::{Database, DbConfig};

    const WHOLE_WHEAT_ID: &str = "550e8400-e29b-41d4-a716-446655440001";

    async fn store() -> CartStore {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        CartStore::restore(db.kv(), RuleSet::active()).await
    }

    #[tokio::test]
    async fn test_add_then_adjust() {
        let cart = store().await;
        let catalog = Catalog::builtin();

        let snapshot = add_to_cart(&cart, &catalog, WHOLE_WHEAT_ID, None).unwrap();
        assert_eq!(snapshot.totals.total_quantity, 1);
        // 5,90 less 15% (88.5 → 89) = 5,01
        assert_eq!(snapshot.totals.total_cents, 501);
        assert_eq!(snapshot.totals.savings_cents, 89);

        let snapshot = increase_quantity(&cart, WHOLE_WHEAT_ID).unwrap();
        assert_eq!(snapshot.totals.total_cents, 1002);

        let snapshot = decrease_quantity(&cart, WHOLE_WHEAT_ID);
        assert_eq!(snapshot.totals.total_quantity, 1);

        let snapshot = decrease_quantity(&cart, WHOLE_WHEAT_ID);
        assert!(snapshot.items.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let cart = store().await;

        let err = add_to_cart(&cart, &Catalog::builtin(), "missing", Some(1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_quantity_limits_are_cart_errors() {
        let cart = store().await;
        let catalog = Catalog::builtin();

        add_to_cart(&cart, &catalog, ESPRESSO_ID, Some(999)).unwrap();
        assert_eq!(
            increase_quantity(&cart, ESPRESSO_ID).unwrap_err().code,
            ErrorCode::CartError
        );
        assert_eq!(
            add_to_cart(&cart, &catalog, ESPRESSO_ID, Some(1)).unwrap_err().code,
            ErrorCode::CartError
        );
        assert_eq!(
            add_to_cart(&cart, &catalog, WHOLE_WHEAT_ID, Some(0)).unwrap_err().code,
            ErrorCode::ValidationError
        );
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let cart = store().await;
        let catalog = Catalog::builtin();

        add_to_cart(&cart, &catalog, ESPRESSO_ID, Some(2)).unwrap();
        add_to_cart(&cart, &catalog, WHOLE_WHEAT_ID, Some(1)).unwrap();

        let snapshot = remove_from_cart(&cart, ESPRESSO_ID);
        assert_eq!(snapshot.items.len(), 1);

        // Removing again is a no-op
        assert_eq!(remove_from_cart(&cart, ESPRESSO_ID), snapshot);

        assert!(clear_cart(&cart).items.is_empty());
        assert_eq!(get_cart(&cart).totals.total_cents, 0);
    }
}
