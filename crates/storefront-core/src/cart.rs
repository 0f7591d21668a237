//! # Cart Module
//!
//! The cart model and its transitions. Pure: persistence and observers live
//! in the app's cart store, which wraps this type.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Transitions                                     │
//! │                                                                         │
//! │  add(product, qty)                                                      │
//! │    ├── present → quantity += qty, discount stays LOCKED                 │
//! │    └── absent  → evaluate discount, append item                         │
//! │                                                                         │
//! │  increase(id)   → quantity += 1          (absent: no-op)                │
//! │  decrease(id)   → quantity -= 1, 0 → item removed (absent: no-op)       │
//! │  remove(id)     → item removed           (absent: no-op)                │
//! │  clear()        → empty                                                 │
//! │                                                                         │
//! │  total() = Σ (discount.final_price ?? product.price) × quantity         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items are unique by product id
//! - Every quantity is in `1..=MAX_ITEM_QUANTITY`
//! - Items keep insertion order

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::discount::RuleSet;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{AppliedDiscount, Product};
use crate::validation::{validate_applied_discount, validate_product, validate_quantity};
use crate::MAX_ITEM_QUANTITY;

// =============================================================================
// Cart Item
// =============================================================================

/// A product line in the cart.
///
/// The whole product is embedded so a persisted cart can be shown without
/// the catalog, and the discount is a snapshot taken when the product was
/// first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: Product,

    pub quantity: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub applied_discount: Option<AppliedDiscount>,
}

impl CartItem {
    /// The price charged per unit: the discounted price if a discount was
    /// locked in, else the product price.
    pub fn unit_price(&self) -> Money {
        self.applied_discount
            .map(|d| d.final_price)
            .unwrap_or_else(|| self.product.price())
    }

    /// Calculates the line total (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    /// What the line would cost without its discount.
    pub fn original_line_total(&self) -> Money {
        self.product.price().multiply_quantity(self.quantity)
    }

    fn is_restorable(&self) -> bool {
        self.quantity > 0
            && validate_product(&self.product).is_ok()
            && self
                .applied_discount
                .as_ref()
                .map_or(true, |d| validate_applied_discount(d).is_ok())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// Serializes as a bare array of items, which is the persisted format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Rebuilds a cart from persisted items, restoring the invariants.
    ///
    /// Items with a non-positive quantity, an invalid product or an invalid
    /// discount snapshot are dropped. A repeated product id is merged into
    /// its first occurrence, keeping that occurrence's discount. Quantities
    /// are capped at `MAX_ITEM_QUANTITY`.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Cart::new();
        for item in items.into_iter().filter(CartItem::is_restorable) {
            match cart.position(&item.product.id) {
                Some(idx) => {
                    let existing = &mut cart.items[idx];
                    existing.quantity = existing
                        .quantity
                        .saturating_add(item.quantity)
                        .min(MAX_ITEM_QUANTITY);
                }
                None => cart.items.push(CartItem {
                    quantity: item.quantity.min(MAX_ITEM_QUANTITY),
                    ..item
                }),
            }
        }
        cart
    }

    /// Adds a product to the cart or increases its quantity if present.
    ///
    /// ## Behavior
    /// - Present: quantity increases, the locked discount is kept as-is
    /// - Absent: the discount is evaluated against `rules` and a new item
    ///   is appended
    ///
    /// ## Errors
    /// - `Validation` if `quantity` is outside `1..=999`
    /// - `QuantityTooLarge` if the merged quantity would exceed 999
    pub fn add(&mut self, product: &Product, quantity: i64, rules: &RuleSet) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(item) = self.item_mut(&product.id) {
            let new_qty = item.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            return Ok(());
        }

        self.items.push(CartItem {
            product: product.clone(),
            quantity,
            applied_discount: rules.evaluate(product),
        });
        Ok(())
    }

    /// Removes an item by product id. Returns whether anything was removed.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product.id != product_id);
        self.items.len() != initial_len
    }

    /// Adds one unit. Returns whether the cart changed.
    ///
    /// ## Errors
    /// `QuantityTooLarge` if the item is already at `MAX_ITEM_QUANTITY`.
    pub fn increase(&mut self, product_id: &str) -> CoreResult<bool> {
        let Some(item) = self.item_mut(product_id) else {
            return Ok(false);
        };

        if item.quantity >= MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: item.quantity + 1,
                max: MAX_ITEM_QUANTITY,
            });
        }

        item.quantity += 1;
        Ok(true)
    }

    /// Removes one unit, dropping the item when it reaches zero.
    /// Returns whether the cart changed.
    pub fn decrease(&mut self, product_id: &str) -> bool {
        let Some(idx) = self.position(product_id) else {
            return false;
        };

        if self.items[idx].quantity > 1 {
            self.items[idx].quantity -= 1;
        } else {
            self.items.remove(idx);
        }
        true
    }

    /// Empties the cart. Returns whether it had items.
    pub fn clear(&mut self) -> bool {
        let had_items = !self.items.is_empty();
        self.items.clear();
        had_items
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    /// Returns the number of unique items in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all items.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// The amount to pay, with locked discounts applied.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// The amount without any discounts.
    pub fn original_total(&self) -> Money {
        self.items.iter().map(CartItem::original_line_total).sum()
    }

    /// How much the discounts take off.
    pub fn savings(&self) -> Money {
        (self.original_total() - self.total()).non_negative()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.product.id == product_id)
    }

    fn item_mut(&mut self, product_id: &str) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| i.product.id == product_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, ESPRESSO_ID};
    use crate::types::{ApplyTo, Category, DiscountRule, DiscountType};

    const WHITE_BREAD: &str = "550e8400-e29b-41d4-a716-446655440000";
    const MACARONS: &str = "550e8400-e29b-41d4-a716-446655440007";

    fn test_product(id: &str, price_cents: i64, category: Category) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price_cents,
            category,
            image: format!("/images/{}.webp", id),
            description: String::new(),
        }
    }

    #[test]
    fn test_add_evaluates_discount_on_first_insert() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::new();

        cart.add(catalog.get(WHITE_BREAD).unwrap(), 1, &RuleSet::active()).unwrap();
        cart.add(catalog.get(MACARONS).unwrap(), 1, &RuleSet::active()).unwrap();

        let bread = cart.get(WHITE_BREAD).unwrap();
        let discount = bread.applied_discount.unwrap();
        assert_eq!(discount.discount_type, DiscountType::Percentage);
        assert_eq!(discount.final_price.cents(), 416);

        assert!(cart.get(MACARONS).unwrap().applied_discount.is_none());
        assert_eq!(cart.total().cents(), 416 + 500);
    }

    #[test]
    fn test_add_same_product_increases_quantity_and_keeps_discount() {
        let bread = test_product("b", 1000, Category::Bread);
        let mut cart = Cart::new();

        cart.add(&bread, 2, &RuleSet::active()).unwrap();
        let locked = cart.get("b").unwrap().applied_discount;

        // A different rule set at second insertion must not be consulted
        let bigger = RuleSet::new(vec![DiscountRule::percentage(
            50.0,
            ApplyTo::categories([Category::Bread]),
        )])
        .unwrap();
        cart.add(&bread, 3, &bigger).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.get("b").unwrap().quantity, 5);
        assert_eq!(cart.get("b").unwrap().applied_discount, locked);
    }

    #[test]
    fn test_total_price_example() {
        let a = test_product("A", 1000, Category::Others);
        let b = test_product("B", 2000, Category::Others);
        let rules = RuleSet::new(vec![DiscountRule::fixed(
            Money::from_cents(500),
            ApplyTo::products(["B"]),
        )])
        .unwrap();

        let mut cart = Cart::new();
        cart.add(&a, 2, &rules).unwrap();
        cart.add(&b, 1, &rules).unwrap();

        assert_eq!(cart.get("B").unwrap().unit_price().cents(), 1500);
        assert_eq!(cart.total().cents(), 1000 * 2 + 1500);
        assert_eq!(cart.original_total().cents(), 4000);
        assert_eq!(cart.savings().cents(), 500);
    }

    #[test]
    fn test_remove_absent_is_noop_twice() {
        let mut cart = Cart::new();
        cart.add(&test_product("a", 100, Category::Others), 1, &RuleSet::empty())
            .unwrap();
        let before = cart.clone();

        assert!(!cart.remove("missing"));
        assert!(!cart.remove("missing"));
        assert_eq!(cart, before);

        assert!(cart.remove("a"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrease_removes_at_zero() {
        let mut cart = Cart::new();
        cart.add(&test_product("a", 100, Category::Others), 2, &RuleSet::empty())
            .unwrap();

        assert!(cart.decrease("a"));
        assert_eq!(cart.get("a").unwrap().quantity, 1);

        assert!(cart.decrease("a"));
        assert!(cart.get("a").is_none());

        assert!(!cart.decrease("a"));
        assert!(cart.items().iter().all(|i| i.quantity > 0));
    }

    #[test]
    fn test_increase() {
        let mut cart = Cart::new();
        cart.add(&test_product("a", 100, Category::Others), 1, &RuleSet::empty())
            .unwrap();

        assert!(cart.increase("a").unwrap());
        assert_eq!(cart.get("a").unwrap().quantity, 2);
        assert!(!cart.increase("missing").unwrap());
    }

    #[test]
    fn test_quantity_limits() {
        let product = test_product("a", 100, Category::Others);
        let mut cart = Cart::new();

        assert!(matches!(
            cart.add(&product, 0, &RuleSet::empty()),
            Err(CoreError::Validation(_))
        ));
        assert!(cart.is_empty());

        cart.add(&product, MAX_ITEM_QUANTITY, &RuleSet::empty()).unwrap();
        assert!(matches!(
            cart.add(&product, 1, &RuleSet::empty()),
            Err(CoreError::QuantityTooLarge { .. })
        ));
        assert!(matches!(
            cart.increase("a"),
            Err(CoreError::QuantityTooLarge { .. })
        ));
        assert_eq!(cart.get("a").unwrap().quantity, MAX_ITEM_QUANTITY);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        assert!(!cart.clear());

        cart.add(&test_product("a", 100, Category::Others), 2, &RuleSet::empty())
            .unwrap();
        assert!(cart.clear());
        assert!(cart.is_empty());
        assert!(cart.total().is_zero());
    }

    #[test]
    fn test_serializes_as_item_array() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::new();
        cart.add(catalog.get(ESPRESSO_ID).unwrap(), 1, &RuleSet::active()).unwrap();
        cart.add(catalog.get(MACARONS).unwrap(), 2, &RuleSet::active()).unwrap();

        let json = serde_json::to_value(&cart).unwrap();
        let items = json.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["quantity"], 1);
        assert_eq!(items[0]["product"]["price"], 350);
        assert_eq!(items[0]["appliedDiscount"]["finalPrice"], 150);
        assert_eq!(items[0]["appliedDiscount"]["discountType"], "fixed");
        assert!(items[1].get("appliedDiscount").is_none());

        let restored: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_from_items_restores_invariants() {
        let a = test_product("a", 100, Category::Others);
        let b = test_product("b", 200, Category::Others);
        let item = |product: &Product, quantity| CartItem {
            product: product.clone(),
            quantity,
            applied_discount: None,
        };

        let cart = Cart::from_items(vec![item(&a, 2), item(&b, 0), item(&a, 3), item(&b, -1)]);

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.get("a").unwrap().quantity, 5);
        assert!(cart.get("b").is_none());
    }

    #[test]
    fn test_from_items_drops_corrupt_products_and_discounts() {
        let item = |product: Product, applied_discount| CartItem {
            product,
            quantity: 2,
            applied_discount,
        };
        let huge = test_product("huge", i64::MAX / 2 + 1, Category::Others);
        let negative = test_product("neg", -100, Category::Others);
        let good = test_product("ok", 300, Category::Others);
        let inflated = AppliedDiscount {
            original_price: Money::from_cents(300),
            final_price: Money::from_cents(-50),
            discount_amount: Money::from_cents(350),
            discount_type: DiscountType::Fixed,
        };

        let cart = Cart::from_items(vec![
            item(huge, None),
            item(negative, None),
            item(test_product("bad-discount", 300, Category::Others), Some(inflated)),
            item(good, None),
        ]);

        // A price this large is still a valid price; totals saturate
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total().cents(), i64::MAX);
        assert!(cart.get("neg").is_none());
        assert!(cart.get("bad-discount").is_none());
        assert_eq!(cart.get("ok").unwrap().line_total().cents(), 600);
    }
}
