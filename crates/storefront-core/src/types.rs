//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  DiscountRule   │   │ AppliedDiscount │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  type           │   │  originalPrice  │       │
//! │  │  name           │   │  value          │   │  finalPrice     │       │
//! │  │  price          │   │  applyTo        │   │  discountAmount │       │
//! │  │  category       │   │                 │   │  discountType   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    Category     │   │  DiscountType   │                             │
//! │  │  BREAD, COFFEE  │   │  percentage     │                             │
//! │  │  COOKIES,OTHERS │   │  fixed          │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All types serialize with camelCase keys; the persisted cart and the rule
//! files use the same shapes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::{Money, BPS_PER_WHOLE};

// =============================================================================
// Category
// =============================================================================

/// Product category, used both to organize the catalog and to match
/// discount rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Bread,
    Coffee,
    Cookies,
    Others,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 4] = [
        Category::Bread,
        Category::Coffee,
        Category::Cookies,
        Category::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Bread => "BREAD",
            Category::Coffee => "COFFEE",
            Category::Cookies => "COOKIES",
            Category::Others => "OTHERS",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale. Immutable reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable, unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Price in centavos.
    #[serde(rename = "price")]
    pub price_cents: i64,

    pub category: Category,

    /// Image reference (a path served by the asset pipeline).
    pub image: String,

    pub description: String,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Discount Type
// =============================================================================

/// How a discount rule reduces a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `value` is a percent, 0 to 100 (15 = 15%).
    Percentage,
    /// `value` is an amount in centavos.
    Fixed,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
        }
    }
}

impl FromStr for DiscountType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(DiscountType::Percentage),
            "fixed" => Ok(DiscountType::Fixed),
            other => Err(CoreError::UnsupportedDiscountType(other.to_string())),
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Discount Rule
// =============================================================================

/// What a discount rule applies to.
///
/// A rule matches a product if the product's category is listed OR its id is
/// listed. With both lists empty the rule never matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApplyTo {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Category>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub product_ids: Vec<String>,
}

impl ApplyTo {
    /// Targets every product in the given categories.
    pub fn categories(categories: impl IntoIterator<Item = Category>) -> Self {
        ApplyTo {
            categories: categories.into_iter().collect(),
            product_ids: Vec::new(),
        }
    }

    /// Targets the given product ids.
    pub fn products<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        ApplyTo {
            categories: Vec::new(),
            product_ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.product_ids.is_empty()
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.categories.contains(&product.category)
            || self.product_ids.iter().any(|id| *id == product.id)
    }
}

/// A discount rule from the active rule set.
///
/// ## JSON Shape
/// ```json
/// { "type": "percentage", "value": 15, "applyTo": { "categories": ["BREAD"] } }
/// { "type": "fixed", "value": 200, "applyTo": { "productIds": ["550e..."] } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DiscountRule {
    #[serde(rename = "type")]
    pub discount_type: DiscountType,

    /// Percent for percentage rules (may be fractional), centavos for
    /// fixed rules.
    pub value: f64,

    #[serde(default)]
    pub apply_to: ApplyTo,
}

impl DiscountRule {
    /// A percentage rule; `percent` is 0 to 100 (15.0 = 15%).
    pub fn percentage(percent: f64, apply_to: ApplyTo) -> Self {
        DiscountRule {
            discount_type: DiscountType::Percentage,
            value: percent,
            apply_to,
        }
    }

    /// A fixed-amount rule.
    pub fn fixed(amount: Money, apply_to: ApplyTo) -> Self {
        DiscountRule {
            discount_type: DiscountType::Fixed,
            value: amount.cents() as f64,
            apply_to,
        }
    }

    /// The percent value in basis points, clamped to 0..=10000.
    ///
    /// Percent precision is hundredths: 12.5 becomes 1250.
    pub fn basis_points(&self) -> u32 {
        let bps = (self.value * 100.0).round();
        if bps.is_nan() {
            return 0;
        }
        // Float-to-int `as` saturates
        (bps as i64).clamp(0, i64::from(BPS_PER_WHOLE)) as u32
    }

    /// The fixed value as an amount, never negative.
    pub fn amount(&self) -> Money {
        if self.value.is_nan() {
            return Money::zero();
        }
        Money::from_cents(self.value.round() as i64).non_negative()
    }

    #[inline]
    pub fn matches(&self, product: &Product) -> bool {
        self.apply_to.matches(product)
    }
}

// =============================================================================
// Applied Discount
// =============================================================================

/// A discount snapshot locked onto a cart item when it is first added.
///
/// ## Invariants
/// - `final_price >= 0`
/// - `discount_amount >= 0`
/// - `final_price = original_price - discount_amount`, except when a fixed
///   discount exceeds the price: then `final_price = 0` and
///   `discount_amount` is still the rule's full value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDiscount {
    pub original_price: Money,
    pub final_price: Money,
    pub discount_amount: Money,
    pub discount_type: DiscountType,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, category: Category) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price_cents: 1000,
            category,
            image: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn test_category_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&Category::Cookies).unwrap();
        assert_eq!(json, "\"COOKIES\"");
        let back: Category = serde_json::from_str("\"BREAD\"").unwrap();
        assert_eq!(back, Category::Bread);
    }

    #[test]
    fn test_discount_type_from_str() {
        assert_eq!("fixed".parse::<DiscountType>().unwrap(), DiscountType::Fixed);
        let err = "bogo".parse::<DiscountType>().unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedDiscountType(t) if t == "bogo"));
    }

    #[test]
    fn test_apply_to_matches_by_category_or_id() {
        let bread = product("b1", Category::Bread);
        let coffee = product("c1", Category::Coffee);

        let by_category = ApplyTo::categories([Category::Bread]);
        assert!(by_category.matches(&bread));
        assert!(!by_category.matches(&coffee));

        let by_id = ApplyTo::products(["c1"]);
        assert!(by_id.matches(&coffee));
        assert!(!by_id.matches(&bread));

        assert!(!ApplyTo::default().matches(&bread));
    }

    #[test]
    fn test_rule_json_shape() {
        let rule = DiscountRule::percentage(15.0, ApplyTo::categories([Category::Bread]));
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "percentage",
                "value": 15.0,
                "applyTo": { "categories": ["BREAD"] }
            })
        );

        let parsed: DiscountRule = serde_json::from_str(
            r#"{"type": "percentage", "value": 12.5, "applyTo": {"categories": ["COFFEE"]}}"#,
        )
        .unwrap();
        assert_eq!(parsed.value, 12.5);
        assert_eq!(parsed.basis_points(), 1250);
    }

    #[test]
    fn test_rule_value_conversions() {
        let bread = ApplyTo::categories([Category::Bread]);
        assert_eq!(DiscountRule::percentage(15.0, bread.clone()).basis_points(), 1500);
        assert_eq!(DiscountRule::percentage(250.0, bread.clone()).basis_points(), 10000);
        assert_eq!(DiscountRule::percentage(-5.0, bread.clone()).basis_points(), 0);
        assert_eq!(DiscountRule::fixed(Money::from_cents(200), bread).amount().cents(), 200);
    }

    #[test]
    fn test_product_price() {
        assert_eq!(product("x", Category::Others).price().cents(), 1000);
    }

    #[test]
    fn test_product_json_uses_price_key() {
        let json = serde_json::to_value(product("x", Category::Bread)).unwrap();
        assert_eq!(json["price"], 1000);
        assert!(json.get("priceCents").is_none());

        let back: Product = serde_json::from_value(json).unwrap();
        assert_eq!(back.price_cents, 1000);
    }
}
