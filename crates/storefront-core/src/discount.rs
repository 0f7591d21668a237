//! # Discount Module
//!
//! Evaluates discount rules against products.
//!
//! ## Evaluation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  evaluate(product, rules)                                               │
//! │                                                                         │
//! │  rules: [ 15% BREAD, R$ 2 off Espresso, 50% BREAD ]                     │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  keep rules matching product.category OR product.id                    │
//! │              │                                                          │
//! │              ├── none match → None (sells at original price)           │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  FIRST match in list order wins (15% BREAD, not the bigger 50%)        │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  AppliedDiscount { originalPrice, finalPrice, discountAmount, type }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no stacking and no priority field. If more rules are added later,
//! their order in the rule set is what decides which one applies.

use serde_json::Value;

use crate::catalog::ESPRESSO_ID;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{AppliedDiscount, ApplyTo, Category, DiscountRule, DiscountType, Product};
use crate::validation::validate_discount_rule;

// =============================================================================
// Evaluation
// =============================================================================

/// Returns the discount the first matching rule grants `product`, if any.
///
/// ## Example
/// ```rust
/// use storefront_core::{evaluate, ApplyTo, Category, DiscountRule, DiscountType, Product};
///
/// let bread = Product {
///     id: "x".into(),
///     name: "Pão".into(),
///     price_cents: 10000,
///     category: Category::Bread,
///     image: String::new(),
///     description: String::new(),
/// };
/// let rules = [DiscountRule::percentage(15.0, ApplyTo::categories([Category::Bread]))];
///
/// let applied = evaluate(&bread, &rules).unwrap();
/// assert_eq!(applied.final_price.cents(), 8500);
/// assert_eq!(applied.discount_amount.cents(), 1500);
/// assert_eq!(applied.discount_type, DiscountType::Percentage);
/// ```
pub fn evaluate(product: &Product, rules: &[DiscountRule]) -> Option<AppliedDiscount> {
    rules
        .iter()
        .find(|rule| rule.matches(product))
        .map(|rule| apply_rule(product.price(), rule))
}

/// Applies a single rule to a price.
///
/// - Percentage: `discount = round(price * percent / 100)` half up, `final = price - discount`
/// - Fixed: `discount = value`, `final = max(price - value, 0)`
///
/// The fixed clamp means `final + discount` can exceed the original price
/// when the rule's value is larger than the price.
pub fn apply_rule(original_price: Money, rule: &DiscountRule) -> AppliedDiscount {
    match rule.discount_type {
        DiscountType::Percentage => {
            let discount_amount = original_price.percentage(rule.basis_points());
            AppliedDiscount {
                original_price,
                final_price: original_price - discount_amount,
                discount_amount,
                discount_type: DiscountType::Percentage,
            }
        }
        DiscountType::Fixed => {
            let discount_amount = rule.amount();
            AppliedDiscount {
                original_price,
                final_price: (original_price - discount_amount).non_negative(),
                discount_amount,
                discount_type: DiscountType::Fixed,
            }
        }
    }
}

// =============================================================================
// Rule Set
// =============================================================================

/// An ordered, validated list of discount rules.
///
/// Order is significant: see [`evaluate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<DiscountRule>,
}

impl RuleSet {
    /// Builds a rule set, validating every rule.
    pub fn new(rules: Vec<DiscountRule>) -> CoreResult<Self> {
        for rule in &rules {
            validate_discount_rule(rule)?;
        }
        Ok(RuleSet { rules })
    }

    /// A rule set with no rules; nothing is ever discounted.
    pub fn empty() -> Self {
        RuleSet::default()
    }

    /// The storefront's active promotions.
    ///
    /// - 15% off every `BREAD` product
    /// - R$ 2,00 off the Espresso
    pub fn active() -> Self {
        RuleSet {
            rules: vec![
                DiscountRule::percentage(15.0, ApplyTo::categories([Category::Bread])),
                DiscountRule::fixed(Money::from_cents(200), ApplyTo::products([ESPRESSO_ID])),
            ],
        }
    }

    /// Parses a JSON array of rules.
    ///
    /// ## Errors
    /// - `UnsupportedDiscountType` when a rule's `"type"` is not
    ///   `percentage` or `fixed`
    /// - `Validation(InvalidFormat)` when the JSON is malformed
    /// - `Validation(..)` when a rule fails [`validate_discount_rule`]
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::{CoreError, RuleSet};
    ///
    /// let rules = RuleSet::from_json(
    ///     r#"[{"type":"fixed","value":200,"applyTo":{"categories":["COFFEE"]}}]"#,
    /// ).unwrap();
    /// assert_eq!(rules.len(), 1);
    ///
    /// let err = RuleSet::from_json(r#"[{"type":"bogo","value":1,"applyTo":{}}]"#).unwrap_err();
    /// assert!(matches!(err, CoreError::UnsupportedDiscountType(_)));
    /// ```
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let raw: Vec<Value> = serde_json::from_str(json).map_err(invalid_rules)?;

        let mut rules: Vec<DiscountRule> = Vec::with_capacity(raw.len());
        for value in raw {
            // Surface unknown types before serde folds them into a generic error
            if let Some(kind) = value.get("type").and_then(Value::as_str) {
                kind.parse::<DiscountType>()?;
            }
            rules.push(serde_json::from_value(value).map_err(invalid_rules)?);
        }

        RuleSet::new(rules)
    }

    /// Evaluates the rule set against a product.
    #[inline]
    pub fn evaluate(&self, product: &Product) -> Option<AppliedDiscount> {
        evaluate(product, &self.rules)
    }

    pub fn rules(&self) -> &[DiscountRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn invalid_rules(err: serde_json::Error) -> CoreError {
    ValidationError::InvalidFormat {
        field: "discount rules".to_string(),
        reason: err.to_string(),
    }
    .into()
}

// =============================================================================
// Unit Tests
// =============================================================================
