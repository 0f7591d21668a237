//! # Catalog Commands
//!
//! Product listing, with the discount each product would get if added to
//! the cart right now.
//!
//! ```text
//! list_products(catalog, rules, category?)
//!       │
//!       ▼
//! for each product ──► rules.evaluate(product) ──► ProductDto
//!                                                  { ...product,
//!                                                    priceDisplay,
//!                                                    finalPriceCents,
//!                                                    discount? }
//! ```

use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use storefront_core::{AppliedDiscount, Catalog, Category, Product, RuleSet};

/// Product DTO for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    #[serde(flatten)]
    pub product: Product,

    /// Formatted list price, e.g. `R$ 4,90`
    pub price_display: String,

    /// Price after the discount that would apply today
    pub final_price_cents: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<AppliedDiscount>,
}

impl ProductDto {
    fn build(product: &Product, rules: &RuleSet) -> Self {
        let discount = rules.evaluate(product);
        ProductDto {
            product: product.clone(),
            price_display: product.price().to_string(),
            final_price_cents: discount
                .map(|d| d.final_price)
                .unwrap_or_else(|| product.price())
                .cents(),
            discount,
        }
    }
}

/// Lists the catalog, optionally narrowed to one category.
pub fn list_products(
    catalog: &Catalog,
    rules: &RuleSet,
    category: Option<Category>,
) -> Vec<ProductDto> {
    debug!(?category, "list_products command");

    catalog
        .all()
        .iter()
        .filter(|p| category.map_or(true, |c| p.category == c))
        .map(|p| ProductDto::build(p, rules))
        .collect()
}

/// Gets a single product by id.
pub fn get_product(catalog: &Catalog, rules: &RuleSet, id: &str) -> Result<ProductDto, ApiError> {
    debug!(id = %id, "get_product command");

    catalog
        .get(id)
        .map(|p| ProductDto::build(p, rules))
        .ok_or_else(|| ApiError::not_found("Product", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use storefront_core::catalog::ESPRESSO_ID;

    #[test]
    fn test_list_annotates_discounts() {
        let products = list_products(&Catalog::builtin(), &RuleSet::active(), None);
        assert_eq!(products.len(), 9);

        let espresso = products.iter().find(|p| p.product.id == ESPRESSO_ID).unwrap();
        assert_eq!(espresso.final_price_cents, 150);
        assert_eq!(espresso.price_display, "R$ 3,50");

        let cake = products.iter().find(|p| p.product.category == Category::Others).unwrap();
        assert!(cake.discount.is_none());
        assert_eq!(cake.final_price_cents, cake.product.price_cents);
    }

    #[test]
    fn test_filter_by_category() {
        let breads = list_products(&Catalog::builtin(), &RuleSet::active(), Some(Category::Bread));
        assert_eq!(breads.len(), 4);
        assert!(breads.iter().all(|p| p.discount.is_some()));
    }

    #[test]
    fn test_dto_json_is_flat() {
        let dto = get_product(&Catalog::builtin(), &RuleSet::empty(), ESPRESSO_ID).unwrap();
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["id"], ESPRESSO_ID);
        assert_eq!(json["price"], 350);
        assert_eq!(json["category"], "COFFEE");
        assert!(json.get("discount").is_none());
    }

    #[test]
    fn test_unknown_product() {
        let err = get_product(&Catalog::builtin(), &RuleSet::active(), "nope").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
