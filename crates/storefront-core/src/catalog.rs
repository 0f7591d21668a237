//! # Catalog
//!
//! The storefront's product list. Read-only reference data, created at build
//! time and served by the product-listing command.

use std::collections::HashSet;

use crate::error::{CoreResult, ValidationError};
use crate::types::{Category, Product};
use crate::validation::validate_product;

/// Id of the Espresso, which carries its own fixed discount.
pub const ESPRESSO_ID: &str = "550e8400-e29b-41d4-a716-446655440004";

/// An ordered collection of products, unique by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Builds a catalog, validating every product and rejecting duplicate ids.
    pub fn new(products: Vec<Product>) -> CoreResult<Self> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            validate_product(product)?;
            if !seen.insert(product.id.as_str()) {
                return Err(ValidationError::Duplicate {
                    field: "product id".to_string(),
                    value: product.id.clone(),
                }
                .into());
            }
        }
        Ok(Catalog { products })
    }

    /// The bakery's built-in product list.
    pub fn builtin() -> Self {
        let products = BUILTIN
            .iter()
            .map(|&(id, name, description, price_cents, category, image)| Product {
                id: id.to_string(),
                name: name.to_string(),
                price_cents,
                category,
                image: image.to_string(),
                description: description.to_string(),
            })
            .collect();

        Catalog { products }
    }

    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(move |p| p.category == category)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::builtin()
    }
}

// (id, name, description, price in centavos, category, image)
const BUILTIN: &[(&str, &str, &str, i64, Category, &str)] = &[
    (
        "550e8400-e29b-41d4-a716-446655440000",
        "White Flour Bread",
        "Fresh bread made with white flour, ideal for accompanying meals or making sandwiches.",
        490,
        Category::Bread,
        "/images/white-flour-bread.webp",
    ),
    (
        "550e8400-e29b-41d4-a716-446655440001",
        "Whole Wheat Bread",
        "Healthy and tasty bread, made with whole wheat flour for a rustic touch.",
        590,
        Category::Bread,
        "/images/wholemeal-bread.webp",
    ),
    (
        "550e8400-e29b-41d4-a716-446655440002",
        "Spelt Flour Bread",
        "Made with spelt flour, this bread offers a light flavor and unique texture.",
        690,
        Category::Bread,
        "/images/spelled-flour-bread.webp",
    ),
    (
        "550e8400-e29b-41d4-a716-446655440003",
        "Assorted Breads and Rolls",
        "A variety of fresh breads and rolls, ideal for gatherings and celebrations.",
        800,
        Category::Bread,
        "/images/breads-rolls.webp",
    ),
    (
        ESPRESSO_ID,
        "Espresso",
        "Classic espresso, perfect for a quick boost or to accompany a dessert.",
        350,
        Category::Coffee,
        "/images/espresso.webp",
    ),
    (
        "550e8400-e29b-41d4-a716-446655440005",
        "Cappuccino",
        "Creamy coffee with steamed milk and foam, perfect to start the day.",
        400,
        Category::Coffee,
        "/images/cappuccino.webp",
    ),
    (
        "550e8400-e29b-41d4-a716-446655440006",
        "Chocolate Chip Cookies",
        "Delicious, crispy cookies with generous chocolate chunks.",
        250,
        Category::Cookies,
        "/images/chocolate-chip-cookies.webp",
    ),
    (
        "550e8400-e29b-41d4-a716-446655440007",
        "Macarons",
        "Delicate French macarons, available in a variety of flavors and colors.",
        500,
        Category::Cookies,
        "/images/macarons.webp",
    ),
    (
        "550e8400-e29b-41d4-a716-446655440008",
        "Custom Cake",
        "Customized cake for birthdays and special celebrations, decorated to your preference.",
        10000,
        Category::Others,
        "/images/custom-cake.webp",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let builtin = Catalog::builtin();
        assert_eq!(builtin.len(), 9);

        // Re-running through the validating constructor must accept it
        let validated = Catalog::new(builtin.all().to_vec()).unwrap();
        assert_eq!(validated, builtin);
    }

    #[test]
    fn test_get_and_by_category() {
        let catalog = Catalog::builtin();

        let espresso = catalog.get(ESPRESSO_ID).unwrap();
        assert_eq!(espresso.name, "Espresso");
        assert_eq!(espresso.price_cents, 350);

        assert_eq!(catalog.by_category(Category::Bread).count(), 4);
        assert_eq!(catalog.by_category(Category::Others).count(), 1);
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let espresso = Catalog::builtin().get(ESPRESSO_ID).unwrap().clone();
        let err = Catalog::new(vec![espresso.clone(), espresso]).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
