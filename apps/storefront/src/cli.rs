//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use storefront_core::Category;

/// Storefront - bakery catalog, discounted cart and contact form.
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List products with the discount each would get
    Catalog(CatalogArgs),

    /// Show one product
    Product {
        /// Product id
        id: String,
    },

    /// Inspect or change the persisted cart
    #[command(subcommand)]
    Cart(CartCommand),

    /// Submit the contact form
    Contact(ContactArgs),

    /// List stored contact messages, newest first
    Contacts {
        /// Maximum number of messages
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Check whether a request path may proceed
    Gate(GateArgs),

    /// Print the cookie that ends a session
    Logout,

    /// Show the effective configuration
    Config,
}

/// Subcommands for `storefront cart`
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    /// Show the cart and its totals
    Show,
    /// Add a product (merges with an existing line)
    Add {
        /// Product id
        id: String,
        /// Units to add
        #[arg(short, long)]
        quantity: Option<i64>,
    },
    /// Remove a product line
    Remove {
        /// Product id
        id: String,
    },
    /// Add one unit of a product in the cart
    Increase {
        /// Product id
        id: String,
    },
    /// Remove one unit of a product in the cart
    Decrease {
        /// Product id
        id: String,
    },
    /// Empty the cart
    Clear,
}

/// Arguments for the `catalog` subcommand.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct CatalogArgs {
    /// Only this category (bread, coffee, cookies, others)
    #[arg(short, long, value_parser = parse_category)]
    pub category: Option<Category>,
}

/// Arguments for the `contact` subcommand.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct ContactArgs {
    /// Reply address
    #[arg(long)]
    pub email: String,

    /// Subject line
    #[arg(long)]
    pub subject: String,

    /// Message body
    #[arg(long)]
    pub message: String,
}

/// Arguments for the `gate` subcommand.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct GateArgs {
    /// Request path, e.g. /admin/orders
    pub path: String,

    /// Value of the session cookie, if any
    #[arg(long)]
    pub session: Option<String>,
}

fn parse_category(value: &str) -> Result<Category, String> {
    Category::ALL
        .iter()
        .copied()
        .find(|c| c.as_str().eq_ignore_ascii_case(value))
        .ok_or_else(|| {
            let names: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
            format!("unknown category '{}' (expected one of {})", value, names.join(", "))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cart_add() {
        let cli = Cli::try_parse_from(["storefront", "cart", "add", "abc", "--quantity", "3"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Cart(CartCommand::Add {
                id: "abc".to_string(),
                quantity: Some(3),
            })
        );
    }

    #[test]
    fn test_parse_category_case_insensitive() {
        let cli = Cli::try_parse_from(["storefront", "catalog", "--category", "bread"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Catalog(CatalogArgs {
                category: Some(Category::Bread)
            })
        );

        assert!(Cli::try_parse_from(["storefront", "catalog", "-c", "pizza"]).is_err());
    }

    #[test]
    fn test_parse_gate() {
        let cli = Cli::try_parse_from(["storefront", "gate", "/admin", "--session", "s1"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Gate(GateArgs {
                path: "/admin".to_string(),
                session: Some("s1".to_string()),
            })
        );
    }
}
