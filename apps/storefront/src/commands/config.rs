//! # Config Commands
//!
//! Reports the configuration this run is using.

use serde::Serialize;
use tracing::debug;

use crate::state::AppConfig;
use storefront_core::{DiscountRule, RuleSet};

/// Effective configuration, including the discount rules in force.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    #[serde(flatten)]
    pub config: AppConfig,
    pub discount_rules: Vec<DiscountRule>,
}

/// Gets the current application configuration.
pub fn get_config(config: &AppConfig, rules: &RuleSet) -> ConfigResponse {
    debug!("get_config command");

    ConfigResponse {
        config: config.clone(),
        discount_rules: rules.rules().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_active_rules() {
        let response = get_config(&AppConfig::default(), &RuleSet::active());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["storeName"], "Storefront Bakery");
        assert_eq!(json["discountRules"][0]["type"], "percentage");
        assert_eq!(json["discountRules"][0]["value"], 15.0);
        assert_eq!(json["discountRules"][0]["applyTo"]["categories"][0], "BREAD");
        assert_eq!(json["discountRules"][1]["type"], "fixed");
    }
}
