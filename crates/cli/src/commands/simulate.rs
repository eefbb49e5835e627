use rust_decimal::Decimal;

use margo_core::domain::customer::Customer;
use margo_core::domain::product::{Product, ProductId};
use margo_core::domain::region::RegionCluster;
use margo_core::pricing::{self, PricingRequest};
use margo_core::snapshot::{ConfigSnapshot, EngineConfig, PricingConfig};

use super::CommandResult;

/// Prices an ad-hoc line item against the documented fallback
/// configuration. Useful for sanity-checking a deal without the server
/// or any catalog data.
pub fn run(
    base_cost: &str,
    offered_price: &str,
    region: &str,
    quantity: u32,
    special_discount: bool,
) -> CommandResult {
    let base_cost: Decimal = match base_cost.parse() {
        Ok(value) => value,
        Err(_) => {
            return CommandResult::failure(
                "simulate",
                "invalid_argument",
                format!("--base-cost must be a decimal number, got `{base_cost}`"),
                2,
            )
        }
    };
    let offered_price: Decimal = match offered_price.parse() {
        Ok(value) => value,
        Err(_) => {
            return CommandResult::failure(
                "simulate",
                "invalid_argument",
                format!("--offered-price must be a decimal number, got `{offered_price}`"),
                2,
            )
        }
    };
    let region: RegionCluster = match region.parse() {
        Ok(value) => value,
        Err(message) => {
            return CommandResult::failure("simulate", "invalid_argument", message, 2)
        }
    };
    if quantity == 0 {
        return CommandResult::failure(
            "simulate",
            "invalid_argument",
            "--quantity must be greater than zero",
            2,
        );
    }

    let snapshot = match ConfigSnapshot::new(
        PricingConfig::fallback(region),
        EngineConfig::fallback(),
        Vec::new(),
    ) {
        Ok(snapshot) => snapshot,
        Err(error) => {
            return CommandResult::failure("simulate", "configuration", error.to_string(), 1)
        }
    };

    let product = Product {
        id: ProductId("simulated".to_string()),
        sku: "SIM".to_string(),
        name: "simulated item".to_string(),
        base_cost,
        list_price_cluster_a: None,
        list_price_cluster_b: None,
        minimum_price: None,
        promo_name: None,
        promo_discount_percent: None,
        active: true,
    };
    let mut customer = Customer::walk_in(region);
    customer.special_discount_eligible = special_discount;

    let request = PricingRequest {
        product_id: product.id.clone(),
        customer_id: None,
        quantity,
        destination_region: region,
        offered_price: Some(offered_price),
    };
    let response = pricing::calculate_pricing(&product, &customer, &snapshot, &request);

    let output = serde_json::to_string_pretty(&response)
        .unwrap_or_else(|error| format!("{{\"error\":\"{error}\"}}"));
    CommandResult { exit_code: 0, output }
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn simulate_prints_the_full_pricing_response() {
        let result = run("100", "150", "cluster_a", 1, false);
        assert_eq!(result.exit_code, 0);

        let payload: serde_json::Value =
            serde_json::from_str(&result.output).expect("valid json");
        assert_eq!(payload["offered_price"], serde_json::json!("150"));
        assert!(payload.get("margin_percent").is_some());
        assert!(payload.get("gross_margin_percent").is_some());
        assert!(payload.get("technical_margin_percent").is_some());
        assert!(payload.get("margin_color").is_some());
    }

    #[test]
    fn simulate_rejects_a_malformed_cost() {
        let result = run("not-a-number", "150", "cluster_a", 1, false);
        assert_eq!(result.exit_code, 2);
        assert!(result.output.contains("invalid_argument"));
    }

    #[test]
    fn simulate_rejects_an_unknown_region() {
        let result = run("100", "150", "cluster_c", 1, false);
        assert_eq!(result.exit_code, 2);
    }

    #[test]
    fn simulate_rejects_zero_quantity() {
        let result = run("100", "150", "cluster_a", 0, false);
        assert_eq!(result.exit_code, 2);
    }

    #[test]
    fn special_discount_flag_shrinks_the_cluster_price() {
        let plain = run("100", "150", "cluster_a", 1, false);
        let discounted = run("100", "150", "cluster_a", 1, true);

        let plain: serde_json::Value = serde_json::from_str(&plain.output).expect("json");
        let discounted: serde_json::Value =
            serde_json::from_str(&discounted.output).expect("json");
        assert_ne!(plain["cluster_price"], discounted["cluster_price"]);
    }
}
