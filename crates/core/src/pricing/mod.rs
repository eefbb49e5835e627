pub mod aggregate;
pub mod authorization;
pub mod calculator;
pub mod color;
pub mod coupon;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::customer::{Customer, CustomerId};
use crate::domain::product::{Product, ProductId};
use crate::domain::region::RegionCluster;
use crate::snapshot::ConfigSnapshot;

use self::authorization::ApproverRole;
use self::calculator::{compute_item_margin, CostBreakdown};
use self::color::MarginColor;

/// One pricing question, as asked by both the interactive client and
/// the server-side enforcement boundary. The same request must produce
/// bit-identical answers on either path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    pub product_id: ProductId,
    pub customer_id: Option<CustomerId>,
    pub quantity: u32,
    pub destination_region: RegionCluster,
    /// Defaults to the computed cluster price when omitted.
    pub offered_price: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingResponse {
    pub list_price: Decimal,
    pub cluster_price: Decimal,
    pub minimum_price: Decimal,
    pub offered_price: Decimal,
    pub quantity: u32,
    pub costs: CostBreakdown,
    pub margin_value: Decimal,
    pub margin_percent: Decimal,
    pub gross_margin_percent: Decimal,
    pub technical_margin_percent: Decimal,
    pub margin_color: MarginColor,
    pub is_authorized: bool,
    pub requires_approval: bool,
    pub approver_role: Option<ApproverRole>,
    pub matched_rule: Option<String>,
    pub alerts: Vec<String>,
}

/// Seam for callers that want to stub pricing in tests. The engine is
/// pure; implementations must not hide I/O behind it.
pub trait MarginEngine: Send + Sync {
    fn calculate(
        &self,
        product: &Product,
        customer: &Customer,
        snapshot: &ConfigSnapshot,
        request: &PricingRequest,
    ) -> PricingResponse;
}

#[derive(Default)]
pub struct DeterministicMarginEngine;

impl MarginEngine for DeterministicMarginEngine {
    fn calculate(
        &self,
        product: &Product,
        customer: &Customer,
        snapshot: &ConfigSnapshot,
        request: &PricingRequest,
    ) -> PricingResponse {
        calculate_pricing(product, customer, snapshot, request)
    }
}

/// Facade over the calculator: resolves the offered-price default,
/// classifies the margin color and renders the alert list.
pub fn calculate_pricing(
    product: &Product,
    customer: &Customer,
    snapshot: &ConfigSnapshot,
    request: &PricingRequest,
) -> PricingResponse {
    let offered_price = request
        .offered_price
        .unwrap_or_else(|| calculator::cluster_price(product, customer, snapshot));

    let calc = compute_item_margin(product, customer, snapshot, request.quantity, offered_price);
    let margin_color = color::classify(calc.margin_percent, &snapshot.engine().color_thresholds);

    let mut alerts = Vec::new();
    if !calc.is_authorized {
        alerts.push(format!(
            "margin {}% is below the authorized limit of {}%",
            calc.margin_percent.round_dp(2),
            snapshot.engine().authorized_threshold,
        ));
        if let Some(role) = calc.required_approver {
            alerts.push(format!("approval required from {role}"));
        }
    }
    if calc.offered_price < calc.minimum_price {
        alerts.push(format!(
            "offered price {} is below the computed minimum of {}",
            calc.offered_price,
            calc.minimum_price.round_dp(2),
        ));
    }
    if calc.special_discount_applied {
        alerts.push(format!(
            "special discount of {}% applied",
            snapshot.pricing().special_discount_percent,
        ));
    }
    if product.has_active_promo() {
        let pct = product.promo_discount_percent.unwrap_or(Decimal::ZERO);
        let name = product.promo_name.as_deref().unwrap_or("promotion");
        alerts.push(format!("active promotional discount: {name} ({pct}% off)"));
    }

    PricingResponse {
        list_price: calc.list_price,
        cluster_price: calc.cluster_price,
        minimum_price: calc.minimum_price,
        offered_price: calc.offered_price,
        quantity: calc.quantity,
        costs: calc.costs,
        margin_value: calc.margin_value,
        margin_percent: calc.margin_percent,
        gross_margin_percent: calc.gross_margin_percent,
        technical_margin_percent: calc.technical_margin_percent,
        margin_color,
        is_authorized: calc.is_authorized,
        requires_approval: !calc.is_authorized,
        approver_role: calc.required_approver,
        matched_rule: calc.matched_rule,
        alerts,
    }
}
