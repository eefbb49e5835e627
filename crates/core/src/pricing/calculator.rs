use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::customer::Customer;
use crate::domain::product::Product;
use crate::pricing::authorization::{self, ApproverRole};
use crate::snapshot::ConfigSnapshot;

/// Per-unit costs evaluated at the offered price. Overhead components
/// scale with what the customer actually pays, not the nominal list
/// price, so deeper discounting also shrinks the overhead share.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub base_cost: Decimal,
    pub admin_cost: Decimal,
    pub logistics_cost: Decimal,
    pub tax_primary_cost: Decimal,
    pub tax_secondary_cost: Decimal,
    pub total_cost: Decimal,
}

/// One quote line, fully priced. Constructed fresh per call and never
/// cached by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarginCalculation {
    pub list_price: Decimal,
    pub cluster_price: Decimal,
    pub minimum_price: Decimal,
    pub offered_price: Decimal,
    pub quantity: u32,
    pub costs: CostBreakdown,
    /// `(offered - total_cost) * quantity`.
    pub margin_value: Decimal,
    /// Net margin over offered revenue; 0 when the offered price is
    /// non-positive.
    pub margin_percent: Decimal,
    pub gross_margin_percent: Decimal,
    pub technical_margin_percent: Decimal,
    pub is_authorized: bool,
    pub required_approver: Option<ApproverRole>,
    pub matched_rule: Option<String>,
    pub special_discount_applied: bool,
}

/// List price for the cluster: the explicit catalog column when
/// present, otherwise synthesized from base cost and the configured
/// default markup.
pub fn list_price(product: &Product, customer: &Customer, snapshot: &ConfigSnapshot) -> Decimal {
    let cluster = customer.region_cluster;
    product
        .list_price_for(cluster)
        .unwrap_or_else(|| product.base_cost * snapshot.engine().default_markup_for(cluster))
}

/// Cluster price: list price after the segment discount for eligible
/// customers, unchanged otherwise.
pub fn cluster_price(product: &Product, customer: &Customer, snapshot: &ConfigSnapshot) -> Decimal {
    let list = list_price(product, customer, snapshot);
    if customer.special_discount_eligible {
        let discount = snapshot.pricing().special_discount_percent / Decimal::ONE_HUNDRED;
        list * (Decimal::ONE - discount)
    } else {
        list
    }
}

fn costs_at(price: Decimal, base_cost: Decimal, snapshot: &ConfigSnapshot) -> CostBreakdown {
    let pricing = snapshot.pricing();
    let admin_cost = price * pricing.admin_percent / Decimal::ONE_HUNDRED;
    let logistics_cost = price * pricing.logistics_percent / Decimal::ONE_HUNDRED;
    let tax_primary_cost = price * pricing.tax_percent_primary / Decimal::ONE_HUNDRED;
    let tax_secondary_cost = price * pricing.tax_percent_secondary / Decimal::ONE_HUNDRED;

    CostBreakdown {
        base_cost,
        admin_cost,
        logistics_cost,
        tax_primary_cost,
        tax_secondary_cost,
        total_cost: base_cost + admin_cost + logistics_cost + tax_primary_cost + tax_secondary_cost,
    }
}

/// Net margin over revenue at `price`. Defined as 0 for non-positive
/// prices so the division never sees a zero or negative denominator.
pub fn net_margin_percent_at(
    price: Decimal,
    base_cost: Decimal,
    snapshot: &ConfigSnapshot,
) -> Decimal {
    if price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let costs = costs_at(price, base_cost, snapshot);
    (price - costs.total_cost) / price * Decimal::ONE_HUNDRED
}

/// Minimum-price heuristic: when the cluster price already carries more
/// margin than the configured target, give the excess back as headroom
/// below the cluster price; never raise the minimum above it. An
/// explicit catalog minimum always wins over the heuristic.
fn minimum_price(
    product: &Product,
    cluster_price: Decimal,
    cluster_margin_percent: Decimal,
    snapshot: &ConfigSnapshot,
) -> Decimal {
    if let Some(explicit) = product.minimum_price {
        return explicit;
    }

    let target = snapshot.engine().minimum_price_margin_target;
    if cluster_margin_percent > target {
        let excess = cluster_margin_percent - target;
        cluster_price * (Decimal::ONE - excess / Decimal::ONE_HUNDRED)
    } else {
        cluster_price
    }
}

/// Prices one quote line. Pure and infallible: configuration is already
/// validated by `ConfigSnapshot::new`, and degenerate offered prices
/// produce a defined zero-margin result rather than an error.
pub fn compute_item_margin(
    product: &Product,
    customer: &Customer,
    snapshot: &ConfigSnapshot,
    quantity: u32,
    offered_price: Decimal,
) -> MarginCalculation {
    let list = list_price(product, customer, snapshot);
    let cluster = cluster_price(product, customer, snapshot);
    let cluster_margin = net_margin_percent_at(cluster, product.base_cost, snapshot);
    let minimum = minimum_price(product, cluster, cluster_margin, snapshot);

    let costs = costs_at(offered_price, product.base_cost, snapshot);
    let margin_percent = if offered_price > Decimal::ZERO {
        (offered_price - costs.total_cost) / offered_price * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };
    let margin_value = (offered_price - costs.total_cost) * Decimal::from(quantity);

    let gross_margin_percent = if product.base_cost > Decimal::ZERO {
        (offered_price / product.base_cost - Decimal::ONE) * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };
    let technical_base = product.base_cost + costs.admin_cost + costs.logistics_cost;
    let technical_margin_percent = if technical_base > Decimal::ZERO {
        (offered_price / technical_base - Decimal::ONE) * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    let threshold = snapshot.engine().authorized_threshold;
    let verdict = if snapshot.has_rule_table() {
        authorization::resolve(margin_percent, snapshot.approval_rules(), threshold)
    } else {
        authorization::resolve_with_ladder(margin_percent, threshold)
    };

    MarginCalculation {
        list_price: list,
        cluster_price: cluster,
        minimum_price: minimum,
        offered_price,
        quantity,
        costs,
        margin_value,
        margin_percent,
        gross_margin_percent,
        technical_margin_percent,
        is_authorized: verdict.is_authorized,
        required_approver: verdict.required_approver,
        matched_rule: verdict.matched_rule,
        special_discount_applied: customer.special_discount_eligible,
    }
}
