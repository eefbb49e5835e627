use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::authorization::ApproverRole;
use crate::pricing::calculator::MarginCalculation;
use crate::pricing::coupon::{self, CouponLine};

/// Quote-level rollup. The quote margin is recomputed from aggregate
/// revenue and aggregate cost, never averaged across items, and the
/// approver requirement comes from the single worst-performing line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub subtotal: Decimal,
    pub total_offered: Decimal,
    pub total_discount: Decimal,
    pub total_margin_value: Decimal,
    pub total_margin_percent: Decimal,
    pub coupon_value: Decimal,
    pub is_authorized: bool,
    pub requires_approval: bool,
    pub required_approver: Option<ApproverRole>,
    pub items_count: usize,
    pub authorized_count: usize,
    pub unauthorized_count: usize,
}

impl QuoteSummary {
    fn empty() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            total_offered: Decimal::ZERO,
            total_discount: Decimal::ZERO,
            total_margin_value: Decimal::ZERO,
            total_margin_percent: Decimal::ZERO,
            coupon_value: Decimal::ZERO,
            is_authorized: true,
            requires_approval: false,
            required_approver: None,
            items_count: 0,
            authorized_count: 0,
            unauthorized_count: 0,
        }
    }
}

/// Folds priced lines into a quote summary. A quote is only as
/// authorized as its weakest line: the item with the lowest net margin
/// decides the quote-level verdict and approver, even when every other
/// line clears the threshold. Each line already carries its resolved
/// verdict (including rule carve-outs that re-authorize a band below
/// the global threshold), so the worst line's verdict is taken as-is.
/// An empty quote is trivially authorized.
pub fn aggregate(items: &[MarginCalculation]) -> QuoteSummary {
    let Some(first) = items.first() else {
        return QuoteSummary::empty();
    };

    let mut subtotal = Decimal::ZERO;
    let mut total_offered = Decimal::ZERO;
    let mut total_cost = Decimal::ZERO;
    let mut total_margin_value = Decimal::ZERO;
    let mut authorized_count = 0usize;
    let mut worst = first;
    let mut coupon_lines = Vec::with_capacity(items.len());

    for item in items {
        let qty = Decimal::from(item.quantity);
        subtotal += item.list_price * qty;
        total_offered += item.offered_price * qty;
        total_cost += item.costs.total_cost * qty;
        total_margin_value += item.margin_value;
        if item.is_authorized {
            authorized_count += 1;
        }
        if item.margin_percent < worst.margin_percent {
            worst = item;
        }
        coupon_lines.push(CouponLine {
            quantity: item.quantity,
            baseline_price: item.cluster_price,
            offered_price: item.offered_price,
        });
    }

    let total_margin_percent = if total_offered > Decimal::ZERO {
        (total_offered - total_cost) / total_offered * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    let is_authorized = worst.is_authorized;

    QuoteSummary {
        subtotal,
        total_offered,
        total_discount: subtotal - total_offered,
        total_margin_value,
        total_margin_percent,
        coupon_value: coupon::coupon_value(&coupon_lines),
        is_authorized,
        requires_approval: !is_authorized,
        required_approver: if is_authorized { None } else { worst.required_approver },
        items_count: items.len(),
        authorized_count,
        unauthorized_count: items.len() - authorized_count,
    }
}
