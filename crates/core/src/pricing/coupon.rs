use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One quote line as the coupon calculator sees it. The baseline is the
/// cluster price for discount-eligible customers and the list price
/// otherwise; the caller picks it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponLine {
    pub quantity: u32,
    pub baseline_price: Decimal,
    pub offered_price: Decimal,
}

/// Discount-coupon amount for downstream e-commerce submission: the sum
/// of per-line price gaps, clamped at zero per line. Offering above the
/// baseline contributes nothing rather than a negative coupon.
pub fn coupon_value(lines: &[CouponLine]) -> Decimal {
    lines
        .iter()
        .map(|line| {
            let delta = line.baseline_price - line.offered_price;
            delta.max(Decimal::ZERO) * Decimal::from(line.quantity)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{coupon_value, CouponLine};

    fn line(quantity: u32, baseline: i64, offered: i64) -> CouponLine {
        CouponLine {
            quantity,
            baseline_price: Decimal::from(baseline),
            offered_price: Decimal::from(offered),
        }
    }

    #[test]
    fn sums_positive_gaps_scaled_by_quantity() {
        let value = coupon_value(&[line(2, 100, 90), line(3, 50, 45)]);
        assert_eq!(value, Decimal::from(35));
    }

    #[test]
    fn lines_offered_above_baseline_contribute_zero() {
        let value = coupon_value(&[line(1, 100, 120), line(2, 100, 95)]);
        assert_eq!(value, Decimal::from(10));
    }

    #[test]
    fn never_negative_regardless_of_input_signs() {
        let value = coupon_value(&[line(4, -10, 50), line(1, -20, -5)]);
        assert!(value >= Decimal::ZERO);
    }

    #[test]
    fn empty_quote_has_no_coupon() {
        assert_eq!(coupon_value(&[]), Decimal::ZERO);
    }
}
