use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::region::RegionCluster;
use crate::pricing::authorization::ApproverRole;

/// Per-region overhead percentages. All values are plain percentages in
/// `[0, 100)`; the four overhead components must sum below 100 or the
/// floor-price formula `base_cost / (1 - overhead/100)` stops being a
/// price.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub region: RegionCluster,
    pub admin_percent: Decimal,
    pub logistics_percent: Decimal,
    pub tax_percent_primary: Decimal,
    pub tax_percent_secondary: Decimal,
    pub special_discount_percent: Decimal,
}

impl PricingConfig {
    /// Last-resort defaults applied at the caller boundary when no
    /// persisted config exists for the region. Never merged fieldwise
    /// into a partially loaded config.
    pub fn fallback(region: RegionCluster) -> Self {
        Self {
            region,
            admin_percent: Decimal::from(3),
            logistics_percent: Decimal::from(4),
            tax_percent_primary: Decimal::from(12),
            tax_percent_secondary: Decimal::new(925, 2),
            special_discount_percent: Decimal::ONE,
        }
    }

    pub fn overhead_percent(&self) -> Decimal {
        self.admin_percent
            + self.logistics_percent
            + self.tax_percent_primary
            + self.tax_percent_secondary
    }

    fn validate(&self) -> Result<(), SnapshotError> {
        for (field, value) in [
            ("admin_percent", self.admin_percent),
            ("logistics_percent", self.logistics_percent),
            ("tax_percent_primary", self.tax_percent_primary),
            ("tax_percent_secondary", self.tax_percent_secondary),
            ("special_discount_percent", self.special_discount_percent),
        ] {
            if value < Decimal::ZERO || value >= Decimal::ONE_HUNDRED {
                return Err(SnapshotError::PercentOutOfRange {
                    field: field.to_string(),
                    value,
                });
            }
        }

        let overhead = self.overhead_percent();
        if overhead >= Decimal::ONE_HUNDRED {
            return Err(SnapshotError::OverheadExceedsRevenue { overhead });
        }

        Ok(())
    }
}

/// Margin semaphore bands, evaluated descending. Must be non-increasing;
/// a violated ordering is a configuration error, never silently fixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorThresholds {
    pub green: Decimal,
    pub yellow: Decimal,
    pub orange: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub default_markup_cluster_a: Decimal,
    pub default_markup_cluster_b: Decimal,
    pub color_thresholds: ColorThresholds,
    /// Net margin percent at/above which no human approval is needed.
    pub authorized_threshold: Decimal,
    /// Target margin preserved by the minimum-price heuristic.
    pub minimum_price_margin_target: Decimal,
}

impl EngineConfig {
    /// The documented last-resort engine configuration.
    pub fn fallback() -> Self {
        Self {
            default_markup_cluster_a: Decimal::new(15, 1),
            default_markup_cluster_b: Decimal::new(16, 1),
            color_thresholds: ColorThresholds {
                green: Decimal::from(10),
                yellow: Decimal::ZERO,
                orange: Decimal::from(-5),
            },
            authorized_threshold: Decimal::ZERO,
            minimum_price_margin_target: Decimal::ONE,
        }
    }

    pub fn default_markup_for(&self, cluster: RegionCluster) -> Decimal {
        match cluster {
            RegionCluster::ClusterA => self.default_markup_cluster_a,
            RegionCluster::ClusterB => self.default_markup_cluster_b,
        }
    }

    fn validate(&self) -> Result<(), SnapshotError> {
        for (field, value) in [
            ("default_markup_cluster_a", self.default_markup_cluster_a),
            ("default_markup_cluster_b", self.default_markup_cluster_b),
        ] {
            if value < Decimal::ONE {
                return Err(SnapshotError::MarkupBelowOne { field: field.to_string(), value });
            }
        }

        let ColorThresholds { green, yellow, orange } = self.color_thresholds;
        if green < yellow || yellow < orange {
            return Err(SnapshotError::ThresholdsNotDescending { green, yellow, orange });
        }

        Ok(())
    }
}

/// One band of the dynamic approval ladder: a half-open margin range
/// `[margin_min, margin_max)` mapped to the role that must sign off.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRule {
    pub name: String,
    pub margin_min: Option<Decimal>,
    pub margin_max: Option<Decimal>,
    pub approver_role: ApproverRole,
    pub is_active: bool,
}

impl ApprovalRule {
    pub fn contains(&self, margin_percent: Decimal) -> bool {
        let above_min = self.margin_min.map_or(true, |min| margin_percent >= min);
        let below_max = self.margin_max.map_or(true, |max| margin_percent < max);
        above_min && below_max
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("pricing config field `{field}` is out of range [0, 100): {value}")]
    PercentOutOfRange { field: String, value: Decimal },
    #[error("overhead percentages sum to {overhead}% which leaves no revenue share")]
    OverheadExceedsRevenue { overhead: Decimal },
    #[error("engine config `{field}` must be >= 1, got {value}")]
    MarkupBelowOne { field: String, value: Decimal },
    #[error("color thresholds must be non-increasing (green {green} >= yellow {yellow} >= orange {orange})")]
    ThresholdsNotDescending { green: Decimal, yellow: Decimal, orange: Decimal },
}

/// Immutable configuration read once per calculation. The engine never
/// fetches or caches configuration itself; the caller resolves
/// persisted-or-fallback configs, builds a snapshot, and passes it in.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigSnapshot {
    pricing: PricingConfig,
    engine: EngineConfig,
    approval_rules: Vec<ApprovalRule>,
}

impl ConfigSnapshot {
    /// Validates both configs and normalizes the rule table: inactive
    /// rules are dropped and the remainder sorted ascending by
    /// `margin_min` (missing min sorts first, as negative infinity).
    pub fn new(
        pricing: PricingConfig,
        engine: EngineConfig,
        approval_rules: Vec<ApprovalRule>,
    ) -> Result<Self, SnapshotError> {
        pricing.validate()?;
        engine.validate()?;

        let mut approval_rules: Vec<ApprovalRule> =
            approval_rules.into_iter().filter(|rule| rule.is_active).collect();
        approval_rules.sort_by(|left, right| match (left.margin_min, right.margin_min) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (Some(_), None) => std::cmp::Ordering::Greater,
            (Some(a), Some(b)) => a.cmp(&b),
        });

        Ok(Self { pricing, engine, approval_rules })
    }

    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    pub fn approval_rules(&self) -> &[ApprovalRule] {
        &self.approval_rules
    }

    pub fn has_rule_table(&self) -> bool {
        !self.approval_rules.is_empty()
    }
}
