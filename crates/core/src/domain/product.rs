use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::region::RegionCluster;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

/// Immutable catalog reference data. `list_price_*` columns are optional;
/// when absent the engine synthesizes a list price from `base_cost` and
/// the configured default markup for the cluster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub base_cost: Decimal,
    pub list_price_cluster_a: Option<Decimal>,
    pub list_price_cluster_b: Option<Decimal>,
    pub minimum_price: Option<Decimal>,
    pub promo_name: Option<String>,
    pub promo_discount_percent: Option<Decimal>,
    pub active: bool,
}

impl Product {
    pub fn list_price_for(&self, cluster: RegionCluster) -> Option<Decimal> {
        match cluster {
            RegionCluster::ClusterA => self.list_price_cluster_a,
            RegionCluster::ClusterB => self.list_price_cluster_b,
        }
    }

    pub fn has_active_promo(&self) -> bool {
        self.promo_discount_percent.map(|pct| pct > Decimal::ZERO).unwrap_or(false)
    }
}
