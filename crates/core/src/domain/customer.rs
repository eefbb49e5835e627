use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::region::RegionCluster;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub Uuid);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub region_cluster: RegionCluster,
    /// Segment-level preferential pricing (e.g. lab-to-lab accounts).
    pub special_discount_eligible: bool,
}

impl Customer {
    /// Anonymous prospect used when a calculation arrives without a
    /// customer id: priced at list, never discount-eligible.
    pub fn walk_in(region_cluster: RegionCluster) -> Self {
        Self {
            id: CustomerId(Uuid::nil()),
            name: "walk-in".to_string(),
            region_cluster,
            special_discount_eligible: false,
        }
    }
}
