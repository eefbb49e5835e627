use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::customer::CustomerId;
use crate::domain::product::ProductId;
use crate::domain::region::RegionCluster;

/// One compliance record per pricing calculation. The engine itself
/// never writes these; the caller builds one from the response and
/// hands it to a sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingAuditRecord {
    pub record_id: String,
    pub actor: String,
    pub product_id: ProductId,
    pub customer_id: Option<CustomerId>,
    pub quantity: u32,
    pub region: RegionCluster,
    pub margin_percent: Decimal,
    pub offered_price: Decimal,
    pub calculated_at: DateTime<Utc>,
}

impl PricingAuditRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        actor: impl Into<String>,
        product_id: ProductId,
        customer_id: Option<CustomerId>,
        quantity: u32,
        region: RegionCluster,
        margin_percent: Decimal,
        offered_price: Decimal,
    ) -> Self {
        Self {
            record_id: Uuid::new_v4().to_string(),
            actor: actor.into(),
            product_id,
            customer_id,
            quantity,
            region,
            margin_percent,
            offered_price,
            calculated_at: Utc::now(),
        }
    }
}

pub trait AuditSink: Send + Sync {
    fn emit(&self, record: PricingAuditRecord);
}

#[derive(Clone, Default)]
pub struct InMemoryAuditSink {
    records: Arc<Mutex<Vec<PricingAuditRecord>>>,
}

impl InMemoryAuditSink {
    pub fn records(&self) -> Vec<PricingAuditRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AuditSink for InMemoryAuditSink {
    fn emit(&self, record: PricingAuditRecord) {
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::domain::customer::CustomerId;
    use crate::domain::product::ProductId;
    use crate::domain::region::RegionCluster;

    use super::{AuditSink, InMemoryAuditSink, PricingAuditRecord};

    #[test]
    fn in_memory_sink_records_calculations_with_actor_and_margin() {
        let sink = InMemoryAuditSink::default();
        sink.emit(PricingAuditRecord::new(
            "rep-ana",
            ProductId("prd-1".to_string()),
            Some(CustomerId(Uuid::nil())),
            3,
            RegionCluster::ClusterA,
            Decimal::new(408, 2),
            Decimal::from(150),
        ));

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].actor, "rep-ana");
        assert_eq!(records[0].quantity, 3);
        assert_eq!(records[0].margin_percent, Decimal::new(408, 2));
        assert!(!records[0].record_id.is_empty());
    }
}
