pub mod audit;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod pricing;
pub mod snapshot;

pub use audit::{AuditSink, InMemoryAuditSink, PricingAuditRecord};
pub use catalog::{
    ConfigStore, CustomerDirectory, InMemoryCatalog, InMemoryConfigStore, InMemoryDirectory,
    LookupError, ProductCatalog,
};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::customer::{Customer, CustomerId};
pub use domain::product::{Product, ProductId};
pub use domain::region::RegionCluster;
pub use pricing::aggregate::{aggregate, QuoteSummary};
pub use pricing::authorization::{ApproverRole, AuthorizationVerdict};
pub use pricing::calculator::{compute_item_margin, CostBreakdown, MarginCalculation};
pub use pricing::color::{classify, MarginColor};
pub use pricing::coupon::{coupon_value, CouponLine};
pub use pricing::{
    calculate_pricing, DeterministicMarginEngine, MarginEngine, PricingRequest, PricingResponse,
};
pub use snapshot::{
    ApprovalRule, ColorThresholds, ConfigSnapshot, EngineConfig, PricingConfig, SnapshotError,
};
