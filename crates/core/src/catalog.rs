use std::collections::HashMap;

use thiserror::Error;

use crate::domain::customer::{Customer, CustomerId};
use crate::domain::product::{Product, ProductId};
use crate::domain::region::RegionCluster;
use crate::snapshot::{ApprovalRule, EngineConfig, PricingConfig};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("product `{0}` not found")]
    ProductNotFound(String),
    #[error("customer `{0}` not found")]
    CustomerNotFound(String),
}

/// Read-only product lookup. Unknown or inactive products fail here,
/// before the engine ever runs.
pub trait ProductCatalog: Send + Sync {
    fn find_product(&self, product_id: &ProductId) -> Result<Product, LookupError>;
    fn product_count(&self) -> usize;
}

pub trait CustomerDirectory: Send + Sync {
    fn find_customer(&self, customer_id: &CustomerId) -> Result<Customer, LookupError>;
    fn customer_count(&self) -> usize;
}

/// Configuration lookup. `None` means nothing persisted; the caller
/// substitutes the documented fallback, never this store.
pub trait ConfigStore: Send + Sync {
    fn pricing_config(&self, region: RegionCluster) -> Option<PricingConfig>;
    fn engine_config(&self) -> Option<EngineConfig>;
    fn approval_rules(&self) -> Vec<ApprovalRule>;
}

#[derive(Default)]
pub struct InMemoryCatalog {
    products: HashMap<ProductId, Product>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products: products.into_iter().map(|p| (p.id.clone(), p)).collect() }
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn find_product(&self, product_id: &ProductId) -> Result<Product, LookupError> {
        self.products
            .get(product_id)
            .filter(|product| product.active)
            .cloned()
            .ok_or_else(|| LookupError::ProductNotFound(product_id.0.clone()))
    }

    fn product_count(&self) -> usize {
        self.products.len()
    }
}

#[derive(Default)]
pub struct InMemoryDirectory {
    customers: HashMap<CustomerId, Customer>,
}

impl InMemoryDirectory {
    pub fn new(customers: Vec<Customer>) -> Self {
        Self { customers: customers.into_iter().map(|c| (c.id, c)).collect() }
    }
}

impl CustomerDirectory for InMemoryDirectory {
    fn find_customer(&self, customer_id: &CustomerId) -> Result<Customer, LookupError> {
        self.customers
            .get(customer_id)
            .cloned()
            .ok_or_else(|| LookupError::CustomerNotFound(customer_id.0.to_string()))
    }

    fn customer_count(&self) -> usize {
        self.customers.len()
    }
}

#[derive(Default)]
pub struct InMemoryConfigStore {
    pricing: HashMap<RegionCluster, PricingConfig>,
    engine: Option<EngineConfig>,
    rules: Vec<ApprovalRule>,
}

impl InMemoryConfigStore {
    pub fn new(
        pricing: Vec<PricingConfig>,
        engine: Option<EngineConfig>,
        rules: Vec<ApprovalRule>,
    ) -> Self {
        Self {
            pricing: pricing.into_iter().map(|config| (config.region, config)).collect(),
            engine,
            rules,
        }
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn pricing_config(&self, region: RegionCluster) -> Option<PricingConfig> {
        self.pricing.get(&region).cloned()
    }

    fn engine_config(&self) -> Option<EngineConfig> {
        self.engine.clone()
    }

    fn approval_rules(&self) -> Vec<ApprovalRule> {
        self.rules.clone()
    }
}
