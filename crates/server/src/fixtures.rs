//! Seed data for running the server without a persistence backend.

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use margo_core::audit::InMemoryAuditSink;
use margo_core::catalog::{InMemoryCatalog, InMemoryConfigStore, InMemoryDirectory};
use margo_core::domain::customer::{Customer, CustomerId};
use margo_core::domain::product::{Product, ProductId};
use margo_core::domain::region::RegionCluster;
use margo_core::pricing::DeterministicMarginEngine;
use margo_core::snapshot::{EngineConfig, PricingConfig};

use crate::routes::AppState;

pub fn demo_state() -> AppState {
    let products = vec![
        Product {
            id: ProductId("prd-hemograma".to_string()),
            sku: "LAB-001".to_string(),
            name: "complete blood count panel".to_string(),
            base_cost: Decimal::from(100),
            list_price_cluster_a: Some(Decimal::from(200)),
            list_price_cluster_b: Some(Decimal::from(220)),
            minimum_price: None,
            promo_name: None,
            promo_discount_percent: None,
            active: true,
        },
        Product {
            id: ProductId("prd-lipidograma".to_string()),
            sku: "LAB-002".to_string(),
            name: "lipid profile panel".to_string(),
            base_cost: Decimal::from(60),
            list_price_cluster_a: None,
            list_price_cluster_b: None,
            minimum_price: Some(Decimal::from(80)),
            promo_name: Some("annual checkup campaign".to_string()),
            promo_discount_percent: Some(Decimal::from(5)),
            active: true,
        },
    ];

    let customers = vec![Customer {
        id: CustomerId(Uuid::from_u128(1)),
        name: "partner laboratory".to_string(),
        region_cluster: RegionCluster::ClusterA,
        special_discount_eligible: true,
    }];

    let config_store = InMemoryConfigStore::new(
        vec![
            PricingConfig::fallback(RegionCluster::ClusterA),
            PricingConfig::fallback(RegionCluster::ClusterB),
        ],
        Some(EngineConfig::fallback()),
        Vec::new(),
    );

    AppState {
        catalog: Arc::new(InMemoryCatalog::new(products)),
        directory: Arc::new(InMemoryDirectory::new(customers)),
        config_store: Arc::new(config_store),
        engine: Arc::new(DeterministicMarginEngine),
        audit: Arc::new(InMemoryAuditSink::default()),
    }
}
