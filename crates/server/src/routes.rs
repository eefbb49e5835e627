//! JSON API for the pricing engine.
//!
//! - `POST /api/v1/pricing/calculate` — price one line item; the acting
//!   user comes from the `x-actor` header (authentication itself happens
//!   upstream of this service).
//! - `GET  /health` — readiness payload with catalog counts.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use margo_core::audit::{AuditSink, PricingAuditRecord};
use margo_core::catalog::{ConfigStore, CustomerDirectory, LookupError, ProductCatalog};
use margo_core::domain::customer::Customer;
use margo_core::pricing::{MarginEngine, PricingRequest, PricingResponse};
use margo_core::snapshot::{ConfigSnapshot, EngineConfig, PricingConfig, SnapshotError};

use crate::health;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn ProductCatalog>,
    pub directory: Arc<dyn CustomerDirectory>,
    pub config_store: Arc<dyn ConfigStore>,
    pub engine: Arc<dyn MarginEngine>,
    pub audit: Arc<dyn AuditSink>,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Config(String),
}

impl From<LookupError> for ApiError {
    fn from(error: LookupError) -> Self {
        Self::NotFound(error.to_string())
    }
}

impl From<SnapshotError> for ApiError {
    fn from(error: SnapshotError) -> Self {
        Self::Config(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Config(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(ApiErrorBody { error: message })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/pricing/calculate", post(calculate))
        .route("/health", get(health::health))
        .with_state(state)
}

async fn calculate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<PricingRequest>,
) -> Result<Json<PricingResponse>, ApiError> {
    if request.quantity == 0 {
        return Err(ApiError::BadRequest("quantity must be greater than zero".to_string()));
    }

    let actor = headers
        .get("x-actor")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("anonymous")
        .to_string();

    let product = state.catalog.find_product(&request.product_id)?;
    let customer = match &request.customer_id {
        Some(customer_id) => state.directory.find_customer(customer_id)?,
        None => Customer::walk_in(request.destination_region),
    };

    // Configuration is read exactly once per calculation; the fallback
    // constants apply only when nothing is persisted.
    let pricing_config = state
        .config_store
        .pricing_config(customer.region_cluster)
        .unwrap_or_else(|| PricingConfig::fallback(customer.region_cluster));
    let engine_config = state.config_store.engine_config().unwrap_or_else(EngineConfig::fallback);
    let snapshot =
        ConfigSnapshot::new(pricing_config, engine_config, state.config_store.approval_rules())?;

    let response = state.engine.calculate(&product, &customer, &snapshot, &request);

    state.audit.emit(PricingAuditRecord::new(
        actor.clone(),
        request.product_id.clone(),
        request.customer_id,
        request.quantity,
        customer.region_cluster,
        response.margin_percent,
        response.offered_price,
    ));

    info!(
        event_name = "pricing.calculated",
        actor = %actor,
        product_id = %request.product_id.0,
        region = %customer.region_cluster,
        margin_percent = %response.margin_percent.round_dp(2),
        is_authorized = response.is_authorized,
        "pricing calculation served"
    );

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    use margo_core::audit::InMemoryAuditSink;
    use margo_core::catalog::InMemoryConfigStore;
    use margo_core::domain::region::RegionCluster;
    use margo_core::pricing::DeterministicMarginEngine;
    use margo_core::snapshot::PricingConfig;

    use crate::fixtures;
    use crate::routes::{router, AppState};

    fn test_state() -> (AppState, Arc<InMemoryAuditSink>) {
        let audit = Arc::new(InMemoryAuditSink::default());
        let mut state = fixtures::demo_state();
        state.audit = audit.clone();
        state.engine = Arc::new(DeterministicMarginEngine);
        (state, audit)
    }

    fn calculate_request(body: serde_json::Value, actor: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/v1/pricing/calculate")
            .header("content-type", "application/json");
        if let Some(actor) = actor {
            builder = builder.header("x-actor", actor);
        }
        builder.body(Body::from(body.to_string())).expect("request")
    }

    #[tokio::test]
    async fn calculate_returns_priced_response_and_audit_record() {
        let (state, audit) = test_state();
        let app = router(state);

        let response = app
            .oneshot(calculate_request(
                serde_json::json!({
                    "product_id": "prd-hemograma",
                    "customer_id": null,
                    "quantity": 2,
                    "destination_region": "cluster_a",
                    "offered_price": "150",
                }),
                Some("rep-ana"),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert!(payload.get("margin_percent").is_some());
        assert!(payload.get("costs").is_some());
        assert_eq!(payload["offered_price"], serde_json::json!("150"));

        let records = audit.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].actor, "rep-ana");
        assert_eq!(records[0].quantity, 2);
        assert_eq!(records[0].offered_price, Decimal::from(150));
    }

    #[tokio::test]
    async fn unknown_product_maps_to_not_found() {
        let (state, _audit) = test_state();
        let app = router(state);

        let response = app
            .oneshot(calculate_request(
                serde_json::json!({
                    "product_id": "prd-missing",
                    "customer_id": null,
                    "quantity": 1,
                    "destination_region": "cluster_a",
                    "offered_price": "100",
                }),
                None,
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert!(payload["error"].as_str().expect("error").contains("not found"));
    }

    #[tokio::test]
    async fn unknown_customer_maps_to_not_found() {
        let (state, audit) = test_state();
        let app = router(state);

        let response = app
            .oneshot(calculate_request(
                serde_json::json!({
                    "product_id": "prd-hemograma",
                    "customer_id": "00000000-0000-0000-0000-0000000000ff",
                    "quantity": 1,
                    "destination_region": "cluster_a",
                    "offered_price": "100",
                }),
                None,
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        let message = payload["error"].as_str().expect("error");
        assert!(message.contains("customer"));
        assert!(message.contains("not found"));
        assert!(audit.records().is_empty());
    }

    #[tokio::test]
    async fn invalid_persisted_config_maps_to_internal_error() {
        let (mut state, audit) = test_state();

        // Each component stays under 100% so only the overhead-sum
        // check at snapshot construction can reject it.
        let mut pricing = PricingConfig::fallback(RegionCluster::ClusterA);
        pricing.admin_percent = Decimal::from(60);
        pricing.logistics_percent = Decimal::from(30);
        pricing.tax_percent_primary = Decimal::from(15);
        pricing.tax_percent_secondary = Decimal::from(5);
        state.config_store =
            Arc::new(InMemoryConfigStore::new(vec![pricing], None, Vec::new()));
        let app = router(state);

        let response = app
            .oneshot(calculate_request(
                serde_json::json!({
                    "product_id": "prd-hemograma",
                    "customer_id": null,
                    "quantity": 1,
                    "destination_region": "cluster_a",
                    "offered_price": "100",
                }),
                None,
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert!(payload["error"].as_str().expect("error").contains("overhead"));
        assert!(audit.records().is_empty());
    }

    #[tokio::test]
    async fn zero_quantity_maps_to_bad_request() {
        let (state, audit) = test_state();
        let app = router(state);

        let response = app
            .oneshot(calculate_request(
                serde_json::json!({
                    "product_id": "prd-hemograma",
                    "customer_id": null,
                    "quantity": 0,
                    "destination_region": "cluster_a",
                    "offered_price": "100",
                }),
                None,
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(audit.records().is_empty());
    }

    #[tokio::test]
    async fn missing_offered_price_defaults_to_cluster_price() {
        let (state, _audit) = test_state();
        let app = router(state);

        let response = app
            .oneshot(calculate_request(
                serde_json::json!({
                    "product_id": "prd-hemograma",
                    "customer_id": null,
                    "quantity": 1,
                    "destination_region": "cluster_a",
                    "offered_price": null,
                }),
                None,
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(payload["offered_price"], payload["cluster_price"]);
    }

    #[tokio::test]
    async fn health_reports_catalog_counts() {
        let (state, _audit) = test_state();
        let app = router(state);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(payload["status"], "ready");
        assert!(payload["products"].as_u64().expect("products") > 0);
    }
}
