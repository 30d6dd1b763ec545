//! HTTP handlers for the compare bar and compare page.

use axum::{extract::State, http::StatusCode, response::{IntoResponse, Response}, routing::{get, post}, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};
use validator::Validate;

use crate::catalog::CatalogAccessor;
use crate::config::CompareConfig;
use crate::domain::aggregates::{ComparisonMatrix, ListSnapshot, MatrixRow, ProductSnapshot};
use crate::domain::value_objects::ProductId;
use crate::services::{ListManager, MatrixBuilder};
use crate::storage::CookieListStore;
use crate::CompareError;

#[derive(Clone)]
pub struct AppState { pub builder: MatrixBuilder, pub config: Arc<CompareConfig> }

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogAccessor>, config: CompareConfig) -> Self {
        let config = Arc::new(config);
        Self { builder: MatrixBuilder::new(catalog, config.clone()), config }
    }

    fn list_manager(&self, jar: CookieJar) -> ListManager<'_, CookieListStore> {
        ListManager::new(CookieListStore::new(jar, self.config.cookie_path.clone()), &self.config)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(json!({"status": "healthy", "service": "neogen-compare"})) }))
        .route("/api/v1/compare", get(get_compare))
        .route("/api/v1/compare/add", post(add_to_compare))
        .route("/api/v1/compare/remove", post(remove_from_compare))
        .route("/api/v1/compare/clear", post(clear_compare))
        .route("/api/v1/compare/matrix", get(get_matrix))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize, Validate)] pub struct ProductRequest { #[validate(range(min = 1))] pub product_id: u64 }

/// Compact product summary for the floating compare bar
#[derive(Debug, Serialize)]
pub struct BarProduct { pub id: ProductId, pub name: String, pub image: Option<String>, pub price: String, pub url: String }

impl From<ProductSnapshot> for BarProduct {
    fn from(p: ProductSnapshot) -> Self { Self { id: p.id, name: p.name, image: p.image, price: p.price_html, url: p.url } }
}

#[derive(Debug, Serialize)] pub struct CompareResponse { pub count: usize, pub ids: Vec<ProductId>, pub products: Vec<BarProduct> }

#[derive(Debug, Serialize)]
pub struct MatrixResponse {
    #[serde(flatten)] pub matrix: ComparisonMatrix,
    pub rows: Vec<MatrixRow>,
    pub can_add_more: bool,
    pub is_empty: bool,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Compare(#[from] CompareError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ApiError::Compare(CompareError::CapacityExceeded { .. }) => (StatusCode::CONFLICT, Json(json!({"error": message, "kind": "capacity_exceeded", "max_reached": true}))),
            ApiError::Compare(CompareError::InvalidProduct) => (StatusCode::BAD_REQUEST, Json(json!({"error": message, "kind": "invalid_product"}))),
            ApiError::Compare(CompareError::CatalogUnavailable(_)) => (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": message, "kind": "catalog_unavailable"}))),
        }.into_response()
    }
}

fn product_id(r: &ProductRequest) -> Result<ProductId, ApiError> {
    if r.validate().is_err() { return Err(CompareError::InvalidProduct.into()); }
    Ok(ProductId::new(r.product_id).map_err(CompareError::from)?)
}

/// Mutations succeed even when the catalog is down; the bar just loses its
/// product summaries.
async fn bar_response(s: &AppState, list: ListSnapshot) -> CompareResponse {
    let products = match s.builder.build(&list.ids).await {
        Ok(matrix) => matrix.into_products().into_iter().map(BarProduct::from).collect(),
        Err(e) => { warn!(error = %e, "compare bar without product data"); vec![] }
    };
    CompareResponse { count: list.count, ids: list.ids, products }
}

async fn get_compare(State(s): State<AppState>, jar: CookieJar) -> Json<CompareResponse> {
    let list = s.list_manager(jar).get().snapshot();
    Json(bar_response(&s, list).await)
}

async fn add_to_compare(State(s): State<AppState>, jar: CookieJar, Json(r): Json<ProductRequest>) -> Result<(CookieJar, Json<CompareResponse>), ApiError> {
    let id = product_id(&r)?;
    let mut manager = s.list_manager(jar);
    let list = manager.add(id)?;
    let jar = manager.into_store().into_jar();
    Ok((jar, Json(bar_response(&s, list).await)))
}

async fn remove_from_compare(State(s): State<AppState>, jar: CookieJar, Json(r): Json<ProductRequest>) -> Result<(CookieJar, Json<CompareResponse>), ApiError> {
    let id = product_id(&r)?;
    let mut manager = s.list_manager(jar);
    let list = manager.remove(id);
    let jar = manager.into_store().into_jar();
    Ok((jar, Json(bar_response(&s, list).await)))
}

async fn clear_compare(State(s): State<AppState>, jar: CookieJar) -> (CookieJar, Json<CompareResponse>) {
    let mut manager = s.list_manager(jar);
    let list = manager.clear();
    (manager.into_store().into_jar(), Json(CompareResponse { count: list.count, ids: list.ids, products: vec![] }))
}

async fn get_matrix(State(s): State<AppState>, jar: CookieJar) -> Result<Json<MatrixResponse>, ApiError> {
    let list = s.list_manager(jar).get();
    let matrix = s.builder.build(list.ids()).await.map_err(|e| {
        error!(error = %e, "compare matrix unavailable");
        e
    })?;
    let rows = matrix.rows();
    let can_add_more = matrix.len() < s.config.max_products;
    let is_empty = matrix.is_empty();
    Ok(Json(MatrixResponse { matrix, rows, can_add_more, is_empty }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DeclaredAttribute, InMemoryCatalog, ProductView};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use rust_decimal::Decimal;
    use serde_json::Value;
    use tower::ServiceExt;

    fn id(v: u64) -> ProductId { ProductId::new(v).unwrap() }

    fn catalog() -> InMemoryCatalog {
        let mut hub = ProductView::named(id(1), "Zigbee Hub", Decimal::new(299, 0));
        hub.attributes = vec![DeclaredAttribute::Taxonomy { taxonomy: "pa_protocol".into(), label: "Protocol".into(), terms: vec!["Zigbee".into(), "Wi-Fi".into()] }];
        let mut plug = ProductView::named(id(2), "Smart Plug", Decimal::new(49, 0));
        plug.attributes = vec![DeclaredAttribute::Custom { name: "Max Load".into(), options: vec!["16A".into()] }];
        InMemoryCatalog::new()
            .with_product(hub)
            .with_product(plug)
            .with_product(ProductView::named(id(3), "Motion Sensor", Decimal::new(79, 0)))
            .with_custom_field(id(2), "_neogen_hub_required", "yes")
            .with_custom_field(id(1), "_neogen_hub_required", "no")
    }

    fn app(catalog: InMemoryCatalog) -> Router { router(AppState::new(Arc::new(catalog), CompareConfig::default())) }

    fn post_json(uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
        let mut req = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(c) = cookie { req = req.header(header::COOKIE, c); }
        req.body(Body::from(body.to_string())).unwrap()
    }

    fn get_req(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut req = Request::get(uri);
        if let Some(c) = cookie { req = req.header(header::COOKIE, c); }
        req.body(Body::empty()).unwrap()
    }

    async fn body_json(resp: Response) -> Value {
        serde_json::from_slice(&to_bytes(resp.into_body(), usize::MAX).await.unwrap()).unwrap()
    }

    /// Set-Cookie header with the list brackets and commas un-escaped.
    fn set_cookie(resp: &Response) -> String {
        resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap()
            .replace("%5B", "[").replace("%5D", "]").replace("%2C", ",")
    }

    #[tokio::test]
    async fn test_add_sets_cookie_and_returns_bar() {
        let resp = app(catalog()).oneshot(post_json("/api/v1/compare/add", Some("neogen_compare=[1]"), json!({"product_id": 2}))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = set_cookie(&resp);
        assert!(cookie.starts_with("neogen_compare=[1,2]"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=604800"));
        let body = body_json(resp).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["ids"], json!([1, 2]));
        assert_eq!(body["products"][1]["name"], "Smart Plug");
    }

    #[tokio::test]
    async fn test_add_over_capacity() {
        let resp = app(catalog()).oneshot(post_json("/api/v1/compare/add", Some("neogen_compare=[1,2,3,4]"), json!({"product_id": 5}))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert!(resp.headers().get(header::SET_COOKIE).is_none());
        let body = body_json(resp).await;
        assert_eq!(body["max_reached"], true);
    }

    #[tokio::test]
    async fn test_add_rejects_zero() {
        let resp = app(catalog()).oneshot(post_json("/api/v1/compare/add", None, json!({"product_id": 0}))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["kind"], "invalid_product");
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let resp = app(catalog()).oneshot(post_json("/api/v1/compare/remove", Some("neogen_compare=[1,2,3]"), json!({"product_id": 2}))).await.unwrap();
        assert!(set_cookie(&resp).starts_with("neogen_compare=[1,3]"));
        assert_eq!(body_json(resp).await["ids"], json!([1, 3]));

        let resp = app(catalog()).oneshot(post_json("/api/v1/compare/clear", Some("neogen_compare=[1,2,3]"), json!({}))).await.unwrap();
        assert!(set_cookie(&resp).starts_with("neogen_compare=[]"));
        assert_eq!(body_json(resp).await["count"], 0);
    }

    #[tokio::test]
    async fn test_get_skips_stale_and_tolerates_garbage() {
        let resp = app(catalog()).oneshot(get_req("/api/v1/compare", Some("neogen_compare=[3,99]"))).await.unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["products"].as_array().unwrap().len(), 1);

        let resp = app(catalog()).oneshot(get_req("/api/v1/compare", Some("neogen_compare=not-json"))).await.unwrap();
        assert_eq!(body_json(resp).await["count"], 0);
    }

    #[tokio::test]
    async fn test_matrix() {
        let resp = app(catalog()).oneshot(get_req("/api/v1/compare/matrix", Some("neogen_compare=[1,2]"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["attributes"], json!(["Protocol", "Hub Required", "Max Load"]));
        assert_eq!(body["best_price_id"], 2);
        assert_eq!(body["can_add_more"], true);
        assert_eq!(body["rows"][0]["cells"], json!([{"kind": "text", "value": "Zigbee, Wi-Fi"}, {"kind": "absent"}]));
        assert_eq!(body["rows"][1]["cells"], json!([{"kind": "negative"}, {"kind": "affirmative"}]));
    }

    #[tokio::test]
    async fn test_matrix_catalog_down() {
        let catalog = catalog();
        catalog.set_unavailable(true);
        let resp = app(catalog).oneshot(get_req("/api/v1/compare/matrix", Some("neogen_compare=[1]"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(resp).await["kind"], "catalog_unavailable");
    }

    #[tokio::test]
    async fn test_add_succeeds_when_catalog_down() {
        let catalog = catalog();
        catalog.set_unavailable(true);
        let resp = app(catalog).oneshot(post_json("/api/v1/compare/add", None, json!({"product_id": 1}))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["products"], json!([]));
    }
}
