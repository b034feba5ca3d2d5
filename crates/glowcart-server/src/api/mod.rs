mod cart;
mod collections;
mod products;
mod recent;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use glowcart_cart::{MutationCoordinator, OptimisticCart};
use serde::Serialize;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::catalog::{Catalog, SharedCatalog};
use crate::middleware::{request_id, RequestId};
use recent::MemoryRecentStore;

#[derive(Clone)]
pub struct AppState {
    pub catalog: SharedCatalog,
    pub cart: Arc<Mutex<OptimisticCart>>,
    pub coordinator: Arc<MutationCoordinator>,
    pub recent: Arc<Mutex<MemoryRecentStore>>,
}

impl AppState {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(tokio::sync::RwLock::new(Arc::new(catalog))),
            cart: Arc::new(Mutex::new(OptimisticCart::default())),
            coordinator: Arc::new(MutationCoordinator::new()),
            recent: Arc::new(Mutex::new(MemoryRecentStore::default())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

async fn health(Extension(req_id): Extension<RequestId>) -> Json<ApiResponse<HealthData>> {
    Json(ApiResponse {
        data: HealthData { status: "ok" },
        meta: ResponseMeta::new(req_id.0),
    })
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/products", get(products::list_products))
        .route(
            "/api/v1/collections/{handle}/products",
            get(products::list_collection_products),
        )
        .route("/api/v1/collections", get(collections::list_collections))
        .route(
            "/api/v1/cart",
            get(cart::get_cart),
        )
        .route(
            "/api/v1/cart/lines",
            axum::routing::post(cart::add_lines)
                .patch(cart::update_lines)
                .delete(cart::remove_lines),
        )
        .route(
            "/api/v1/cart/discounts",
            axum::routing::patch(cart::update_discounts),
        )
        .route("/api/v1/recent", get(recent::list_recent))
        .route(
            "/api/v1/recent/{handle}",
            axum::routing::post(recent::record_view),
        )
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use glowcart_core::Product;
    use tower::ServiceExt;

    use super::*;

    fn make_product(id: &str, price: &str, is_new: bool) -> Product {
        Product {
            id: id.to_string(),
            title: format!("Product {id}"),
            handle: format!("product-{id}"),
            product_type: Some("Serums".to_string()),
            collections: vec!["Bestsellers".to_string()],
            price: price.to_string(),
            currency: "USD".to_string(),
            tags: Vec::new(),
            skin_types: None,
            concerns: None,
            ingredients: None,
            is_new,
        }
    }

    fn test_app(products: Vec<Product>) -> Router {
        let catalog = Catalog {
            products,
            collections: vec![glowcart_core::Collection {
                id: "7".to_string(),
                title: "Bestsellers".to_string(),
                handle: "bestsellers".to_string(),
            }],
        };
        build_app(AppState::new(catalog))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    #[tokio::test]
    async fn health_echoes_request_id() {
        let app = test_app(Vec::new());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .map(|v| v.to_str().expect("header value")),
            Some("req-42")
        );
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["meta"]["request_id"], "req-42");
    }

    #[tokio::test]
    async fn products_grid_applies_sort_and_show() {
        let products = (0..8)
            .map(|i| make_product(&i.to_string(), &format!("{}.00", 80 - i), false))
            .collect();
        let app = test_app(products);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/products?sort=PRICE_ASC&show=12")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["total"], 8);
        assert_eq!(json["data"]["visible"], 8);
        assert_eq!(json["data"]["has_more"], false);
        let items = json["data"]["items"].as_array().expect("items array");
        // Cheapest first under PRICE_ASC.
        assert_eq!(items[0]["id"], "7");
    }

    #[tokio::test]
    async fn products_grid_defaults_to_one_batch() {
        let products = (0..10)
            .map(|i| make_product(&i.to_string(), "10.00", false))
            .collect();
        let app = test_app(products);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/products")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        let json = body_json(response).await;
        assert_eq!(json["data"]["visible"], 6);
        assert_eq!(json["data"]["has_more"], true);
        assert_eq!(
            json["data"]["items"].as_array().map(Vec::len),
            Some(6)
        );
    }

    #[tokio::test]
    async fn unknown_collection_is_not_found() {
        let app = test_app(Vec::new());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/collections/no-such/products")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn cart_add_lines_round_trips() {
        let app = test_app(Vec::new());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/cart/lines")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"lines":[{"merchandise_id":"v1","quantity":2,"unit_price":"24.00"}]}"#,
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let lines = json["data"]["lines"].as_array().expect("lines array");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["quantity"], 2);
    }

    #[tokio::test]
    async fn cart_update_of_unknown_line_is_a_validation_error() {
        let app = test_app(Vec::new());
        let response = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/api/v1/cart/lines")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"lines":[{"line_id":"line-v9","quantity":3}]}"#,
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn recent_views_are_recorded_most_recent_first() {
        let app = test_app(Vec::new());

        for handle in ["toner", "serum"] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri(format!("/api/v1/recent/{handle}"))
                        .body(Body::empty())
                        .expect("request"),
                )
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/recent")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let json = body_json(response).await;
        assert_eq!(json["data"], serde_json::json!(["serum", "toner"]));
    }
}
