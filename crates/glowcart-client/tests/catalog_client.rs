//! Integration tests for `CatalogClient`.
//!
//! Uses `wiremock` to stand up a local HTTP server per test so no real
//! network traffic is made. Covers the happy paths (empty, single-page,
//! multi-page catalogs, collections) and the error taxonomy the client can
//! propagate.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use glowcart_client::{CatalogClient, ClientError};

/// 5-second timeout, descriptive UA, no retries.
fn test_client() -> CatalogClient {
    CatalogClient::new(5, "glowcart-test/0.1", 0, 0).expect("failed to build test CatalogClient")
}

fn test_client_with_retries(max_retries: u32) -> CatalogClient {
    CatalogClient::new(5, "glowcart-test/0.1", max_retries, 0)
        .expect("failed to build test CatalogClient")
}

/// Minimal valid one-product page.
fn one_product_json(id: i64) -> serde_json::Value {
    json!({
        "products": [{
            "id": id,
            "title": "Renewing Night Serum",
            "handle": "renewing-night-serum",
            "product_type": "Serums",
            "tags": ["bestseller"],
            "metafields": {
                "skin_type": ["dry"],
                "concern": "dullness",
                "is_new": "true"
            },
            "variants": [{
                "id": id * 100,
                "title": "30ml",
                "price": "42.00",
                "available": true,
                "position": 1
            }]
        }]
    })
}

// ---------------------------------------------------------------------------
// products.json
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_catalog_yields_empty_vec() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({"products": []})))
        .mount(&server)
        .await;

    let products = test_client()
        .fetch_all_products(&server.uri(), 250, 0)
        .await
        .expect("fetch should succeed");
    assert!(products.is_empty());
}

#[tokio::test]
async fn single_page_catalog_returns_its_products() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&one_product_json(1)))
        .mount(&server)
        .await;

    let products = test_client()
        .fetch_all_products(&server.uri(), 250, 0)
        .await
        .expect("fetch should succeed");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, 1);
    assert_eq!(products[0].variants[0].price, "42.00");
}

#[tokio::test]
async fn multi_page_catalog_follows_link_cursors() {
    let server = MockServer::start().await;
    let next_link = format!(
        "<{}/products.json?limit=250&page_info=CURSOR2>; rel=\"next\"",
        server.uri()
    );

    // First page (no page_info param) advertises a next page.
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("limit", "250"))
        .and(query_param("page_info", "CURSOR2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&one_product_json(2)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&one_product_json(1))
                .insert_header("Link", next_link.as_str()),
        )
        .mount(&server)
        .await;

    let products = test_client()
        .fetch_all_products(&server.uri(), 250, 0)
        .await
        .expect("fetch should succeed");
    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn not_found_is_a_typed_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_client()
        .fetch_all_products(&server.uri(), 250, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound { .. }));
}

#[tokio::test]
async fn server_error_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = test_client()
        .fetch_all_products(&server.uri(), 250, 0)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::UnexpectedStatus { status: 500, .. }
    ));
}

#[tokio::test]
async fn rate_limit_without_retries_surfaces_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "17"))
        .mount(&server)
        .await;

    let err = test_client()
        .fetch_all_products(&server.uri(), 250, 0)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::RateLimited {
            retry_after_secs: 17,
            ..
        }
    ));
}

#[tokio::test]
async fn rate_limit_is_retried_until_success() {
    let server = MockServer::start().await;

    // First two attempts are throttled, the third succeeds.
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&one_product_json(1)))
        .mount(&server)
        .await;

    let products = test_client_with_retries(3)
        .fetch_all_products(&server.uri(), 250, 0)
        .await
        .expect("retries should recover");
    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = test_client()
        .fetch_all_products(&server.uri(), 250, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Deserialize { .. }));
}

// ---------------------------------------------------------------------------
// collections.json and membership
// ---------------------------------------------------------------------------

#[tokio::test]
async fn collections_list_is_fetched() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/collections.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "collections": [
                {"id": 7, "title": "Bestsellers", "handle": "bestsellers"},
                {"id": 8, "title": "Night Routine", "handle": "night-routine"}
            ]
        })))
        .mount(&server)
        .await;

    let collections = test_client()
        .fetch_collections(&server.uri())
        .await
        .expect("fetch should succeed");
    assert_eq!(collections.len(), 2);
    assert_eq!(collections[1].title, "Night Routine");
}

#[tokio::test]
async fn collection_member_ids_are_fetched() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/collections/bestsellers/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "products": [{"id": 1}, {"id": 3}]
        })))
        .mount(&server)
        .await;

    let ids = test_client()
        .fetch_collection_member_ids(&server.uri(), "bestsellers")
        .await
        .expect("fetch should succeed");
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn missing_collections_endpoint_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/collections.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_client()
        .fetch_collections(&server.uri())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound { .. }));
}
