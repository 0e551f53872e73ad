//! Client-level tests: catalog caching, error classification, and the
//! payload boundary validation.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use ecom_market_core::{BrandId, ProductId};
use ecom_market_storefront::api::{ApiClient, ApiError, ProductQuery};
use ecom_market_storefront::config::ApiConfig;

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url: server.base_url().parse().unwrap(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn product_json(id: i32) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("Product {id}"),
        "price": 100.0,
        "main_image": null,
        "part_number": format!("PN-{id:05}"),
    })
}

#[tokio::test]
async fn product_detail_is_cached() {
    let server = MockServer::start_async().await;
    let detail = server
        .mock_async(|when, then| {
            when.method(GET).path("/products/5");
            then.status(200).json_body(json!({
                "id": 5,
                "name": "Product 5",
                "description": "Long description",
                "price": 100.0,
                "part_number": "PN-00005",
                "category": {"id": 1, "name": "Brakes"},
                "images": [],
            }));
        })
        .await;

    let client = client_for(&server);
    let first = client.product(ProductId::new(5)).await.unwrap();
    let second = client.product(ProductId::new(5)).await.unwrap();

    assert_eq!(first.name, second.name);
    assert_eq!(detail.hits_async().await, 1);

    // Invalidation forces a refetch.
    client.invalidate_product(ProductId::new(5)).await;
    client.product(ProductId::new(5)).await.unwrap();
    assert_eq!(detail.hits_async().await, 2);
}

#[tokio::test]
async fn search_queries_bypass_the_cache() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/products");
            then.status(200).json_body(json!([product_json(1)]));
        })
        .await;

    let client = client_for(&server);
    let query = ProductQuery {
        search: Some("brake".to_owned()),
        ..ProductQuery::default()
    };

    client.products(&query).await.unwrap();
    client.products(&query).await.unwrap();
    assert_eq!(list.hits_async().await, 2);

    // The default listing is cached after the first hit.
    client.products(&ProductQuery::default()).await.unwrap();
    client.products(&ProductQuery::default()).await.unwrap();
    assert_eq!(list.hits_async().await, 3);
}

#[tokio::test]
async fn missing_product_classifies_as_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/products/99");
            then.status(404)
                .json_body(json!({"detail": "Product 99 not found"}));
        })
        .await;

    let client = client_for(&server);
    let err = client.product(ProductId::new(99)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(detail) if detail == "Product 99 not found"));
}

#[tokio::test]
async fn field_errors_fold_into_validation_detail() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/cart/items");
            then.status(422).json_body(json!({"detail": [
                {"loc": ["body", "quantity"], "msg": "Quantity must be at least 1"},
            ]}));
        })
        .await;

    let client = client_for(&server);
    let err = client
        .add_cart_item(ProductId::new(1), 0)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(detail) if detail.contains("at least 1")));
}

#[tokio::test]
async fn invalid_cart_payload_is_rejected_at_the_boundary() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/cart");
            then.status(200).json_body(json!({
                "items": [{
                    "id": 1,
                    "product_id": 1,
                    "quantity": 0,
                    "price_at_addition": 100.0,
                    "product": product_json(1),
                }],
                "total_items": 0,
                "total_price": 0.0,
            }));
        })
        .await;

    let client = client_for(&server);
    let err = client.cart().await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidPayload(_)));
}

#[tokio::test]
async fn brand_products_are_cached_per_brand() {
    let server = MockServer::start_async().await;
    let brand = server
        .mock_async(|when, then| {
            when.method(GET).path("/brands/3/products");
            then.status(200).json_body(json!([product_json(1), product_json(2)]));
        })
        .await;

    let client = client_for(&server);
    let products = client.brand_products(BrandId::new(3)).await.unwrap();
    assert_eq!(products.len(), 2);
    client.brand_products(BrandId::new(3)).await.unwrap();
    assert_eq!(brand.hits_async().await, 1);
}
