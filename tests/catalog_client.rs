//! HTTP catalog client against a mocked catalog service.

#![allow(clippy::unwrap_used)]

use marketplace_rfq::domain::value_objects::{CategoryId, ProductId, SellerId};
use marketplace_rfq::infrastructure::collaborators::catalog::{Catalog, HttpCatalogClient};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn seller_categories_are_fetched_live() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sellers/s1/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["electronics", "metals"])))
        .mount(&server)
        .await;

    let client = HttpCatalogClient::new(server.uri());
    let categories = client
        .categories_of_seller(&SellerId::new("s1"))
        .await
        .unwrap();

    assert_eq!(categories.len(), 2);
    assert!(categories.contains(&CategoryId::new("electronics")));
}

#[tokio::test]
async fn unknown_seller_has_no_categories() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sellers/ghost/categories"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = HttpCatalogClient::new(server.uri());
    let categories = client
        .categories_of_seller(&SellerId::new("ghost"))
        .await
        .unwrap();
    assert!(categories.is_empty());
}

#[tokio::test]
async fn product_existence_follows_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/p1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "p1", "name": "Steel beam"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/p2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = HttpCatalogClient::new(server.uri());
    assert!(client.product_exists(&ProductId::new("p1")).await.unwrap());
    assert!(!client.product_exists(&ProductId::new("p2")).await.unwrap());

    let summary = client
        .product_summary(&ProductId::new("p1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(summary.name, "Steel beam");
}

#[tokio::test]
async fn server_errors_surface_as_catalog_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/categories/metals"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = HttpCatalogClient::new(server.uri());
    let result = client.category_exists(&CategoryId::new("metals")).await;
    assert!(result.is_err());
}
