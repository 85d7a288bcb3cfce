//! # Contract Tests for the HTTP Product Gateway
//!
//! Runs `HttpProductGateway` against wiremock servers to check request
//! construction, response decoding, and how failures reach the core.

use std::time::Duration;

use catalog_adapters::{AdapterError, HttpGatewayConfig, HttpProductGateway};
use catalog_core::application::{ErrorType, GatewayError, ProductGateway, normalize};
use catalog_core::domain::{ProductDraft, ProductId, ProductQuery, SortOrder};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ID: &str = "3f2c8a1e-5b7d-4c1a-9e0f-2a6b8c4d1e3f";

fn gateway(server: &MockServer) -> HttpProductGateway {
    HttpProductGateway::new(HttpGatewayConfig::new(format!("{}/api/v1", server.uri())))
        .expect("gateway build")
}

fn product_json() -> serde_json::Value {
    json!({
        "publicId": ID,
        "name": "Desk lamp",
        "price": 19.99,
        "quantity": 40,
        "description": null
    })
}

fn draft() -> ProductDraft {
    ProductDraft {
        name: "Desk lamp".into(),
        price: 19.99,
        quantity: 40,
        description: None,
    }
}

fn id() -> ProductId {
    ID.parse().expect("valid id")
}

// ── Success paths ────────────────────────────────────────────────────────

#[tokio::test]
async fn list_sends_query_parameters_and_decodes_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products"))
        .and(query_param("page", "2"))
        .and(query_param("size", "5"))
        .and(query_param("sort", "price,desc"))
        .and(query_param("name", "lamp"))
        .and(query_param("minPrice", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [product_json()],
            "totalElements": 11,
            "totalPages": 3,
            "size": 5,
            "number": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = ProductQuery::new()
        .with_page(2)
        .with_size(5)
        .with_sort(vec![SortOrder::desc("price")])
        .with_name("  lamp ")
        .with_price_range(Some(10.0), None);

    let page = gateway(&server).list(&query).await.expect("list");
    assert_eq!(page.total_elements, 11);
    assert_eq!(page.content[0].name, "Desk lamp");
    assert!(page.content[0].description.is_none());
    assert!(page.is_last());
}

#[tokio::test]
async fn get_decodes_product() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/products/{ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json()))
        .expect(1)
        .mount(&server)
        .await;

    let product = gateway(&server).get(&id()).await.expect("get");
    assert_eq!(product.public_id, Some(id()));
}

#[tokio::test]
async fn create_posts_camel_case_draft() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/products"))
        .and(body_json(json!({ "name": "Desk lamp", "price": 19.99, "quantity": 40 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(product_json()))
        .expect(1)
        .mount(&server)
        .await;

    let product = gateway(&server).create(&draft()).await.expect("create");
    assert_eq!(product.quantity, 40);
}

#[tokio::test]
async fn update_puts_to_product_path() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("/api/v1/products/{ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json()))
        .expect(1)
        .mount(&server)
        .await;

    gateway(&server).update(&id(), &draft()).await.expect("update");
}

#[tokio::test]
async fn delete_accepts_no_content() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/products/{ID}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    gateway(&server).delete(&id()).await.expect("delete");
}

// ── Failure paths ────────────────────────────────────────────────────────

#[tokio::test]
async fn problem_detail_body_reaches_normalizer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/products/{ID}")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "type": "https://api.productmanagement.com.br/product-not-found",
            "title": "Product Not Found",
            "status": 404,
            "detail": "The requested product does not exist",
            "productId": ID
        })))
        .mount(&server)
        .await;

    let Err(GatewayError::Failed(failure)) = gateway(&server).get(&id()).await else {
        panic!("expected failure");
    };
    assert_eq!(failure.status, Some(404));
    assert_eq!(failure.method.as_deref(), Some("GET"));
    assert!(failure.url.as_deref().unwrap_or_default().ends_with(ID));

    let normalized = normalize(&failure);
    assert_eq!(normalized.error_type, ErrorType::NotFound);
    assert_eq!(normalized.message, "The requested product does not exist");
}

#[tokio::test]
async fn plain_text_error_body_is_kept() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let Err(GatewayError::Failed(failure)) = gateway(&server).list(&ProductQuery::new()).await
    else {
        panic!("expected failure");
    };
    assert_eq!(failure.body, Some(json!("upstream down")));
    assert!(normalize(&failure).message.starts_with("Error 502: "));
}

#[tokio::test]
async fn malformed_success_body_is_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/products/{ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let Err(GatewayError::Failed(failure)) = gateway(&server).get(&id()).await else {
        panic!("expected failure");
    };
    assert_eq!(failure.status, Some(200));
    assert!(failure.message.contains("parsing"));
}

#[tokio::test]
async fn unreachable_server_is_transport_failure() {
    // Bind then release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let uri = format!("http://{}", listener.local_addr().expect("addr"));
    drop(listener);

    let gw = HttpProductGateway::new(
        HttpGatewayConfig::new(uri).with_timeout(Duration::from_secs(2)),
    )
    .expect("gateway build");

    let Err(GatewayError::Failed(failure)) = gw.get(&id()).await else {
        panic!("expected failure");
    };
    assert_eq!(failure.status, None);

    let normalized = normalize(&failure);
    assert_eq!(normalized.error_type, ErrorType::Client);
    assert_eq!(normalized.status, Some(0));
}

#[tokio::test]
async fn timeout_is_transport_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/products/{ID}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(product_json())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let gw = HttpProductGateway::new(
        HttpGatewayConfig::new(format!("{}/api/v1", server.uri()))
            .with_timeout(Duration::from_millis(200)),
    )
    .expect("gateway build");

    let Err(GatewayError::Failed(failure)) = gw.get(&id()).await else {
        panic!("expected failure");
    };
    assert_eq!(failure.status, None);
    assert!(failure.message.contains("timed out"));
}

// ── Cancellation ─────────────────────────────────────────────────────────

#[tokio::test]
async fn cancelling_token_abandons_in_flight_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "content": [], "totalElements": 0, "totalPages": 0, "size": 10, "number": 0 }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let gw = gateway(&server).with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let result = gw.list(&ProductQuery::new()).await;
    canceller.await.expect("canceller");
    assert_eq!(result, Err(GatewayError::Cancelled));
}

#[tokio::test]
async fn cancelled_gateway_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let gw = gateway(&server);
    gw.cancellation_token().cancel();

    assert_eq!(gw.delete(&id()).await, Err(GatewayError::Cancelled));
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = HttpProductGateway::new(HttpGatewayConfig::new("localhost:8080")).unwrap_err();
    assert!(matches!(err, AdapterError::InvalidBaseUrl { .. }));
}
