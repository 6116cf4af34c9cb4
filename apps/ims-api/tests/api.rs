//! Black-box tests: the real router, an in-memory database and tokens
//! signed with the test secret.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use ims_api::auth::Claims;
use ims_api::{build_app, AppState};
use ims_core::StockPolicy;
use ims_db::{Database, DbConfig};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "test-secret";

async fn app() -> Router {
    app_with_policy(StockPolicy::default()).await
}

async fn app_with_policy(policy: StockPolicy) -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    build_app(AppState::new(db, policy, SECRET))
}

fn mint_jwt(sub: &str) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        exp: (Utc::now() + Duration::minutes(10)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("authorization", format!("Bearer {}", mint_jwt(user)));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// Creates a color, a size and a product with one variation; returns the
/// variation id.
async fn seed_variation(app: &Router, user: &str, stock: i64) -> String {
    let (status, color) = send(app, "POST", "/api/colors", Some(user), Some(json!({"name": "Navy"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, size) = send(app, "POST", "/api/sizes", Some(user), Some(json!({"name": "M"}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, product) = send(
        app,
        "POST",
        "/api/products",
        Some(user),
        Some(json!({
            "name": "Linen Shirt",
            "costPriceCents": 1000,
            "sellingPriceCents": 2000,
            "imageUrls": "[/img/linen.png, /img/linen-back.png]",
            "variations": [{
                "colorId": color["id"],
                "sizeId": size["id"],
                "quantity": stock
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(product["primaryImageUrl"], "img/linen.png");

    product["variations"][0]["id"].as_str().unwrap().to_string()
}

fn trade(variation_id: &str, quantity: i64) -> Option<Value> {
    Some(json!({"productVariationId": variation_id, "quantity": quantity}))
}

#[tokio::test]
async fn health_is_public() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["migrationsTotal"], body["migrationsApplied"]);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/api/products", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let request = Request::builder()
        .uri("/api/products")
        .header("authorization", "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn sell_and_refund_lifecycle() {
    let app = app().await;
    let variation = seed_variation(&app, "alice", 10).await;

    // Sell 3: revenue 60.00, cost 30.00, profit 30.00
    let (status, sale) = send(&app, "POST", "/api/sell-product-variation", Some("alice"), trade(&variation, 3)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale["quantitySold"], 3);
    assert_eq!(sale["totalRevenueCents"], 6000);
    assert_eq!(sale["totalCostCents"], 3000);
    assert_eq!(sale["totalProfitCents"], 3000);

    // Sell 10 more than is left
    let (status, body) = send(&app, "POST", "/api/sell-product-variation", Some("alice"), trade(&variation, 10)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");

    // Refund 2
    let (status, outcome) = send(&app, "POST", "/api/refund-product-variation", Some("alice"), trade(&variation, 2)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(outcome["newStock"], 9);
    assert_eq!(outcome["refundRecords"][0]["quantitySold"], -2);
    assert_eq!(outcome["refundRecords"][0]["totalRevenueCents"], -4000);

    // Only one unit is still outstanding
    let (status, body) = send(&app, "POST", "/api/refund-product-variation", Some("alice"), trade(&variation, 2)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "EXCESSIVE_REFUND");

    let (status, report) = send(&app, "GET", "/api/sales-report", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["lines"].as_array().unwrap().len(), 2);
    assert_eq!(report["lines"][0]["productName"], "Linen Shirt");
    assert_eq!(report["summary"]["netUnits"], 1);

    let (_, original) = send(&app, "GET", &format!("/api/sales/{}", sale["id"].as_str().unwrap()), Some("alice"), None).await;
    assert_eq!(original["quantityRefunded"], 2);
}

#[tokio::test]
async fn invalid_quantity_is_rejected() {
    let app = app().await;
    let variation = seed_variation(&app, "alice", 10).await;

    for quantity in [0, -4] {
        let (status, body) = send(&app, "POST", "/api/sell-product-variation", Some("alice"), trade(&variation, quantity)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn other_users_cannot_touch_a_variation() {
    let app = app().await;
    let variation = seed_variation(&app, "alice", 10).await;

    let (status, body) = send(&app, "POST", "/api/sell-product-variation", Some("mallory"), trade(&variation, 1)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, "POST", "/api/refund-product-variation", Some("mallory"), trade(&variation, 1)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, products) = send(&app, "GET", "/api/products", Some("mallory"), None).await;
    assert!(products.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn last_unit_follows_policy() {
    let strict = app_with_policy(StockPolicy {
        allow_sell_last_unit: false,
    })
    .await;
    let variation = seed_variation(&strict, "alice", 2).await;

    let (status, body) = send(&strict, "POST", "/api/sell-product-variation", Some("alice"), trade(&variation, 2)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(&strict, "POST", "/api/sell-product-variation", Some("alice"), trade(&variation, 1)).await;
    assert_eq!(status, StatusCode::CREATED);

    let lenient = app().await;
    let variation = seed_variation(&lenient, "alice", 2).await;
    let (status, _) = send(&lenient, "POST", "/api/sell-product-variation", Some("alice"), trade(&variation, 2)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn catalog_and_stock_endpoints() {
    let app = app().await;
    let variation = seed_variation(&app, "alice", 4).await;

    let (status, body) = send(&app, "POST", "/api/colors", Some("alice"), Some(json!({"name": "Navy"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, body) = send(&app, "POST", "/api/sizes", Some("alice"), Some(json!({"name": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, restocked) = send(
        &app,
        "POST",
        &format!("/api/variations/{variation}/restock"),
        Some("alice"),
        Some(json!({"quantity": 6})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(restocked["quantity"], 10);

    let (status, totals) = send(&app, "GET", "/api/products/stock-totals", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(totals[0]["totalQuantity"], 10);
}

#[tokio::test]
async fn deleted_product_keeps_history_but_stops_selling() {
    let app = app().await;
    let variation = seed_variation(&app, "alice", 5).await;

    let (status, _) = send(&app, "POST", "/api/sell-product-variation", Some("alice"), trade(&variation, 1)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, products) = send(&app, "GET", "/api/products", Some("alice"), None).await;
    let product_id = products[0]["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, "DELETE", &format!("/api/products/{product_id}"), Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &format!("/api/products/{product_id}"), Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = send(&app, "POST", "/api/sell-product-variation", Some("alice"), trade(&variation, 1)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, report) = send(&app, "GET", "/api/sales-report", Some("alice"), None).await;
    assert_eq!(report["lines"][0]["productName"], "Linen Shirt");
}

#[tokio::test]
async fn deleting_a_sale_is_scoped_to_its_owner() {
    let app = app().await;
    let variation = seed_variation(&app, "alice", 5).await;
    let (_, sale) = send(&app, "POST", "/api/sell-product-variation", Some("alice"), trade(&variation, 1)).await;
    let uri = format!("/api/sales/{}", sale["id"].as_str().unwrap());

    let (status, _) = send(&app, "DELETE", &uri, Some("bob"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, sales) = send(&app, "GET", "/api/sales", Some("alice"), None).await;
    assert!(sales.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn product_update_reprices_later_sales() {
    let app = app().await;
    let variation = seed_variation(&app, "alice", 10).await;

    let (_, products) = send(&app, "GET", "/api/products", Some("alice"), None).await;
    let product_id = products[0]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/products/{product_id}");

    let (status, first) = send(&app, "POST", "/api/sell-product-variation", Some("alice"), trade(&variation, 1)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["totalRevenueCents"], 2000);

    let (status, updated) = send(&app, "PUT", &uri, Some("alice"), Some(json!({"sellingPriceCents": 2500}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["sellingPriceCents"], 2500);
    assert_eq!(updated["costPriceCents"], 1000);
    assert_eq!(updated["name"], "Linen Shirt");
    assert_eq!(updated["variations"].as_array().unwrap().len(), 1);

    let (_, second) = send(&app, "POST", "/api/sell-product-variation", Some("alice"), trade(&variation, 2)).await;
    assert_eq!(second["totalRevenueCents"], 5000);
    assert_eq!(second["totalProfitCents"], 3000);

    // The earlier sale keeps its totals
    let (_, stored) = send(&app, "GET", &format!("/api/sales/{}", first["id"].as_str().unwrap()), Some("alice"), None).await;
    assert_eq!(stored["totalRevenueCents"], 2000);

    let (status, body) = send(&app, "PUT", &uri, Some("alice"), Some(json!({"costPriceCents": -5}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(&app, "PUT", &uri, Some("alice"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "PUT", &uri, Some("bob"), Some(json!({"name": "Mine now"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn colors_and_sizes_can_be_edited_and_removed() {
    let app = app().await;
    seed_variation(&app, "alice", 5).await;

    let (_, colors) = send(&app, "GET", "/api/colors", Some("alice"), None).await;
    let navy_uri = format!("/api/colors/{}", colors[0]["id"].as_str().unwrap());
    let (_, sizes) = send(&app, "GET", "/api/sizes", Some("alice"), None).await;
    let medium_uri = format!("/api/sizes/{}", sizes[0]["id"].as_str().unwrap());

    let (status, navy) = send(&app, "GET", &navy_uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(navy["name"], "Navy");
    let (status, _) = send(&app, "GET", &navy_uri, Some("bob"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, renamed) = send(&app, "PUT", &medium_uri, Some("alice"), Some(json!({"name": "Medium"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "Medium");
    let (_, medium) = send(&app, "GET", &medium_uri, Some("alice"), None).await;
    assert_eq!(medium["name"], "Medium");

    // Both are used by the seeded variation
    let (status, body) = send(&app, "DELETE", &navy_uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
    let (status, _) = send(&app, "DELETE", &medium_uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, red) = send(&app, "POST", "/api/colors", Some("alice"), Some(json!({"name": "Red"}))).await;
    let red_uri = format!("/api/colors/{}", red["id"].as_str().unwrap());

    let (status, _) = send(&app, "PUT", &red_uri, Some("alice"), Some(json!({"name": "Navy"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send(&app, "PUT", &red_uri, Some("alice"), Some(json!({"name": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", &red_uri, Some("bob"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &red_uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &red_uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, xl) = send(&app, "POST", "/api/sizes", Some("alice"), Some(json!({"name": "XL"}))).await;
    let xl_uri = format!("/api/sizes/{}", xl["id"].as_str().unwrap());
    let (status, _) = send(&app, "DELETE", &xl_uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
