//! Router-level tests for the carts API.

#![allow(clippy::unwrap_used)]

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{body_json, build_app, seed_cart, seed_product, send, send_json};

const MISSING_ID: &str = "00000000-0000-0000-0000-000000000000";

#[tokio::test]
async fn create_returns_empty_cart() {
    let app = build_app();

    let resp = send(&app, "POST", "/api/carts").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["payload"]["products"], json!([]));
}

#[tokio::test]
async fn every_cart_endpoint_rejects_unknown_cart() {
    let app = build_app();
    let pid = seed_product(&app, &json!({"title": "p"})).await;

    let cases = [
        ("GET", format!("/api/carts/{MISSING_ID}"), None),
        (
            "POST",
            format!("/api/carts/{MISSING_ID}/products/{pid}"),
            None,
        ),
        (
            "DELETE",
            format!("/api/carts/{MISSING_ID}/products/{pid}"),
            None,
        ),
        (
            "PUT",
            format!("/api/carts/{MISSING_ID}"),
            Some(json!({"products": []})),
        ),
        (
            "PUT",
            format!("/api/carts/{MISSING_ID}/products/{pid}"),
            Some(json!({"quantity": 1})),
        ),
        ("DELETE", format!("/api/carts/{MISSING_ID}"), None),
    ];

    for (method, uri, body) in cases {
        let resp = match body {
            Some(ref body) => send_json(&app, method, &uri, body).await,
            None => send(&app, method, &uri).await,
        };
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{method} {uri}");
        let body = body_json(resp).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Cart not found", "{method} {uri}");
    }
}

#[tokio::test]
async fn repeated_adds_increment_by_exactly_one() {
    let app = build_app();
    let pid = seed_product(&app, &json!({"title": "p"})).await;
    let cid = seed_cart(&app).await;
    let uri = format!("/api/carts/{cid}/products/{pid}");

    for expected in 1..=3 {
        let resp = send(&app, "POST", &uri).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["message"], "Product added to cart");

        let products = body["payload"]["products"].as_array().unwrap();
        assert_eq!(products.len(), 1, "entry stays unique");
        assert_eq!(products[0]["quantity"], expected);
    }
}

#[tokio::test]
async fn add_unknown_product_names_the_product() {
    let app = build_app();
    let cid = seed_cart(&app).await;

    let resp = send(&app, "POST", &format!("/api/carts/{cid}/products/{MISSING_ID}")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    // Distinct from the cart-not-found message
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn remove_product_is_noop_when_absent() {
    let app = build_app();
    let kept = seed_product(&app, &json!({"title": "kept"})).await;
    let other = seed_product(&app, &json!({"title": "other"})).await;
    let cid = seed_cart(&app).await;
    send(&app, "POST", &format!("/api/carts/{cid}/products/{kept}")).await;

    // Removing a product that is not in the cart succeeds and changes nothing
    let resp = send(&app, "DELETE", &format!("/api/carts/{cid}/products/{other}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["payload"]["products"].as_array().unwrap().len(), 1);

    let resp = send(&app, "DELETE", &format!("/api/carts/{cid}/products/{kept}")).await;
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Product removed from cart");
    assert_eq!(body["payload"]["products"], json!([]));
}

#[tokio::test]
async fn replace_all_normalizes_quantities() {
    let app = build_app();
    let p1 = seed_product(&app, &json!({"title": "a", "price": 2.0})).await;
    let p2 = seed_product(&app, &json!({"title": "b", "price": 3.0})).await;
    let cid = seed_cart(&app).await;

    let resp = send_json(
        &app,
        "PUT",
        &format!("/api/carts/{cid}"),
        &json!({"products": [
            {"product": p1, "quantity": 4},
            {"product": p2},
        ]}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Cart updated");

    let products = body["payload"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["quantity"], 4);
    // Missing quantity defaults to 1
    assert_eq!(products[1]["quantity"], 1);

    // Read-back returns exactly the supplied entries, resolved
    let resp = send(&app, "GET", &format!("/api/carts/{cid}")).await;
    let body = body_json(resp).await;
    let products = body["payload"]["products"].as_array().unwrap();
    assert_eq!(products[0]["product"]["title"], "a");
    assert_eq!(products[1]["product"]["title"], "b");
}

#[tokio::test]
async fn replace_all_rejects_non_array_products() {
    let app = build_app();
    let cid = seed_cart(&app).await;

    for body in [json!({"products": "nope"}), json!({}), json!({"products": 7})] {
        let resp = send_json(&app, "PUT", &format!("/api/carts/{cid}"), &body).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["status"], "error");
    }
}

#[tokio::test]
async fn replace_all_accepts_dangling_references() {
    let app = build_app();
    let cid = seed_cart(&app).await;

    // No existence check for entries supplied this way
    let resp = send_json(
        &app,
        "PUT",
        &format!("/api/carts/{cid}"),
        &json!({"products": [{"product": MISSING_ID, "quantity": 2}]}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The dangling reference resolves to a null product at read time
    let resp = send(&app, "GET", &format!("/api/carts/{cid}")).await;
    let body = body_json(resp).await;
    let products = body["payload"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert!(products[0]["product"].is_null());
    assert_eq!(products[0]["quantity"], 2);
}

#[tokio::test]
async fn set_quantity_is_absolute_and_zero_removes() {
    let app = build_app();
    let pid = seed_product(&app, &json!({"title": "p"})).await;
    let cid = seed_cart(&app).await;
    let entry_uri = format!("/api/carts/{cid}/products/{pid}");
    send(&app, "POST", &entry_uri).await;
    send(&app, "POST", &entry_uri).await;

    let resp = send_json(&app, "PUT", &entry_uri, &json!({"quantity": 7})).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Product quantity updated");
    assert_eq!(body["payload"]["products"][0]["quantity"], 7);

    // Zero is equivalent to removing the entry
    let resp = send_json(&app, "PUT", &entry_uri, &json!({"quantity": 0})).await;
    let body = body_json(resp).await;
    assert_eq!(body["payload"]["products"], json!([]));

    // The entry is gone now, so another set fails on the entry
    let resp = send_json(&app, "PUT", &entry_uri, &json!({"quantity": 2})).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Product not found in cart");
}

#[tokio::test]
async fn set_quantity_validates_the_body() {
    let app = build_app();
    let pid = seed_product(&app, &json!({"title": "p"})).await;
    let cid = seed_cart(&app).await;
    let entry_uri = format!("/api/carts/{cid}/products/{pid}");
    send(&app, "POST", &entry_uri).await;

    for body in [
        json!({"quantity": -1}),
        json!({"quantity": "three"}),
        json!({}),
    ] {
        let resp = send_json(&app, "PUT", &entry_uri, &body).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
        let parsed = body_json(resp).await;
        assert_eq!(parsed["status"], "error");
    }
}

#[tokio::test]
async fn add_at_max_quantity_saturates_instead_of_wrapping() {
    let app = build_app();
    let pid = seed_product(&app, &json!({"title": "p"})).await;
    let cid = seed_cart(&app).await;
    let entry_uri = format!("/api/carts/{cid}/products/{pid}");
    send(&app, "POST", &entry_uri).await;

    let resp = send_json(&app, "PUT", &entry_uri, &json!({"quantity": u32::MAX})).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Adding past the maximum keeps the quantity pinned
    let resp = send(&app, "POST", &entry_uri).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["payload"]["products"][0]["quantity"], u32::MAX);
}

#[tokio::test]
async fn out_of_range_quantities_are_rejected() {
    let app = build_app();
    let pid = seed_product(&app, &json!({"title": "p"})).await;
    let cid = seed_cart(&app).await;
    let entry_uri = format!("/api/carts/{cid}/products/{pid}");
    send(&app, "POST", &entry_uri).await;

    let over = u64::from(u32::MAX) + 1;

    let resp = send_json(&app, "PUT", &entry_uri, &json!({"quantity": over})).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "error");

    let resp = send_json(
        &app,
        "PUT",
        &format!("/api/carts/{cid}"),
        &json!({"products": [{"product": pid, "quantity": over}]}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn clear_empties_but_keeps_the_cart() {
    let app = build_app();
    let pid = seed_product(&app, &json!({"title": "p"})).await;
    let cid = seed_cart(&app).await;
    send(&app, "POST", &format!("/api/carts/{cid}/products/{pid}")).await;

    let resp = send(&app, "DELETE", &format!("/api/carts/{cid}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Cart emptied");
    assert_eq!(body["payload"]["products"], json!([]));

    // The cart document itself persists
    let resp = send(&app, "GET", &format!("/api/carts/{cid}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn get_resolves_product_documents() {
    let app = build_app();
    let pid = seed_product(&app, &json!({"title": "Sneaker", "price": 49.99})).await;
    let cid = seed_cart(&app).await;
    send(&app, "POST", &format!("/api/carts/{cid}/products/{pid}")).await;

    let resp = send(&app, "GET", &format!("/api/carts/{cid}")).await;
    let body = body_json(resp).await;
    let entry = &body["payload"]["products"][0];
    assert_eq!(entry["product"]["title"], "Sneaker");
    assert_eq!(entry["product"]["price"], 49.99);
    assert_eq!(entry["quantity"], 1);
}
