//! Cart behaviour against a scripted backend: optimistic updates,
//! per-product de-duplication, reconciliation and rollback.

mod common;

use std::sync::{Arc, Mutex};

use reqwest::Method;
use rust_decimal::Decimal;
use serde_json::json;

use buygreen_sdk::prelude::*;
use buygreen_sdk::session::{AUTH_TOKEN_KEY, CUSTOMER_KEY};
use common::*;

fn bag_line(quantity: u32) -> serde_json::Value {
    json!({"id": 1, "productId": 3, "productName": "Jute Bag", "price": 250.0, "quantity": quantity})
}

#[tokio::test]
async fn add_sends_request_and_reconciles() {
    let transport = FakeTransport::new();
    transport
        .respond(Method::POST, "/cart/add", 200, "Item added to cart")
        .json(Method::GET, "/cart/7", json!([bag_line(2)]));
    let (client, _) = signed_in(transport.clone());

    client
        .cart()
        .add(&product(3, "Jute Bag", "250"), 2)
        .await
        .unwrap();

    let adds = transport.calls(Method::POST, "/cart/add");
    assert_eq!(adds.len(), 1);
    let body = body_json(&adds[0]);
    assert_eq!(body["customerId"], 7);
    assert_eq!(body["productId"], 3);
    assert_eq!(body["quantity"], 2);
    assert_eq!(
        adds[0].header("Authorization"),
        Some(format!("Bearer {TOKEN}").as_str())
    );

    let items = client.cart().items().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, Some(1));
    assert_eq!(client.cart().count().await, 2);
    assert_eq!(client.cart().subtotal().await, Decimal::from(500));
}

#[tokio::test]
async fn duplicate_add_while_in_flight_sends_one_request() {
    let transport = FakeTransport::new();
    let gate = Gate::new();
    transport
        .hold(Method::POST, "/cart/add", &gate, 200, "Item added to cart")
        .json(Method::GET, "/cart/7", json!([bag_line(1)]));
    let (client, _) = signed_in(transport.clone());
    let bag = product(3, "Jute Bag", "250");

    let (first, second) = tokio::join!(
        async { client.cart().add(&bag, 1).await },
        async {
            while !client.cart().is_pending("add-3") {
                tokio::task::yield_now().await;
            }
            let second = client.cart().add(&bag, 1).await;
            // Only the first call's optimistic line exists.
            assert_eq!(client.cart().count().await, 1);
            gate.open();
            second
        }
    );

    first.unwrap();
    second.unwrap();
    assert_eq!(transport.count(Method::POST, "/cart/add"), 1);
    assert_eq!(client.cart().count().await, 1);
    assert!(!client.cart().is_pending("add-3"));
}

#[tokio::test]
async fn add_when_signed_out_touches_nothing() {
    let transport = FakeTransport::new();
    let client = signed_out(transport.clone());

    let err = client
        .cart()
        .add(&product(3, "Jute Bag", "250"), 1)
        .await
        .unwrap_err();

    assert!(matches!(err, SdkError::Auth(AuthError::NotAuthenticated)));
    assert!(transport.requests().is_empty());
    assert!(client.cart().items().await.is_empty());
}

#[tokio::test]
async fn zero_quantity_is_rejected_locally() {
    let transport = FakeTransport::new();
    let (client, _) = signed_in(transport.clone());

    let err = client
        .cart()
        .add(&product(3, "Jute Bag", "250"), 0)
        .await
        .unwrap_err();

    assert!(matches!(err, SdkError::InvalidArgument(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn refused_add_surfaces_server_text() {
    let transport = FakeTransport::new();
    transport
        .respond(Method::POST, "/cart/add", 200, "Only 2 left in stock")
        .json(Method::GET, "/cart/7", json!([]));
    let (client, _) = signed_in(transport.clone());

    let err = client
        .cart()
        .add(&product(3, "Jute Bag", "250"), 5)
        .await
        .unwrap_err();

    assert!(matches!(err, SdkError::Rejected(ref m) if m == "Only 2 left in stock"));
    assert!(client.cart().items().await.is_empty());
}

#[tokio::test]
async fn failed_add_with_failed_refresh_rolls_back() {
    let transport = FakeTransport::new();
    transport
        .respond(Method::POST, "/cart/add", 500, r#"{"message":"db down"}"#)
        .respond(Method::GET, "/cart/7", 500, "");
    let (client, _) = signed_in(transport.clone());

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    client.subscribe(move |event| {
        if let StoreEvent::CartChanged(state) = event {
            sink.lock().unwrap().push(state.count());
        }
    });

    let err = client
        .cart()
        .add(&product(3, "Jute Bag", "250"), 1)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "db down");
    assert!(client.cart().items().await.is_empty());
    // Optimistic line, then rollback.
    assert_eq!(*events.lock().unwrap(), vec![1, 0]);
    // The refresh is a GET: initial attempt plus two retries.
    assert_eq!(transport.count(Method::GET, "/cart/7"), 3);
}

#[tokio::test]
async fn decrement_last_unit_removes_line() {
    let transport = FakeTransport::new();
    transport
        .json(Method::GET, "/cart/7", json!([bag_line(1)]))
        .json(Method::GET, "/cart/7", json!([]))
        .respond(Method::PUT, "/cart/decrement", 200, "");
    let (client, _) = signed_in(transport.clone());

    client.cart().fetch().await.unwrap();
    assert_eq!(client.cart().count().await, 1);

    client
        .cart()
        .decrement(ProductId::new(3))
        .await
        .unwrap();

    assert!(client.cart().items().await.is_empty());
    let puts = transport.calls(Method::PUT, "/cart/decrement");
    assert_eq!(body_json(&puts[0]), json!({"customerId": 7, "productId": 3}));
}

#[tokio::test]
async fn decrement_forbidden_means_session_expired() {
    let transport = FakeTransport::new();
    transport
        .json(Method::GET, "/cart/7", json!([bag_line(2)]))
        .respond(Method::PUT, "/cart/decrement", 403, "");
    let (client, _) = signed_in(transport.clone());
    client.cart().fetch().await.unwrap();

    let err = client
        .cart()
        .decrement(ProductId::new(3))
        .await
        .unwrap_err();

    assert!(matches!(err, SdkError::Auth(AuthError::SessionExpired)));
    // Refresh succeeded, so the server's cart wins.
    assert_eq!(client.cart().count().await, 2);
    assert!(client.auth().is_authenticated());
}

#[tokio::test]
async fn decrement_unauthorized_requires_login() {
    let transport = FakeTransport::new();
    transport
        .json(Method::GET, "/cart/7", json!([bag_line(2)]))
        .respond(Method::PUT, "/cart/decrement", 401, "");
    let (client, store) = signed_in(transport.clone());
    client.cart().fetch().await.unwrap();

    let err = client
        .cart()
        .decrement(ProductId::new(3))
        .await
        .unwrap_err();

    assert!(matches!(err, SdkError::Auth(AuthError::LoginRequired)));
    assert!(!client.auth().is_authenticated());
    assert!(store.get(AUTH_TOKEN_KEY).unwrap().is_none());
    assert!(store.get(CUSTOMER_KEY).unwrap().is_none());
    // Signed out now, so reconciling empties the cart without another read.
    assert!(client.cart().items().await.is_empty());
    assert_eq!(transport.count(Method::GET, "/cart/7"), 1);
}

#[tokio::test]
async fn fetch_signed_out_empties_without_request() {
    let transport = FakeTransport::new();
    let client = signed_out(transport.clone());

    assert!(client.cart().fetch().await.unwrap().is_empty());
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn logout_clears_cart_and_keeps_history() {
    let transport = FakeTransport::new();
    transport.json(Method::GET, "/cart/7", json!([bag_line(1)]));
    let (client, _) = signed_in(transport.clone());
    client.cart().fetch().await.unwrap();
    client.history().add(&product(3, "Jute Bag", "250"));

    client.auth().logout().await;

    assert!(client.cart().items().await.is_empty());
    assert!(!client.auth().is_authenticated());
    assert_eq!(client.history().recent(6).len(), 1);
}
