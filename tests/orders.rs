//! Order placement, response normalization, history and checkout recovery.

mod common;

use std::time::Duration;

use chrono::Utc;
use reqwest::Method;
use rust_decimal::Decimal;
use serde_json::json;

use buygreen_sdk::prelude::*;
use common::*;

fn item(product_id: i64, price: i64, quantity: u32) -> OrderItem {
    OrderItem {
        id: None,
        product_id: ProductId::new(product_id),
        product_name: format!("Product {product_id}"),
        price: Decimal::from(price),
        quantity,
    }
}

fn paid_request() -> PlaceOrderRequest {
    PlaceOrderRequest::paid(vec![item(3, 250, 2)], Decimal::from(500))
}

/// Backend timestamps are zone-less local date-times.
fn minutes_ago(minutes: i64) -> String {
    (Utc::now() - chrono::Duration::minutes(minutes))
        .naive_utc()
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

#[tokio::test]
async fn empty_order_sends_nothing() {
    let transport = FakeTransport::new();
    let (client, _) = signed_in(transport.clone());

    let err = client
        .orders()
        .place(PlaceOrderRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SdkError::EmptyOrder));
    assert_eq!(err.to_string(), "No items to order. Cart is empty.");
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn created_order_shapes_are_normalized() {
    let cases = [
        (json!({"id": 42, "status": "PENDING"}), 42),
        (json!({"message": "ok", "order": {"id": 43}}), 43),
        (json!({"orderId": "44"}), 44),
    ];

    for (body, expected) in cases {
        let transport = FakeTransport::new();
        transport.json(Method::POST, "/orders/create", body);
        let (client, _) = signed_in(transport);

        let order = client.orders().place(paid_request()).await.unwrap();
        assert_eq!(order.id, OrderId::new(expected));
    }
}

#[tokio::test]
async fn unrecognized_order_shape_is_an_error() {
    let transport = FakeTransport::new();
    transport.json(Method::POST, "/orders/create", json!({}));
    let (client, _) = signed_in(transport);

    let err = client.orders().place(paid_request()).await.unwrap_err();
    assert!(matches!(err, SdkError::UnexpectedResponse(_)));
}

#[tokio::test]
async fn order_body_falls_back_to_profile_address() {
    let transport = FakeTransport::new();
    transport.json(Method::POST, "/orders/create", json!({"id": 42}));
    let (client, _) = signed_in(transport.clone());

    let request = paid_request()
        .with_address(AddressData {
            city: Some("  Pune ".into()),
            street: Some("   ".into()),
            ..AddressData::default()
        })
        .with_coupon("GREEN10");
    client.orders().place(request).await.unwrap();

    let calls = transport.calls(Method::POST, "/orders/create");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].timeout, Duration::from_secs(60));
    let body = body_json(&calls[0]);
    assert_eq!(body["customerId"], 7);
    assert_eq!(body["totalAmount"].as_f64(), Some(500.0));
    assert_eq!(body["shippingAddress"], "12 Green Lane");
    assert_eq!(body["city"], "Pune");
    assert!(body["street"].is_null());
    assert_eq!(body["couponCode"], "GREEN10");
    assert_eq!(body["items"][0]["productId"], 3);
}

#[tokio::test]
async fn ordering_the_cart_refreshes_it() {
    let transport = FakeTransport::new();
    transport
        .json(
            Method::GET,
            "/cart/7",
            json!([{"id": 1, "productId": 3, "productName": "Jute Bag", "price": 250.0, "quantity": 2}]),
        )
        .json(Method::GET, "/cart/7", json!([]))
        .json(Method::POST, "/orders/create", json!({"id": 42}));
    let (client, _) = signed_in(transport.clone());
    client.cart().fetch().await.unwrap();

    let order = client
        .orders()
        .place(PlaceOrderRequest::default())
        .await
        .unwrap();

    assert_eq!(order.id, OrderId::new(42));
    let body = body_json(&transport.calls(Method::POST, "/orders/create")[0]);
    assert_eq!(body["totalAmount"].as_f64(), Some(500.0));
    assert!(client.cart().items().await.is_empty());
}

#[tokio::test]
async fn forbidden_order_uses_support_message() {
    let transport = FakeTransport::new();
    transport.respond(Method::POST, "/orders/create", 403, "");
    let (client, _) = signed_in(transport);

    let err = client.orders().place(paid_request()).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "You do not have permission to place orders. Please contact support."
    );
}

#[tokio::test]
async fn history_skips_unreadable_entries() {
    let transport = FakeTransport::new();
    transport.json(
        Method::GET,
        "/orders/customer/7",
        json!([
            {"id": 1, "totalAmount": 99.5, "orderDate": "2024-03-05T10:15:30", "items": null},
            {"status": "PENDING"},
            {"id": 2, "totalAmount": 10.0}
        ]),
    );
    let (client, _) = signed_in(transport);

    let orders = client.orders().fetch().await.unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders[0].order_date.is_some());
    assert!(orders[0].items.is_empty());
}

#[tokio::test]
async fn raw_history_is_returned_unmodified() {
    let transport = FakeTransport::new();
    let history = json!([
        {"id": 1, "totalAmount": 99.5, "paymentId": "pay_1"},
        {"status": "PENDING"}
    ]);
    transport.json(Method::GET, "/orders/customer/7", history.clone());
    let (client, _) = signed_in(transport);

    let raw = client.orders().fetch_raw().await.unwrap();
    assert_eq!(serde_json::Value::Array(raw), history);
}

// ── Checkout ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn checkout_placed() {
    let transport = FakeTransport::new();
    transport.json(Method::POST, "/orders/create", json!({"id": 42}));
    let (client, _) = signed_in(transport);

    let outcome = client.checkout().place(paid_request()).await.unwrap();
    assert!(matches!(outcome, CheckoutOutcome::Placed(ref o) if o.id == OrderId::new(42)));
}

#[tokio::test]
async fn checkout_recovers_order_after_failure() {
    let transport = FakeTransport::new();
    transport
        .fail(
            Method::POST,
            "/orders/create",
            TransportError::Network("connection reset".into()),
        )
        .json(
            Method::GET,
            "/orders/customer/7",
            json!([
                {"id": 90, "totalAmount": 500.0, "orderDate": minutes_ago(1)},
                {"id": 80, "totalAmount": 500.0, "orderDate": minutes_ago(30)}
            ]),
        );
    let (client, _) = signed_in(transport);

    let outcome = client.checkout().place(paid_request()).await.unwrap();
    match outcome {
        CheckoutOutcome::Recovered(order) => assert_eq!(order.id, OrderId::new(90)),
        other => panic!("expected recovery, got {other:?}"),
    }
}

#[tokio::test]
async fn checkout_failure_without_match_returns_error() {
    let transport = FakeTransport::new();
    transport
        .respond(Method::POST, "/orders/create", 500, r#"{"message":"payment mismatch"}"#)
        .json(
            Method::GET,
            "/orders/customer/7",
            json!([{"id": 80, "totalAmount": 500.0, "orderDate": minutes_ago(30)}]),
        );
    let (client, _) = signed_in(transport);

    let err = client.checkout().place(paid_request()).await.unwrap_err();
    assert_eq!(err.to_string(), "payment mismatch");
}

#[tokio::test]
async fn checkout_watchdog_hands_back_pending_order() {
    let transport = FakeTransport::new();
    let gate = Gate::new();
    transport
        .hold(Method::POST, "/orders/create", &gate, 200, r#"{"id": 42}"#)
        .json(
            Method::GET,
            "/orders/customer/7",
            json!([{"id": 41, "totalAmount": 500.0, "orderDate": minutes_ago(0)}]),
        );
    let client = builder(transport.clone(), customer_store("customer"))
        .order_watchdog(Duration::from_millis(50))
        .build()
        .unwrap();

    let outcome = client.checkout().place(paid_request()).await.unwrap();
    let CheckoutOutcome::Stalled(pending) = outcome else {
        panic!("expected the watchdog to fire");
    };
    assert_eq!(pending.expected_total(), Decimal::from(500));

    let found = pending.recover().await.unwrap();
    assert_eq!(found.map(|o| o.id), Some(OrderId::new(41)));

    // The original request was never cancelled.
    gate.open();
    let order = pending.wait().await.unwrap();
    assert_eq!(order.id, OrderId::new(42));
    assert_eq!(transport.count(Method::POST, "/orders/create"), 1);
}

#[tokio::test]
async fn abandoned_checkout_still_completes() {
    let transport = FakeTransport::new();
    let gate = Gate::new();
    transport
        .json(
            Method::GET,
            "/cart/7",
            json!([{"id": 1, "productId": 3, "productName": "Jute Bag", "price": 250.0, "quantity": 2}]),
        )
        .json(Method::GET, "/cart/7", json!([]))
        .hold(Method::POST, "/orders/create", &gate, 200, r#"{"id": 42}"#);
    let client = builder(transport.clone(), customer_store("customer"))
        .order_watchdog(Duration::from_millis(50))
        .build()
        .unwrap();
    client.cart().fetch().await.unwrap();

    let outcome = client
        .checkout()
        .place(PlaceOrderRequest::default())
        .await
        .unwrap();
    assert!(matches!(outcome, CheckoutOutcome::Stalled(_)));
    drop(outcome);

    gate.open();
    for _ in 0..40 {
        if client.cart().items().await.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(transport.count(Method::GET, "/cart/7"), 2);
    assert!(client.cart().items().await.is_empty());
}

#[tokio::test]
async fn find_recent_ignores_mismatched_totals() {
    let transport = FakeTransport::new();
    transport.json(
        Method::GET,
        "/orders/customer/7",
        json!([{"id": 90, "totalAmount": 501.0, "orderDate": minutes_ago(1)}]),
    );
    let (client, _) = signed_in(transport);

    let found = client
        .orders()
        .find_recent(Decimal::from(500))
        .await
        .unwrap();
    assert!(found.is_none());
}
