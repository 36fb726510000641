//! End-to-end tests for rider acceptance, exclusivity, and earnings.
//!
//! Same prerequisites as `order_lifecycle.rs`, plus a second rider account
//! (and its `QUICKBITE_TEST_RIDER2_COOKIE`) for the race test.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};

use quickbite_integration_tests::{base_url, client_with_session, test_pool};

/// Place an order as the demo customer and walk it to the given status via
/// the restaurant panel. Returns the order id.
async fn order_in_status(status_chain: &[&str]) -> i64 {
    let pool = test_pool().await;
    sqlx::query(
        r"
        INSERT INTO cart (user_id, menu_item_id, quantity)
        SELECT u.id, mi.id, 1
        FROM users u, menu_items mi
        WHERE u.email = 'customer@quickbite.example' AND mi.name = 'Paneer Tikka'
        ON CONFLICT (user_id, menu_item_id) DO UPDATE SET quantity = 1
        ",
    )
    .execute(&pool)
    .await
    .unwrap();

    let customer = client_with_session("QUICKBITE_TEST_USER_COOKIE");
    let placed: Value = customer
        .post(format!("{}/api/orders", base_url()))
        .json(&json!({
            "delivery_address": "1 Test Lane",
            "payment_method": "cod",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let order_id = placed["order_id"].as_i64().unwrap();

    let restaurant = client_with_session("QUICKBITE_TEST_RESTAURANT_COOKIE");
    for status in status_chain {
        let resp = restaurant
            .put(format!("{}/api/restaurant/orders/{order_id}/status", base_url()))
            .json(&json!({ "status": status }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "walking to {status}");
    }

    order_id
}

#[tokio::test]
#[ignore = "Requires running API server and session cookies"]
async fn test_accept_ready_order_keeps_ready_and_locks_out_second_rider() {
    let order_id = order_in_status(&["confirmed", "preparing", "ready"]).await;

    let rider_x = client_with_session("QUICKBITE_TEST_RIDER_COOKIE");
    let resp = rider_x
        .post(format!("{}/api/rider/orders/{order_id}/accept", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Status stays ready after acceptance from ready
    let assigned: Value = rider_x
        .get(format!("{}/api/rider/orders/assigned", base_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ours = assigned["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|o| o["id"].as_i64() == Some(order_id))
        .expect("accepted order in assigned feed");
    assert_eq!(ours["status"], "ready");

    // Second rider is locked out
    let rider_y = client_with_session("QUICKBITE_TEST_RIDER2_COOKIE");
    let resp = rider_y
        .post(format!("{}/api/rider/orders/{order_id}/accept", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Order already assigned to another rider");
}

#[tokio::test]
#[ignore = "Requires running API server and session cookies"]
async fn test_concurrent_accepts_have_exactly_one_winner() {
    let order_id = order_in_status(&["confirmed", "preparing", "ready"]).await;

    let rider_x = client_with_session("QUICKBITE_TEST_RIDER_COOKIE");
    let rider_y = client_with_session("QUICKBITE_TEST_RIDER2_COOKIE");
    let url = format!("{}/api/rider/orders/{order_id}/accept", base_url());

    let (resp_x, resp_y) = tokio::join!(rider_x.post(&url).send(), rider_y.post(&url).send());
    let statuses = [resp_x.unwrap().status(), resp_y.unwrap().status()];

    assert!(statuses.contains(&StatusCode::OK), "one rider wins: {statuses:?}");
    assert!(
        statuses.contains(&StatusCode::CONFLICT),
        "the other gets 409: {statuses:?}"
    );

    // rider_id is set exactly once
    let pool = test_pool().await;
    let rider_id: Option<i32> = sqlx::query_scalar("SELECT rider_id FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(rider_id.is_some());
}

#[tokio::test]
#[ignore = "Requires running API server and session cookies"]
async fn test_accept_confirmed_order_advances_to_preparing() {
    let order_id = order_in_status(&["confirmed"]).await;

    let rider = client_with_session("QUICKBITE_TEST_RIDER_COOKIE");
    let resp = rider
        .post(format!("{}/api/rider/orders/{order_id}/accept", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let pool = test_pool().await;
    let status: String = sqlx::query_scalar("SELECT status::text FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "preparing");
}

#[tokio::test]
#[ignore = "Requires running API server and session cookies"]
async fn test_accept_pending_order_is_not_available() {
    let order_id = order_in_status(&[]).await;

    let rider = client_with_session("QUICKBITE_TEST_RIDER_COOKIE");
    let resp = rider
        .post(format!("{}/api/rider/orders/{order_id}/accept", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Order is not available for pickup");
}

#[tokio::test]
#[ignore = "Requires running API server and session cookies"]
async fn test_delivery_updates_history_and_earnings() {
    let order_id = order_in_status(&["confirmed", "preparing", "ready"]).await;

    let rider = client_with_session("QUICKBITE_TEST_RIDER_COOKIE");
    rider
        .post(format!("{}/api/rider/orders/{order_id}/accept", base_url()))
        .send()
        .await
        .unwrap();

    for status in ["on_the_way", "delivered"] {
        let resp = rider
            .put(format!("{}/api/rider/orders/{order_id}/status", base_url()))
            .json(&json!({ "status": status }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "setting {status}");
    }

    // Delivered order appears in history
    let history: Value = rider
        .get(format!("{}/api/rider/orders/history", base_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(
        history["data"]
            .as_array()
            .unwrap()
            .iter()
            .any(|o| o["id"].as_i64() == Some(order_id))
    );

    // Today's earnings include this delivery's fee
    let earnings: Value = rider
        .get(format!("{}/api/rider/earnings", base_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let today: rust_decimal::Decimal =
        earnings["summary"]["today_earnings"].as_str().unwrap().parse().unwrap();
    assert!(today >= rust_decimal::Decimal::from(40));
}

#[tokio::test]
#[ignore = "Requires running API server and session cookies"]
async fn test_earnings_zero_filled_for_idle_rider() {
    // Second rider has no deliveries in a fresh seed
    let rider = client_with_session("QUICKBITE_TEST_RIDER2_COOKIE");
    let resp = rider
        .get(format!("{}/api/rider/earnings", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    for window in ["today_earnings", "week_earnings", "month_earnings", "total_earnings"] {
        let sum: rust_decimal::Decimal =
            body["summary"][window].as_str().unwrap().parse().unwrap();
        assert_eq!(sum, rust_decimal::Decimal::ZERO, "{window}");
    }
}
