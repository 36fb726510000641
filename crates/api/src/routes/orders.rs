//! Customer-facing order routes: placement and tracking.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use quickbite_core::OrderId;

use crate::{
    db::{OrderError, OrderRepository},
    error::{ApiError, Result},
    middleware::auth::RequireUser,
    state::AppState,
};

/// Build the customer order router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", post(place_order).get(list_orders))
        .route("/api/orders/{id}", get(get_order))
}

/// Request body for placing an order.
///
/// Fields are optional so a missing one produces the API's own 400 message
/// instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub delivery_address: Option<String>,
    pub payment_method: Option<String>,
}

/// Response for a successfully placed order.
#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub success: bool,
    pub message: &'static str,
    pub order_id: OrderId,
    /// Rounded to two decimal places; the stored amount keeps full precision.
    pub total_amount: Decimal,
}

/// Place a new order from the user's cart.
///
/// # Errors
///
/// 400 for a missing field, empty cart, or mixed-restaurant cart; the cart
/// is left untouched on every failure.
pub async fn place_order(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>)> {
    let (Some(delivery_address), Some(payment_method)) =
        (body.delivery_address, body.payment_method)
    else {
        return Err(ApiError::BadRequest(
            "Delivery address and payment method are required".to_string(),
        ));
    };

    let placed = OrderRepository::new(state.pool())
        .place_order(user.id, &delivery_address, &payment_method)
        .await?;

    tracing::info!(order_id = %placed.id, user_id = %user.id, "order placed");

    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            success: true,
            message: "Order placed successfully",
            order_id: placed.id,
            total_amount: placed.totals.total_rounded(),
        }),
    ))
}

/// List the authenticated user's orders, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_orders(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_customer(user.id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "count": orders.len(),
        "data": orders,
    })))
}

/// Get one of the authenticated user's orders, with items.
///
/// # Errors
///
/// 404 if the order does not exist or belongs to another user.
pub async fn get_order(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<serde_json::Value>> {
    let order = OrderRepository::new(state.pool())
        .get_for_customer(id, user.id)
        .await?
        .ok_or(ApiError::Order(OrderError::NotFound))?;

    Ok(Json(json!({ "success": true, "data": order })))
}
