//! Restaurant-facing order routes: the kitchen queue and status progression.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use quickbite_core::{OrderId, OrderStatus};

use crate::{
    db::{OrderError, OrderRepository},
    error::{ApiError, Result},
    middleware::auth::RequireRestaurant,
    state::AppState,
};

/// Build the restaurant order router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/restaurant/orders", get(list_orders))
        .route("/api/restaurant/orders/{id}", get(get_order))
        .route("/api/restaurant/orders/{id}/status", put(set_status))
}

/// Query parameters for the order list.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Optional status filter.
    pub status: Option<String>,
}

/// Request body for a status update.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: Option<String>,
}

/// Response for a status update.
#[derive(Debug, Serialize)]
pub struct SetStatusResponse {
    pub success: bool,
    pub message: &'static str,
}

/// List the restaurant's orders, optionally filtered by status, newest first.
///
/// # Errors
///
/// 400 for an unknown status value.
pub async fn list_orders(
    RequireRestaurant(restaurant): RequireRestaurant,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let orders = OrderRepository::new(state.pool())
        .list_for_restaurant(restaurant.id, status)
        .await?;

    Ok(Json(json!({
        "success": true,
        "count": orders.len(),
        "data": orders,
    })))
}

/// Get one of the restaurant's orders, with items and customer contact.
///
/// # Errors
///
/// 404 if the order does not exist or belongs to another restaurant.
pub async fn get_order(
    RequireRestaurant(restaurant): RequireRestaurant,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<serde_json::Value>> {
    let order = OrderRepository::new(state.pool())
        .get_for_restaurant(id, restaurant.id)
        .await?
        .ok_or(ApiError::Order(OrderError::NotFound))?;

    Ok(Json(json!({ "success": true, "data": order })))
}

/// Apply a restaurant-driven status transition.
///
/// Resubmitting the current status succeeds as a no-op; anything outside the
/// transition table is a 400 naming both states.
///
/// # Errors
///
/// 400 for a status restaurants may not set or a disallowed transition, 404
/// if the order is not this restaurant's.
pub async fn set_status(
    RequireRestaurant(restaurant): RequireRestaurant,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(body): Json<SetStatusRequest>,
) -> Result<Json<SetStatusResponse>> {
    let status = parse_restaurant_status(body.status.as_deref())?;

    OrderRepository::new(state.pool())
        .restaurant_set_status(id, restaurant.id, status)
        .await?;

    tracing::info!(
        order_id = %id,
        restaurant_id = %restaurant.id,
        status = %status,
        "restaurant updated order status"
    );

    Ok(Json(SetStatusResponse {
        success: true,
        message: "Order status updated",
    }))
}

/// Parse and gate a restaurant-submitted status value.
fn parse_restaurant_status(raw: Option<&str>) -> Result<OrderStatus> {
    let invalid = || {
        ApiError::BadRequest(
            "Invalid status. Restaurants can only set: pending, confirmed, preparing, ready, or cancelled"
                .to_string(),
        )
    };

    let raw = raw.ok_or_else(|| ApiError::BadRequest("Order status is required".to_string()))?;
    let status: OrderStatus = raw.parse().map_err(|_| invalid())?;
    if !status.is_restaurant_settable() {
        return Err(invalid());
    }
    Ok(status)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_restaurant_status_accepts_kitchen_states() {
        for raw in ["pending", "confirmed", "preparing", "ready", "cancelled"] {
            assert!(parse_restaurant_status(Some(raw)).is_ok(), "{raw}");
        }
    }

    #[test]
    fn test_parse_restaurant_status_rejects_rider_states() {
        assert!(parse_restaurant_status(Some("on_the_way")).is_err());
        assert!(parse_restaurant_status(Some("delivered")).is_err());
    }

    #[test]
    fn test_parse_restaurant_status_rejects_unknown_and_missing() {
        assert!(parse_restaurant_status(Some("en_route")).is_err());
        assert!(parse_restaurant_status(None).is_err());
    }
}
