//! Rider-facing routes: pickup feeds, delivery progression, and earnings.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use quickbite_core::{OrderId, OrderStatus};

use crate::{
    db::{OrderRepository, RiderRepository},
    error::{ApiError, Result},
    middleware::auth::RequireRider,
    state::AppState,
};

/// Build the rider router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/rider/orders/available", get(available_orders))
        .route("/api/rider/orders/assigned", get(assigned_orders))
        .route("/api/rider/orders/history", get(delivery_history))
        .route("/api/rider/orders/{id}/accept", post(accept_order))
        .route("/api/rider/orders/{id}/status", put(set_status))
        .route("/api/rider/earnings", get(earnings))
}

/// Request body for a rider status update.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: Option<String>,
}

/// Response for accept and status-update actions.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Orders ready for pickup and not yet claimed by any rider, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn available_orders(
    RequireRider(_rider): RequireRider,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let orders = OrderRepository::new(state.pool()).available_for_riders().await?;

    Ok(Json(json!({ "success": true, "data": orders })))
}

/// The rider's active assignments.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn assigned_orders(
    RequireRider(rider): RequireRider,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let orders = OrderRepository::new(state.pool())
        .assigned_to_rider(rider.id)
        .await?;

    Ok(Json(json!({ "success": true, "data": orders })))
}

/// The rider's recent deliveries.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn delivery_history(
    RequireRider(rider): RequireRider,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let orders = OrderRepository::new(state.pool())
        .history_for_rider(rider.id)
        .await?;

    Ok(Json(json!({ "success": true, "data": orders })))
}

/// Claim an order for pickup.
///
/// At most one rider ever wins a given order; a lost race reports the same
/// 409 as finding the order already assigned.
///
/// # Errors
///
/// 404 unknown order, 409 already assigned, 400 not available for pickup.
pub async fn accept_order(
    RequireRider(rider): RequireRider,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<ActionResponse>> {
    OrderRepository::new(state.pool()).accept(id, rider.id).await?;

    tracing::info!(order_id = %id, rider_id = %rider.id, "rider accepted order");

    Ok(Json(ActionResponse {
        success: true,
        message: "Order accepted successfully",
    }))
}

/// Apply a rider-driven status update to an assigned order.
///
/// # Errors
///
/// 400 for a status riders may not set, 404 if the order is not assigned to
/// this rider.
pub async fn set_status(
    RequireRider(rider): RequireRider,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(body): Json<SetStatusRequest>,
) -> Result<Json<ActionResponse>> {
    let status = parse_rider_status(body.status.as_deref())?;

    OrderRepository::new(state.pool())
        .rider_set_status(id, rider.id, status)
        .await?;

    tracing::info!(
        order_id = %id,
        rider_id = %rider.id,
        status = %status,
        "rider updated order status"
    );

    Ok(Json(ActionResponse {
        success: true,
        message: "Order status updated",
    }))
}

/// The rider's earnings summary: today, this week, this month, all time.
///
/// Always 200; riders with no deliveries get zeros.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn earnings(
    RequireRider(rider): RequireRider,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let summary = RiderRepository::new(state.pool()).earnings(rider.id).await?;

    Ok(Json(json!({ "success": true, "summary": summary })))
}

/// Parse and gate a rider-submitted status value.
fn parse_rider_status(raw: Option<&str>) -> Result<OrderStatus> {
    let invalid = || ApiError::BadRequest("Invalid status".to_string());

    let raw = raw.ok_or_else(|| ApiError::BadRequest("Order status is required".to_string()))?;
    let status: OrderStatus = raw.parse().map_err(|_| invalid())?;
    if !status.is_rider_settable() {
        return Err(invalid());
    }
    Ok(status)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rider_status_accepts_delivery_states() {
        for raw in ["preparing", "ready", "on_the_way", "delivered"] {
            assert!(parse_rider_status(Some(raw)).is_ok(), "{raw}");
        }
    }

    #[test]
    fn test_parse_rider_status_rejects_restaurant_states() {
        assert!(parse_rider_status(Some("pending")).is_err());
        assert!(parse_rider_status(Some("confirmed")).is_err());
        assert!(parse_rider_status(Some("cancelled")).is_err());
    }

    #[test]
    fn test_parse_rider_status_rejects_unknown_and_missing() {
        assert!(parse_rider_status(Some("airborne")).is_err());
        assert!(parse_rider_status(None).is_err());
    }
}
