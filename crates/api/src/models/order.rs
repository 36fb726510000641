//! Order models and the role-scoped read projections.
//!
//! Each actor sees orders through its own projection: customers get
//! restaurant branding, restaurants get customer contact details, riders get
//! both addresses. The flat row structs map 1:1 onto the list queries in
//! `db::orders`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use quickbite_core::{MenuItemId, OrderId, OrderStatus, RestaurantId, RiderId, UserId};

/// A row of the `orders` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    /// Null until exactly one rider accepts; immutable afterwards.
    pub rider_id: Option<RiderId>,
    pub total_amount: Decimal,
    pub delivery_fee: Decimal,
    pub delivery_address: String,
    pub payment_method: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order item joined with its menu entry, for order detail views.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItemLine {
    pub menu_item_id: MenuItemId,
    pub name: String,
    pub is_veg: bool,
    pub image_url: Option<String>,
    pub quantity: i32,
    /// Price frozen at order time, not the live menu price.
    pub price: Decimal,
}

/// Customer-facing order list entry.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CustomerOrderSummary {
    pub id: OrderId,
    pub restaurant_id: RestaurantId,
    pub restaurant_name: String,
    pub restaurant_image: Option<String>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub item_count: i64,
}

/// Customer-facing order detail.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CustomerOrderDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub order: Order,
    pub restaurant_name: String,
    pub restaurant_image: Option<String>,
    #[sqlx(skip)]
    pub items: Vec<OrderItemLine>,
}

/// Restaurant-facing order list entry.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RestaurantOrderSummary {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub total_amount: Decimal,
    pub delivery_address: String,
    pub payment_method: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub item_count: i64,
}

/// Restaurant-facing order detail.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RestaurantOrderDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub order: Order,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    #[sqlx(skip)]
    pub items: Vec<OrderItemLine>,
}

/// Rider-facing order list entry (available, assigned, and history feeds).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RiderOrderSummary {
    pub id: OrderId,
    pub restaurant_name: String,
    pub restaurant_address: Option<String>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub delivery_address: String,
    pub total_amount: Decimal,
    pub delivery_fee: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub item_count: i64,
}
