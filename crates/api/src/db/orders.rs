//! Order repository: assembly, status transitions, and role-scoped reads.
//!
//! This is the transactional heart of the engine. Two rules are enforced at
//! the store level rather than in application code:
//!
//! - Order assembly (order row + items + cart clear) runs in one serializable
//!   transaction; a failure at any step rolls back all three writes.
//! - Rider assignment is a single conditional `UPDATE ... WHERE rider_id IS
//!   NULL`. Whoever commits first wins; the loser sees zero rows affected.
//!   There is deliberately no read-then-write fallback path.

use sqlx::PgPool;
use thiserror::Error;

use quickbite_core::{
    OrderId, OrderStatus, OrderTotals, RestaurantId, RiderId, TransitionError, UserId,
};

use super::{RepositoryError, carts};
use crate::models::{
    CustomerOrderDetail, CustomerOrderSummary, OrderItemLine, RestaurantOrderDetail,
    RestaurantOrderSummary, RiderOrderSummary,
};

/// Errors produced by the order engine.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Order absent, or not visible to the acting identity.
    #[error("Order not found")]
    NotFound,

    /// Placement attempted with no cart lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cart lines span more than one restaurant.
    #[error("All items must be from the same restaurant")]
    MixedRestaurants,

    /// Another rider holds the assignment.
    #[error("Order already assigned to another rider")]
    AlreadyAssigned,

    /// Order status does not allow pickup.
    #[error("Order is not available for pickup")]
    NotAvailable,

    /// The acting authority's transition table disallows the move.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Underlying store failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

/// Result of a successful order placement.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    /// ID of the freshly created order.
    pub id: OrderId,
    /// Price breakdown frozen into the order.
    pub totals: OrderTotals,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Order assembly
    // =========================================================================

    /// Convert the user's cart into an immutable order snapshot.
    ///
    /// Runs as one serializable transaction: cart snapshot read, order row
    /// insert, item inserts at the snapshot prices, cart clear. A concurrent
    /// second placement for the same user serializes behind this one and then
    /// fails on the empty-cart check.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyCart` / `OrderError::MixedRestaurants` with
    /// no side effects, or `OrderError::Repository` if the store fails.
    pub async fn place_order(
        &self,
        user_id: UserId,
        delivery_address: &str,
        payment_method: &str,
    ) -> Result<PlacedOrder, OrderError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        let lines = carts::snapshot_lines(&mut tx, user_id).await?;

        let Some(first) = lines.first() else {
            return Err(OrderError::EmptyCart);
        };
        let restaurant_id = first.restaurant_id;
        if lines.iter().any(|line| line.restaurant_id != restaurant_id) {
            return Err(OrderError::MixedRestaurants);
        }

        let priced: Vec<_> = lines.iter().map(crate::models::CartLine::priced).collect();
        let totals = OrderTotals::from_lines(&priced);

        let order_id: OrderId = sqlx::query_scalar(
            r"
            INSERT INTO orders (
                user_id, restaurant_id, total_amount, delivery_fee,
                delivery_address, payment_method, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(restaurant_id)
        .bind(totals.total)
        .bind(totals.delivery_fee)
        .bind(delivery_address)
        .bind(payment_method)
        .bind(OrderStatus::INITIAL)
        .fetch_one(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, menu_item_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order_id)
            .bind(line.menu_item_id)
            .bind(line.quantity)
            .bind(line.price)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM cart WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(PlacedOrder { id: order_id, totals })
    }

    // =========================================================================
    // Status machine - restaurant authority
    // =========================================================================

    /// Apply a restaurant-driven status transition.
    ///
    /// Same-status resubmission succeeds (the update still runs, touching
    /// `updated_at`, as the apps rely on for ordering). The update is guarded
    /// by the observed status so a concurrent transition surfaces as
    /// `NotFound` instead of silently overwriting.
    ///
    /// # Errors
    ///
    /// `OrderError::NotFound` if the order does not belong to the restaurant,
    /// `OrderError::Transition` if the move is not in the transition table.
    pub async fn restaurant_set_status(
        &self,
        order_id: OrderId,
        restaurant_id: RestaurantId,
        new_status: OrderStatus,
    ) -> Result<(), OrderError> {
        let current: Option<OrderStatus> = sqlx::query_scalar(
            "SELECT status FROM orders WHERE id = $1 AND restaurant_id = $2",
        )
        .bind(order_id)
        .bind(restaurant_id)
        .fetch_optional(self.pool)
        .await?;

        let current = current.ok_or(OrderError::NotFound)?;
        current.restaurant_transition(new_status)?;

        let result = sqlx::query(
            r"
            UPDATE orders
            SET status = $1, updated_at = NOW()
            WHERE id = $2 AND restaurant_id = $3 AND status = $4
            ",
        )
        .bind(new_status)
        .bind(order_id)
        .bind(restaurant_id)
        .bind(current)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(OrderError::NotFound);
        }

        Ok(())
    }

    // =========================================================================
    // Status machine - rider authority
    // =========================================================================

    /// Accept an order for pickup.
    ///
    /// Assignment and status change are one conditional update; `WHERE
    /// rider_id IS NULL` is the sole guard against double-assignment, so at
    /// most one rider ever wins a race on the same order. A `confirmed` order
    /// advances to `preparing`; a `ready` order stays `ready`.
    ///
    /// # Errors
    ///
    /// `OrderError::NotFound` for unknown orders, `OrderError::AlreadyAssigned`
    /// when another rider holds (or just won) the assignment,
    /// `OrderError::NotAvailable` when the status does not allow pickup.
    pub async fn accept(&self, order_id: OrderId, rider_id: RiderId) -> Result<(), OrderError> {
        let row: Option<(Option<RiderId>, OrderStatus)> =
            sqlx::query_as("SELECT rider_id, status FROM orders WHERE id = $1")
                .bind(order_id)
                .fetch_optional(self.pool)
                .await?;

        let (assigned, status) = row.ok_or(OrderError::NotFound)?;
        if assigned.is_some() {
            return Err(OrderError::AlreadyAssigned);
        }
        let new_status = status.accepted_status().ok_or(OrderError::NotAvailable)?;

        let result = sqlx::query(
            r"
            UPDATE orders
            SET rider_id = $1, status = $2, updated_at = NOW()
            WHERE id = $3 AND rider_id IS NULL
            ",
        )
        .bind(rider_id)
        .bind(new_status)
        .bind(order_id)
        .execute(self.pool)
        .await?;

        // Zero rows here means another rider committed between our read and
        // this update - they won the race.
        if result.rows_affected() == 0 {
            return Err(OrderError::AlreadyAssigned);
        }

        Ok(())
    }

    /// Apply a rider-driven status update.
    ///
    /// Enforces rider ownership only; the rider-settable set is validated at
    /// the route boundary and no from->to adjacency is checked beyond that.
    /// Reaching `delivered` increments the rider's lifetime delivery counter
    /// in the same transaction, once per call.
    ///
    /// # Errors
    ///
    /// `OrderError::NotFound` if the order is not assigned to this rider.
    pub async fn rider_set_status(
        &self,
        order_id: OrderId,
        rider_id: RiderId,
        new_status: OrderStatus,
    ) -> Result<(), OrderError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r"
            UPDATE orders
            SET status = $1, updated_at = NOW()
            WHERE id = $2 AND rider_id = $3
            ",
        )
        .bind(new_status)
        .bind(order_id)
        .bind(rider_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(OrderError::NotFound);
        }

        if new_status == OrderStatus::Delivered {
            sqlx::query("UPDATE riders SET total_deliveries = total_deliveries + 1 WHERE id = $1")
                .bind(rider_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    // =========================================================================
    // Role-scoped reads
    // =========================================================================

    /// Get a customer's order with its frozen items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_for_customer(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<CustomerOrderDetail>, RepositoryError> {
        let detail = sqlx::query_as::<_, CustomerOrderDetail>(
            r"
            SELECT o.*, r.name AS restaurant_name, r.image_url AS restaurant_image
            FROM orders o
            JOIN restaurants r ON o.restaurant_id = r.id
            WHERE o.id = $1 AND o.user_id = $2
            ",
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        match detail {
            Some(mut detail) => {
                detail.items = self.items_for(order_id).await?;
                Ok(Some(detail))
            }
            None => Ok(None),
        }
    }

    /// List a customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CustomerOrderSummary>, RepositoryError> {
        let orders = sqlx::query_as::<_, CustomerOrderSummary>(
            r"
            SELECT o.id, o.restaurant_id, r.name AS restaurant_name,
                   r.image_url AS restaurant_image, o.total_amount, o.status,
                   o.created_at, COUNT(oi.id) AS item_count
            FROM orders o
            JOIN restaurants r ON o.restaurant_id = r.id
            LEFT JOIN order_items oi ON o.id = oi.order_id
            WHERE o.user_id = $1
            GROUP BY o.id, r.name, r.image_url
            ORDER BY o.created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Get an order for the restaurant that owns it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_for_restaurant(
        &self,
        order_id: OrderId,
        restaurant_id: RestaurantId,
    ) -> Result<Option<RestaurantOrderDetail>, RepositoryError> {
        let detail = sqlx::query_as::<_, RestaurantOrderDetail>(
            r"
            SELECT o.*, u.name AS customer_name, u.email AS customer_email,
                   u.phone AS customer_phone
            FROM orders o
            JOIN users u ON o.user_id = u.id
            WHERE o.id = $1 AND o.restaurant_id = $2
            ",
        )
        .bind(order_id)
        .bind(restaurant_id)
        .fetch_optional(self.pool)
        .await?;

        match detail {
            Some(mut detail) => {
                detail.items = self.items_for(order_id).await?;
                Ok(Some(detail))
            }
            None => Ok(None),
        }
    }

    /// List a restaurant's orders, optionally filtered by status, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_restaurant(
        &self,
        restaurant_id: RestaurantId,
        status: Option<OrderStatus>,
    ) -> Result<Vec<RestaurantOrderSummary>, RepositoryError> {
        let orders = sqlx::query_as::<_, RestaurantOrderSummary>(
            r"
            SELECT o.id, u.name AS customer_name, u.phone AS customer_phone,
                   o.total_amount, o.delivery_address, o.payment_method,
                   o.status, o.created_at, COUNT(oi.id) AS item_count
            FROM orders o
            JOIN users u ON o.user_id = u.id
            LEFT JOIN order_items oi ON o.id = oi.order_id
            WHERE o.restaurant_id = $1 AND ($2::order_status IS NULL OR o.status = $2)
            GROUP BY o.id, u.name, u.phone
            ORDER BY o.created_at DESC
            ",
        )
        .bind(restaurant_id)
        .bind(status)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Orders open for pickup: `ready` with no rider assigned, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn available_for_riders(&self) -> Result<Vec<RiderOrderSummary>, RepositoryError> {
        let orders = sqlx::query_as::<_, RiderOrderSummary>(
            r"
            SELECT o.id, r.name AS restaurant_name, r.address AS restaurant_address,
                   u.name AS customer_name, u.phone AS customer_phone,
                   o.delivery_address, o.total_amount, o.delivery_fee, o.status,
                   o.created_at, o.updated_at, COUNT(oi.id) AS item_count
            FROM orders o
            JOIN restaurants r ON o.restaurant_id = r.id
            JOIN users u ON o.user_id = u.id
            LEFT JOIN order_items oi ON o.id = oi.order_id
            WHERE o.status = 'ready' AND o.rider_id IS NULL
            GROUP BY o.id, r.name, r.address, u.name, u.phone
            ORDER BY o.created_at ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// A rider's active (non-terminal) assignments, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn assigned_to_rider(
        &self,
        rider_id: RiderId,
    ) -> Result<Vec<RiderOrderSummary>, RepositoryError> {
        let orders = sqlx::query_as::<_, RiderOrderSummary>(
            r"
            SELECT o.id, r.name AS restaurant_name, r.address AS restaurant_address,
                   u.name AS customer_name, u.phone AS customer_phone,
                   o.delivery_address, o.total_amount, o.delivery_fee, o.status,
                   o.created_at, o.updated_at, COUNT(oi.id) AS item_count
            FROM orders o
            JOIN restaurants r ON o.restaurant_id = r.id
            JOIN users u ON o.user_id = u.id
            LEFT JOIN order_items oi ON o.id = oi.order_id
            WHERE o.rider_id = $1 AND o.status NOT IN ('delivered', 'cancelled')
            GROUP BY o.id, r.name, r.address, u.name, u.phone
            ORDER BY o.created_at DESC
            ",
        )
        .bind(rider_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// A rider's 50 most recent deliveries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn history_for_rider(
        &self,
        rider_id: RiderId,
    ) -> Result<Vec<RiderOrderSummary>, RepositoryError> {
        let orders = sqlx::query_as::<_, RiderOrderSummary>(
            r"
            SELECT o.id, r.name AS restaurant_name, r.address AS restaurant_address,
                   u.name AS customer_name, u.phone AS customer_phone,
                   o.delivery_address, o.total_amount, o.delivery_fee, o.status,
                   o.created_at, o.updated_at, COUNT(oi.id) AS item_count
            FROM orders o
            JOIN restaurants r ON o.restaurant_id = r.id
            JOIN users u ON o.user_id = u.id
            LEFT JOIN order_items oi ON o.id = oi.order_id
            WHERE o.rider_id = $1 AND o.status = 'delivered'
            GROUP BY o.id, r.name, r.address, u.name, u.phone
            ORDER BY o.updated_at DESC
            LIMIT 50
            ",
        )
        .bind(rider_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Frozen items of an order, joined with their menu entries.
    async fn items_for(&self, order_id: OrderId) -> Result<Vec<OrderItemLine>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItemLine>(
            r"
            SELECT oi.menu_item_id, mi.name, mi.is_veg, mi.image_url,
                   oi.quantity, oi.price
            FROM order_items oi
            JOIN menu_items mi ON oi.menu_item_id = mi.id
            WHERE oi.order_id = $1
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}
