//! Cart snapshot reader.
//!
//! Read-only: joins cart lines with the live menu price and owning
//! restaurant. Order assembly is its only consumer; the prices read here are
//! the ones frozen into `order_items`.

use sqlx::PgConnection;

use quickbite_core::UserId;

use super::RepositoryError;
use crate::models::CartLine;

/// Read a user's cart lines with live menu pricing, oldest first.
///
/// Runs on the caller's connection: order assembly calls this inside its
/// transaction so the snapshot and the writes it feeds share one isolation
/// scope.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn snapshot_lines(
    conn: &mut PgConnection,
    user_id: UserId,
) -> Result<Vec<CartLine>, RepositoryError> {
    let lines = sqlx::query_as::<_, CartLine>(
        r"
        SELECT c.user_id, c.menu_item_id, c.quantity, mi.price, mi.restaurant_id
        FROM cart c
        JOIN menu_items mi ON c.menu_item_id = mi.id
        WHERE c.user_id = $1
        ORDER BY c.created_at ASC
        ",
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(lines)
}
