//! Rider earnings aggregation.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use quickbite_core::RiderId;

use super::RepositoryError;

/// Time-windowed earnings sums for a rider.
///
/// Sums are over `delivery_fee` of delivered orders; windows are keyed off
/// `updated_at`, which is when the delivery was recorded. Riders with no
/// deliveries get zeros, never nulls.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EarningsSummary {
    pub today_earnings: Decimal,
    pub week_earnings: Decimal,
    pub month_earnings: Decimal,
    pub total_earnings: Decimal,
}

/// Repository for rider database operations.
pub struct RiderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RiderRepository<'a> {
    /// Create a new rider repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Aggregate a rider's delivery-fee earnings for today, the current ISO
    /// week, the current month, and all time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn earnings(&self, rider_id: RiderId) -> Result<EarningsSummary, RepositoryError> {
        let summary = sqlx::query_as::<_, EarningsSummary>(
            r"
            SELECT
                COALESCE(SUM(delivery_fee) FILTER (
                    WHERE DATE(updated_at) = CURRENT_DATE
                ), 0) AS today_earnings,
                COALESCE(SUM(delivery_fee) FILTER (
                    WHERE updated_at >= DATE_TRUNC('week', CURRENT_DATE)
                ), 0) AS week_earnings,
                COALESCE(SUM(delivery_fee) FILTER (
                    WHERE updated_at >= DATE_TRUNC('month', CURRENT_DATE)
                ), 0) AS month_earnings,
                COALESCE(SUM(delivery_fee), 0) AS total_earnings
            FROM orders
            WHERE rider_id = $1 AND status = 'delivered'
            ",
        )
        .bind(rider_id)
        .fetch_one(self.pool)
        .await?;

        Ok(summary)
    }
}
