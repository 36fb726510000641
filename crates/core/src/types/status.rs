//! Order status and the two actor-scoped transition tables.
//!
//! The same `orders.status` column is mutated by two independent authorities:
//! the restaurant (kitchen progression and cancellation) and the rider (pickup
//! and delivery progression). Each authority gets its own total transition
//! function here; the database layer only ever persists moves these functions
//! have approved.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of an order.
///
/// `Pending` is the initial state; `Delivered` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    OnTheWay,
    Delivered,
    Cancelled,
}

/// A status change that the acting authority's transition table disallows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid status transition. Cannot change from '{from}' to '{to}'")]
pub struct TransitionError {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// Error parsing a status from its wire representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid order status: {0}")]
pub struct StatusParseError(pub String);

impl OrderStatus {
    /// The status every new order is created with.
    pub const INITIAL: Self = Self::Pending;

    /// Statuses a restaurant is allowed to submit at all. `on_the_way` and
    /// `delivered` belong to the rider and are rejected before the transition
    /// table is consulted.
    pub const RESTAURANT_SETTABLE: &'static [Self] = &[
        Self::Pending,
        Self::Confirmed,
        Self::Preparing,
        Self::Ready,
        Self::Cancelled,
    ];

    /// Statuses a rider is allowed to submit.
    pub const RIDER_SETTABLE: &'static [Self] = &[
        Self::Preparing,
        Self::Ready,
        Self::OnTheWay,
        Self::Delivered,
    ];

    /// Whether this status admits no further transitions by any authority.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Restaurant-driven transition table.
    ///
    /// Total over all (from, to) pairs. Resubmitting the current status is an
    /// idempotent no-op and always succeeds; every other move must appear in
    /// the table. `ready` can only be cancelled by the restaurant - the move
    /// to `on_the_way` belongs to the rider.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] carrying both states when the move is not
    /// allowed.
    pub fn restaurant_transition(self, to: Self) -> Result<(), TransitionError> {
        if self == to {
            return Ok(());
        }

        let allowed = matches!(
            (self, to),
            (Self::Pending, Self::Confirmed | Self::Cancelled)
                | (Self::Confirmed, Self::Preparing | Self::Cancelled)
                | (Self::Preparing, Self::Ready | Self::Cancelled)
                | (Self::Ready, Self::Cancelled)
        );

        if allowed {
            Ok(())
        } else {
            Err(TransitionError { from: self, to })
        }
    }

    /// Whether a restaurant may submit this status value at all.
    #[must_use]
    pub fn is_restaurant_settable(self) -> bool {
        Self::RESTAURANT_SETTABLE.contains(&self)
    }

    /// Whether a rider may submit this status value.
    ///
    /// Rider updates enforce ownership only, not a from->to adjacency table:
    /// an assigned rider may move an order between any of the settable
    /// statuses.
    #[must_use]
    pub fn is_rider_settable(self) -> bool {
        Self::RIDER_SETTABLE.contains(&self)
    }

    /// Status an order ends up in when a rider accepts it.
    ///
    /// Accepting is only possible from `confirmed` (order advances to
    /// `preparing` while the rider heads to the restaurant) or `ready` (status
    /// is kept). Returns `None` when the order is not available for pickup.
    #[must_use]
    pub const fn accepted_status(self) -> Option<Self> {
        match self {
            Self::Confirmed => Some(Self::Preparing),
            Self::Ready => Some(Self::Ready),
            _ => None,
        }
    }

    /// Wire representation, matching the `order_status` database enum.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::OnTheWay => "on_the_way",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// All statuses, in lifecycle order.
    pub const ALL: &'static [Self] = &[
        Self::Pending,
        Self::Confirmed,
        Self::Preparing,
        Self::Ready,
        Self::OnTheWay,
        Self::Delivered,
        Self::Cancelled,
    ];
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "on_the_way" => Ok(Self::OnTheWay),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(StatusParseError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_restaurant_kitchen_progression() {
        use OrderStatus::{Confirmed, Pending, Preparing, Ready};

        assert!(Pending.restaurant_transition(Confirmed).is_ok());
        assert!(Confirmed.restaurant_transition(Preparing).is_ok());
        assert!(Preparing.restaurant_transition(Ready).is_ok());
    }

    #[test]
    fn test_restaurant_can_cancel_any_kitchen_state() {
        use OrderStatus::{Cancelled, Confirmed, Pending, Preparing, Ready};

        for from in [Pending, Confirmed, Preparing, Ready] {
            assert!(from.restaurant_transition(Cancelled).is_ok(), "{from} -> cancelled");
        }
    }

    #[test]
    fn test_restaurant_cannot_skip_preparing() {
        let err = OrderStatus::Confirmed
            .restaurant_transition(OrderStatus::Ready)
            .unwrap_err();
        assert_eq!(err.from, OrderStatus::Confirmed);
        assert_eq!(err.to, OrderStatus::Ready);
        assert_eq!(
            err.to_string(),
            "Invalid status transition. Cannot change from 'confirmed' to 'ready'"
        );
    }

    #[test]
    fn test_restaurant_same_status_is_noop_success() {
        for &status in OrderStatus::ALL {
            assert!(status.restaurant_transition(status).is_ok(), "{status} resubmission");
        }
    }

    #[test]
    fn test_restaurant_cannot_touch_rider_states() {
        use OrderStatus::{Cancelled, Confirmed, OnTheWay, Ready};

        // on_the_way is rider-owned in both directions
        assert!(OnTheWay.restaurant_transition(Cancelled).is_err());
        assert!(Ready.restaurant_transition(OnTheWay).is_err());
        assert!(!OnTheWay.is_restaurant_settable());
        assert!(!OrderStatus::Delivered.is_restaurant_settable());
        assert!(Confirmed.is_restaurant_settable());
    }

    #[test]
    fn test_terminal_states_admit_nothing() {
        for terminal in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            for &to in OrderStatus::ALL {
                if to == terminal {
                    continue;
                }
                assert!(terminal.restaurant_transition(to).is_err(), "{terminal} -> {to}");
            }
        }
    }

    #[test]
    fn test_rider_settable_set() {
        assert!(OrderStatus::OnTheWay.is_rider_settable());
        assert!(OrderStatus::Delivered.is_rider_settable());
        assert!(!OrderStatus::Pending.is_rider_settable());
        assert!(!OrderStatus::Cancelled.is_rider_settable());
    }

    #[test]
    fn test_accept_from_confirmed_advances_to_preparing() {
        assert_eq!(
            OrderStatus::Confirmed.accepted_status(),
            Some(OrderStatus::Preparing)
        );
    }

    #[test]
    fn test_accept_from_ready_keeps_ready() {
        assert_eq!(OrderStatus::Ready.accepted_status(), Some(OrderStatus::Ready));
    }

    #[test]
    fn test_accept_unavailable_elsewhere() {
        use OrderStatus::{Cancelled, Delivered, OnTheWay, Pending, Preparing};

        for status in [Pending, Preparing, OnTheWay, Delivered, Cancelled] {
            assert_eq!(status.accepted_status(), None, "{status}");
        }
    }

    #[test]
    fn test_both_authorities_agree_on_terminals() {
        // The two transition tables share initial and terminal states; neither
        // authority may resurrect a terminal order.
        assert_eq!(OrderStatus::INITIAL, OrderStatus::Pending);
        for &status in OrderStatus::ALL {
            if status.is_terminal() {
                assert!(status.accepted_status().is_none(), "{status} acceptable");
                for &to in OrderStatus::ALL {
                    if to != status {
                        assert!(status.restaurant_transition(to).is_err());
                    }
                }
            }
        }
    }

    #[test]
    fn test_display_from_str_roundtrip() {
        for &status in OrderStatus::ALL {
            let parsed: OrderStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("en_route".parse::<OrderStatus>().is_err());
    }
}
