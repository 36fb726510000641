//! Route definitions for the three actor surfaces.
//!
//! One API, three clients: the customer app places and tracks orders, the
//! restaurant panel works the kitchen queue, the rider app handles pickup,
//! delivery, and earnings. All routes live under `/api`.

use axum::Router;

use crate::state::AppState;

pub mod orders;
pub mod restaurant;
pub mod rider;

/// Build the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(orders::router())
        .merge(restaurant::router())
        .merge(rider::router())
}
