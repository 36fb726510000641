//! Domain models for the order engine.

pub mod cart;
pub mod order;
pub mod session;

pub use cart::CartLine;
pub use order::{
    CustomerOrderDetail, CustomerOrderSummary, Order, OrderItemLine, RestaurantOrderDetail,
    RestaurantOrderSummary, RiderOrderSummary,
};
pub use session::{CurrentRestaurant, CurrentRider, CurrentUser, keys};
