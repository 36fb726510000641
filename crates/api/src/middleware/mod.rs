//! HTTP middleware: sessions and role-based auth extractors.

pub mod auth;
pub mod session;

pub use auth::{RequireRestaurant, RequireRider, RequireUser};
pub use session::create_session_layer;
