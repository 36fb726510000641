//! Core types for QuickBite.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod pricing;
pub mod status;

pub use id::*;
pub use pricing::{DELIVERY_FEE, OrderTotals, PricedLine};
pub use status::{OrderStatus, StatusParseError, TransitionError};
