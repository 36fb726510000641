//! Session-related types.
//!
//! The three front-ends authenticate against the external auth service, which
//! stores one of these identities in the session. The order engine never
//! trusts a client-supplied ID; every operation takes its acting identity
//! from here.

use serde::{Deserialize, Serialize};

use quickbite_core::{RestaurantId, RiderId, UserId};

/// Session-stored customer identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Customer's database ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
}

/// Session-stored restaurant identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentRestaurant {
    /// Restaurant's database ID.
    pub id: RestaurantId,
    /// Display name.
    pub name: String,
}

/// Session-stored rider identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentRider {
    /// Rider's database ID.
    pub id: RiderId,
    /// Display name.
    pub name: String,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for the logged-in customer.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the logged-in restaurant account.
    pub const CURRENT_RESTAURANT: &str = "current_restaurant";

    /// Key for the logged-in rider.
    pub const CURRENT_RIDER: &str = "current_rider";
}
