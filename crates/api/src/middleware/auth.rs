//! Authentication extractors.
//!
//! The auth service resolves credentials and stores a role identity in the
//! session; these extractors inject that identity into handlers. Every core
//! operation takes its acting identity from an extractor, never from the
//! request body.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::{CurrentRestaurant, CurrentRider, CurrentUser, keys};

/// Rejection for a missing or wrong-role session identity.
pub struct AuthRejection(&'static str);

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": self.0 }))).into_response()
    }
}

/// Read a typed identity out of the request's session.
async fn identity_from_session<T>(parts: &mut Parts, key: &str) -> Option<T>
where
    T: serde::de::DeserializeOwned,
{
    let session = parts.extensions.get::<Session>()?;
    session.get::<T>(key).await.ok().flatten()
}

/// Extractor that requires a logged-in customer.
///
/// # Example
///
/// ```rust,ignore
/// async fn place_order(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("ordering for user {}", user.id)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity_from_session(parts, keys::CURRENT_USER)
            .await
            .map(Self)
            .ok_or(AuthRejection("Unauthorized. Please login."))
    }
}

/// Extractor that requires a logged-in restaurant account.
pub struct RequireRestaurant(pub CurrentRestaurant);

impl<S> FromRequestParts<S> for RequireRestaurant
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity_from_session(parts, keys::CURRENT_RESTAURANT)
            .await
            .map(Self)
            .ok_or(AuthRejection("Unauthorized. Restaurant login required."))
    }
}

/// Extractor that requires a logged-in rider.
pub struct RequireRider(pub CurrentRider);

impl<S> FromRequestParts<S> for RequireRider
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity_from_session(parts, keys::CURRENT_RIDER)
            .await
            .map(Self)
            .ok_or(AuthRejection("Unauthorized. Rider login required."))
    }
}
