//! Integration tests for QuickBite.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations + seed
//! cargo run -p qb-cli -- migrate
//! cargo run -p qb-cli -- seed
//!
//! # Start the API
//! cargo run -p quickbite-api
//!
//! # Run the ignored end-to-end tests
//! cargo test -p quickbite-integration-tests -- --ignored
//! ```
//!
//! # Environment
//!
//! - `QUICKBITE_BASE_URL` - API base URL (default `http://localhost:8080`)
//! - `QUICKBITE_DATABASE_URL` - database the API is pointed at; tests write
//!   session identities and fixtures directly, standing in for the external
//!   auth service

use sqlx::PgPool;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("QUICKBITE_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// Create an HTTP client with a cookie store, so the session cookie set by
/// the login stub persists across requests.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Create a client that sends a pre-established session cookie.
///
/// Authentication lives in the external auth service, so the tests take
/// ready-made session cookie values from the environment (log in through the
/// auth service once and export the `qb_session` values):
///
/// - `QUICKBITE_TEST_USER_COOKIE`
/// - `QUICKBITE_TEST_RESTAURANT_COOKIE`
/// - `QUICKBITE_TEST_RIDER_COOKIE` / `QUICKBITE_TEST_RIDER2_COOKIE`
///
/// # Panics
///
/// Panics if the env var is unset or the client cannot be constructed.
#[must_use]
pub fn client_with_session(env_var: &str) -> reqwest::Client {
    let cookie = std::env::var(env_var)
        .unwrap_or_else(|_| panic!("{env_var} must be set for integration tests"));

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::COOKIE,
        format!("qb_session={cookie}")
            .parse()
            .expect("invalid cookie value"),
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .expect("Failed to create HTTP client")
}

/// Connect to the database behind the API under test.
///
/// # Panics
///
/// Panics if `QUICKBITE_DATABASE_URL`/`DATABASE_URL` is unset or unreachable.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("QUICKBITE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("QUICKBITE_DATABASE_URL must be set for integration tests");
    PgPool::connect(&url)
        .await
        .expect("Failed to connect to test database")
}
