//! Seed the database with demo data for local front-end development.
//!
//! Inserts two restaurants with small menus, one customer, and one rider.
//! Account rows get the unusable password sentinel `!` - the auth service
//! owns real credential hashing and can reset them.
//!
//! Idempotent: every insert is `ON CONFLICT DO NOTHING`, keyed by email.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Unusable password hash for seeded accounts.
const LOCKED: &str = "!";

struct DemoMenuItem {
    name: &'static str,
    price: &'static str,
    is_veg: bool,
}

struct DemoRestaurant {
    name: &'static str,
    email: &'static str,
    address: &'static str,
    menu: &'static [DemoMenuItem],
}

const RESTAURANTS: &[DemoRestaurant] = &[
    DemoRestaurant {
        name: "Spice Route",
        email: "kitchen@spiceroute.example",
        address: "12 Market Street",
        menu: &[
            DemoMenuItem { name: "Paneer Tikka", price: "220", is_veg: true },
            DemoMenuItem { name: "Butter Chicken", price: "310", is_veg: false },
            DemoMenuItem { name: "Garlic Naan", price: "45", is_veg: true },
        ],
    },
    DemoRestaurant {
        name: "Wok This Way",
        email: "orders@wokthisway.example",
        address: "88 Harbour Road",
        menu: &[
            DemoMenuItem { name: "Veg Hakka Noodles", price: "180", is_veg: true },
            DemoMenuItem { name: "Chilli Chicken", price: "260", is_veg: false },
        ],
    },
];

/// Seed demo data.
///
/// # Errors
///
/// Returns `SeedError` if the database URL is missing or an insert fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("QUICKBITE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| SeedError::MissingEnvVar("QUICKBITE_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    for restaurant in RESTAURANTS {
        seed_restaurant(&pool, restaurant).await?;
    }

    sqlx::query(
        r"
        INSERT INTO users (name, email, phone, password_hash)
        VALUES ('Demo Customer', 'customer@quickbite.example', '555-0101', $1)
        ON CONFLICT (email) DO NOTHING
        ",
    )
    .bind(LOCKED)
    .execute(&pool)
    .await?;

    sqlx::query(
        r"
        INSERT INTO riders (name, email, phone, password_hash)
        VALUES ('Demo Rider', 'rider@quickbite.example', '555-0102', $1)
        ON CONFLICT (email) DO NOTHING
        ",
    )
    .bind(LOCKED)
    .execute(&pool)
    .await?;

    tracing::info!("Seed complete!");
    Ok(())
}

async fn seed_restaurant(pool: &PgPool, restaurant: &DemoRestaurant) -> Result<(), SeedError> {
    let restaurant_id: Option<i32> = sqlx::query_scalar(
        r"
        INSERT INTO restaurants (name, email, password_hash, address)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        ",
    )
    .bind(restaurant.name)
    .bind(restaurant.email)
    .bind(LOCKED)
    .bind(restaurant.address)
    .fetch_optional(pool)
    .await?;

    // Already seeded on a previous run
    let Some(restaurant_id) = restaurant_id else {
        tracing::info!(name = restaurant.name, "restaurant already seeded, skipping");
        return Ok(());
    };

    for item in restaurant.menu {
        let price: Decimal = item.price.parse().unwrap_or_default();
        sqlx::query(
            r"
            INSERT INTO menu_items (restaurant_id, name, price, is_veg)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(restaurant_id)
        .bind(item.name)
        .bind(price)
        .bind(item.is_veg)
        .execute(pool)
        .await?;
    }

    tracing::info!(name = restaurant.name, items = restaurant.menu.len(), "seeded restaurant");
    Ok(())
}
