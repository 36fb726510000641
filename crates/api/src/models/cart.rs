//! Cart snapshot types.

use rust_decimal::Decimal;

use quickbite_core::{MenuItemId, PricedLine, RestaurantId, UserId};

/// One cart line joined with the live menu price and owning restaurant.
///
/// This is the unit the cart snapshot reader produces: the `price` seen here
/// is what gets frozen into `order_items` when the order is placed.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLine {
    /// Owning user.
    pub user_id: UserId,
    /// Menu item referenced by this line.
    pub menu_item_id: MenuItemId,
    /// Quantity ordered.
    pub quantity: i32,
    /// Live menu price at snapshot time.
    pub price: Decimal,
    /// Restaurant the menu item belongs to.
    pub restaurant_id: RestaurantId,
}

impl CartLine {
    /// View of this line for pricing.
    #[must_use]
    pub const fn priced(&self) -> PricedLine {
        PricedLine {
            price: self.price,
            quantity: self.quantity,
        }
    }
}
