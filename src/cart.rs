//! Storefront cart state.
//!
//! The cart lives on the client; this container is the canonical shape of
//! the document the storefront persists, and serde is the explicit
//! serialize/deserialize boundary. The server sees it when pricing a cart
//! through `/api/cart/quote`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub image: Option<String>,
}

/// Line-item container with unique product ids and non-negative quantities.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

/// What `add` takes: everything but the quantity, which always starts at 1.
#[derive(Debug, Clone)]
pub struct CartEntry {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a product. Adding an id already in the cart
    /// increments its quantity instead of creating a second line.
    pub fn add(&mut self, entry: CartEntry) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == entry.id) {
            existing.quantity += 1;
            return;
        }
        self.items.push(CartItem {
            id: entry.id,
            name: entry.name,
            price: entry.price,
            quantity: 1,
            image: entry.image,
        });
    }

    pub fn remove(&mut self, id: &str) {
        self.items.retain(|i| i.id != id);
    }

    /// Set a line's quantity, floored at zero. A zero-quantity line is
    /// kept in place, not removed.
    pub fn set_quantity(&mut self, id: &str, quantity: i32) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            item.quantity = quantity.max(0);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .map(|i| i.price * Decimal::from(i.quantity))
            .sum()
    }

    pub fn total_items(&self) -> i32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// The (price, quantity) pairs the pricing engine consumes.
    pub fn lines(&self) -> impl Iterator<Item = (Decimal, i32)> + '_ {
        self.items.iter().map(|i| (i.price, i.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(id: &str, price: Decimal) -> CartEntry {
        CartEntry {
            id: id.to_string(),
            name: format!("Product {id}"),
            price,
            image: None,
        }
    }

    #[test]
    fn duplicate_add_increments_quantity() {
        let mut cart = Cart::new();
        cart.add(entry("board-01", dec!(45.99)));
        cart.add(entry("board-01", dec!(45.99)));
        cart.add(entry("screws-02", dec!(12.99)));

        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn subtotal_sums_price_times_quantity() {
        let mut cart = Cart::new();
        cart.add(entry("board-01", dec!(45.99)));
        cart.add(entry("board-01", dec!(45.99)));
        cart.add(entry("screws-02", dec!(12.99)));

        assert_eq!(cart.subtotal(), dec!(104.97));
    }

    #[test]
    fn set_quantity_floors_at_zero_and_keeps_line() {
        let mut cart = Cart::new();
        cart.add(entry("board-01", dec!(45.99)));
        cart.set_quantity("board-01", -3);

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 0);
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn remove_and_clear() {
        let mut cart = Cart::new();
        cart.add(entry("board-01", dec!(45.99)));
        cart.add(entry("screws-02", dec!(12.99)));
        cart.remove("board-01");
        assert_eq!(cart.items.len(), 1);

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn client_storage_round_trip() {
        let mut cart = Cart::new();
        cart.add(entry("board-01", dec!(45.99)));
        cart.set_quantity("board-01", 4);

        let stored = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&stored).unwrap();
        assert_eq!(restored.items[0].quantity, 4);
        assert_eq!(restored.subtotal(), dec!(183.96));
    }
}
