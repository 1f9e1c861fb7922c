//! Helpers for tests: throwaway SQLite databases and an in-memory store with failure injection.
mod memory_store;
pub mod prepare_env;

pub use memory_store::{MemoryStore, StoreCall};

use order_common::Money;

use crate::db_types::{NewOrder, NewOrderItem, OrderType};

/// A dine-in order for "Ada" with the given display number and total.
pub fn sample_order(order_number: &str, total_cents: i64) -> NewOrder {
    NewOrder::new(order_number, "Ada Lovelace", "ada@example.com", OrderType::DineIn, Money::from(total_cents))
}

/// A single item with no options or add-ons.
pub fn sample_item(menu_item_id: &str, quantity: i64, price_cents: i64) -> NewOrderItem {
    NewOrderItem::new(menu_item_id, quantity, Money::from(price_cents))
}
