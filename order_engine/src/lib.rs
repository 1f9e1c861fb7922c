//! Order engine
//!
//! This library backs a restaurant ordering UI. It exposes three operations over a relational order store: listing
//! orders with their items, changing an order's status, and placing a new order with its items.
//!
//! The library is divided into these sections:
//! 1. Store backends ([`mod@store`], [`SqliteDatabase`]). A backend implements [`OrderStore`], a thin contract
//!    mirroring the select/update/insert calls of a relational query API. The data types that flow through it live in
//!    [`mod@db_types`].
//! 2. The query cache ([`mod@cache`]). A process-wide cache of query results keyed by a logical name, with
//!    invalidation notices for anything that needs to refetch.
//! 3. The public API ([`OrdersApi`]), which composes a backend with the cache and publishes toasts and order events.
//!
//! Events are delivered through a simple hook system (see [`mod@events`]). The UI layer registers a toast hook to show
//! notifications; other components can listen for created orders and status changes.
mod api;
pub mod cache;
pub mod config;
pub mod db_types;
pub mod events;
pub mod store;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(all(feature = "sqlite", any(feature = "test_utils", test)))]
pub mod test_utils;

pub use api::orders_api::{
    OrdersApi,
    ORDER_CREATED_DESCRIPTION,
    ORDER_CREATED_TITLE,
    ORDER_UPDATED_DESCRIPTION,
    ORDER_UPDATED_TITLE,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use store::{OrderStore, OrderStoreError};
