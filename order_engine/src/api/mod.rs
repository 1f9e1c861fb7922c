//! # Order operations API
//!
//! [`OrdersApi`] is the public face of the engine. It composes an [`crate::OrderStore`] backend with the shared
//! [`crate::cache::QueryCache`] and the event hooks.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use order_engine::{cache::QueryCache, events::EventProducers, OrdersApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/orders.db", 5).await?;
//! let api = OrdersApi::new(db, Arc::new(QueryCache::default()), EventProducers::default());
//! let orders = api.list_orders().await?;
//! ```
pub mod orders_api;
