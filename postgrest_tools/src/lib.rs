//! A REST client for orders held in a hosted PostgREST database.
//!
//! [`PostgrestApi`] speaks PostgREST's query dialect (`select`, `order`, `eq.` filters) and implements
//! [`order_engine::OrderStore`], so it can be dropped into an `OrdersApi` in place of the SQLite backend.
mod api;
mod config;
mod data_objects;
mod error;
mod order_store_impl;

pub use api::PostgrestApi;
pub use config::PostgrestConfig;
pub use data_objects::StatusPatch;
pub use error::PostgrestApiError;
