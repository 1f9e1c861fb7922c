//! # Order store backends
//!
//! This module defines the interface contract that order store *backends* must satisfy.
//!
//! The store owns the canonical copy of every order. The rest of the crate only ever holds read-only snapshots of
//! what the store returned. Backends are expected to behave like a thin relational query API: each method maps to a
//! single select, update or insert call, and none of them are retried.
//!
//! Two backends exist in this workspace:
//! * [`crate::SqliteDatabase`], a local SQLite store (feature `sqlite`, on by default).
//! * `postgrest_tools::PostgrestApi`, a client for a hosted PostgREST endpoint.
mod order_store;

pub use order_store::{OrderStore, OrderStoreError};
