//! SQLite backend for the order store.
//!
//! The schema lives in `migrations/` and is embedded into the binary, see [`SqliteDatabase::migrate`].
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
