//! Free functions over a `&mut SqliteConnection`, one module per table.
//!
//! Nothing in here owns a pool. The same call works on a pooled connection or inside a transaction, and
//! [`super::SqliteDatabase`] decides which one each store operation gets.
use std::{str::FromStr, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod menu_items;
pub mod order_items;
pub mod orders;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a pool on an existing database. Item rows must point at real orders and menu items, so foreign keys are
/// switched on for every connection.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?.foreign_keys(true).busy_timeout(BUSY_TIMEOUT);
    SqlitePoolOptions::new().max_connections(max_connections.max(1)).connect_with(options).await
}
