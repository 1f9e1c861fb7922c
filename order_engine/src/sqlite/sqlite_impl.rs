//! `SqliteDatabase` is a concrete implementation of an order store backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements [`OrderStore`].
use std::fmt::Debug;

use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};

use super::db::{menu_items, new_pool, order_items, orders};
use crate::{
    db_types::{MenuItemSummary, NewOrder, NewOrderItem, Order, OrderId, OrderItem, OrderStatusType, OrderWithItems},
    store::{OrderStore, OrderStoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl OrderStore for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch_orders_with_items(&self) -> Result<Vec<OrderWithItems>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders_newest_first(&mut conn).await?;
        let items = order_items::fetch_all_items_with_menu_items(&mut conn).await?;
        Ok(order_items::nest_items(orders, items))
    }

    async fn update_order_status(&self, id: &OrderId, status: OrderStatusType) -> Result<Order, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::update_order_status(id, status, &mut conn).await?;
        debug!("🗃️ Order {id} status set to {status}");
        Ok(order)
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_order(order, &mut conn).await
    }

    /// The batch is written in a single transaction, so either every item lands or none do. The order row itself is
    /// not part of that transaction.
    async fn insert_order_items(
        &self,
        order_id: &OrderId,
        items: Vec<NewOrderItem>,
    ) -> Result<Vec<OrderItem>, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        let items = order_items::insert_order_items(order_id, items, &mut tx).await?;
        tx.commit().await?;
        Ok(items)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Creates the database file for `url` if it does not exist yet. Returns `true` if a new database was created.
    pub async fn create_if_missing(url: &str) -> Result<bool, OrderStoreError> {
        if Sqlite::database_exists(url).await? {
            return Ok(false);
        }
        Sqlite::create_database(url).await?;
        info!("🗃️ Created new database at {url}");
        Ok(true)
    }

    /// Applies any outstanding schema migrations.
    pub async fn migrate(&self) -> Result<(), OrderStoreError> {
        sqlx::migrate!("./src/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| OrderStoreError::DatabaseError(e.to_string()))?;
        info!("🗃️ Migrations complete");
        Ok(())
    }

    /// Adds a menu item and returns its id.
    pub async fn add_menu_item(&self, item: &MenuItemSummary) -> Result<String, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let id = menu_items::insert_menu_item(item, &mut conn).await?;
        Ok(id)
    }

    /// Fetches a single order, without its items.
    pub async fn fetch_order(&self, id: &OrderId) -> Result<Option<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order(id, &mut conn).await?;
        Ok(order)
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&mut self) -> Result<(), OrderStoreError> {
        self.pool.close().await;
        Ok(())
    }
}
