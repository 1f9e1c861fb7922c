use chrono::Utc;
use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderStatusType},
    store::OrderStoreError,
};

/// Inserts a new order into the database using the given connection, and returns the stored row.
///
/// The id is generated by the database. `created_at` and `updated_at` are both set to the current time.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, OrderStoreError> {
    let now = Utc::now();
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                order_number,
                customer_name,
                customer_email,
                customer_phone,
                order_type,
                status,
                total_amount,
                notes,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *;
        "#,
    )
    .bind(order.order_number)
    .bind(order.customer_name)
    .bind(order.customer_email)
    .bind(order.customer_phone)
    .bind(order.order_type.to_string())
    .bind(order.status.as_str())
    .bind(order.total_amount.value())
    .bind(order.notes)
    .bind(now)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Order [{}] inserted with id {}", order.order_number, order.id);
    Ok(order)
}

/// Returns the order with the given id, if it exists.
pub async fn fetch_order(id: &OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

/// Fetches every order, most recent first. Orders created at the same instant come back in reverse insertion order.
pub async fn fetch_orders_newest_first(conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders: Vec<Order> =
        sqlx::query_as("SELECT * FROM orders ORDER BY created_at DESC, rowid DESC").fetch_all(conn).await?;
    trace!("🗃️ Fetched {} orders", orders.len());
    Ok(orders)
}

/// Sets the status of the order with the given id, and sets `updated_at` to now.
pub async fn update_order_status(
    id: &OrderId,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderStoreError> {
    let result: Option<Order> =
        sqlx::query_as("UPDATE orders SET status = $1, updated_at = $2 WHERE id = $3 RETURNING *")
            .bind(status.as_str())
            .bind(Utc::now())
            .bind(id.as_str())
            .fetch_optional(conn)
            .await?;
    result.ok_or_else(|| OrderStoreError::OrderNotFound(id.clone()))
}
