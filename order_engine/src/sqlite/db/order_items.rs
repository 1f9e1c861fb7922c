use std::collections::HashMap;

use log::{debug, trace};
use order_common::Money;
use sqlx::{types::Json, FromRow, SqliteConnection};

use crate::{
    db_types::{MenuItemSummary, NewOrderItem, OptionMap, Order, OrderId, OrderItem, OrderWithItems},
    store::OrderStoreError,
};

/// An `order_items` row, optionally joined with the display fields of its menu item.
#[derive(Debug, FromRow)]
struct OrderItemRecord {
    id: String,
    order_id: OrderId,
    menu_item_id: String,
    quantity: i64,
    price: Money,
    selected_options: Json<Option<OptionMap>>,
    selected_add_ons: Json<Option<OptionMap>>,
    #[sqlx(default)]
    menu_item_name: Option<String>,
    #[sqlx(default)]
    menu_item_description: Option<String>,
}

impl From<OrderItemRecord> for OrderItem {
    fn from(record: OrderItemRecord) -> Self {
        let menu_items = record
            .menu_item_name
            .map(|name| MenuItemSummary { name, description: record.menu_item_description });
        Self {
            id: record.id,
            order_id: record.order_id,
            menu_item_id: record.menu_item_id,
            quantity: record.quantity,
            price: record.price,
            selected_options: record.selected_options.0.unwrap_or_default(),
            selected_add_ons: record.selected_add_ons.0.unwrap_or_default(),
            menu_items,
        }
    }
}

/// Inserts one `order_items` row per item, all referencing `order_id`.
///
/// This is not atomic by itself. Pass `&mut *tx` as the connection to make the batch all-or-nothing.
pub async fn insert_order_items(
    order_id: &OrderId,
    items: Vec<NewOrderItem>,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderItem>, OrderStoreError> {
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        let row = item.into_row(order_id);
        let record: OrderItemRecord = sqlx::query_as(
            r#"
            INSERT INTO order_items (
                order_id,
                menu_item_id,
                quantity,
                price,
                selected_options,
                selected_add_ons
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
        )
        .bind(row.order_id.as_str())
        .bind(&row.menu_item_id)
        .bind(row.quantity)
        .bind(row.price.value())
        .bind(Json(&row.selected_options))
        .bind(Json(&row.selected_add_ons))
        .fetch_one(&mut *conn)
        .await?;
        result.push(OrderItem::from(record));
    }
    debug!("🗃️ {} items inserted for order {order_id}", result.len());
    Ok(result)
}

/// Fetches every order item together with its menu item name and description, in insertion order.
pub async fn fetch_all_items_with_menu_items(conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, sqlx::Error> {
    let records: Vec<OrderItemRecord> = sqlx::query_as(
        r#"
        SELECT
            order_items.id as id,
            order_id,
            menu_item_id,
            quantity,
            price,
            selected_options,
            selected_add_ons,
            menu_items.name as menu_item_name,
            menu_items.description as menu_item_description
        FROM order_items LEFT JOIN menu_items ON order_items.menu_item_id = menu_items.id
        ORDER BY order_items.rowid ASC"#,
    )
    .fetch_all(conn)
    .await?;
    trace!("🗃️ Fetched {} order items", records.len());
    Ok(records.into_iter().map(OrderItem::from).collect())
}

/// Nests each item under its order, preserving the order of `orders` and the relative order of items.
///
/// Items whose order is not in `orders` are dropped.
pub fn nest_items(orders: Vec<Order>, items: Vec<OrderItem>) -> Vec<OrderWithItems> {
    let mut by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
    for item in items {
        by_order.entry(item.order_id.clone()).or_default().push(item);
    }
    orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            OrderWithItems::new(order, items)
        })
        .collect()
}
