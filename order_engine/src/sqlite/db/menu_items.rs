use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::MenuItemSummary;

/// Adds a menu item and returns its id.
///
/// Menu management is not part of the order flow, but order items can only reference menu items that exist, so
/// local databases need a way to seed them.
pub async fn insert_menu_item(item: &MenuItemSummary, conn: &mut SqliteConnection) -> Result<String, sqlx::Error> {
    let id: String = sqlx::query_scalar("INSERT INTO menu_items (name, description) VALUES ($1, $2) RETURNING id")
        .bind(&item.name)
        .bind(&item.description)
        .fetch_one(conn)
        .await?;
    debug!("🗃️ Menu item '{}' added with id {id}", item.name);
    Ok(id)
}
