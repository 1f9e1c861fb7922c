use std::sync::Arc;

use anyhow::Result;
use futures::FutureExt;
use log::*;
use order_engine::{
    cache::QueryCache,
    config::OrdersConfig,
    db_types::OrderId,
    events::{EventHandlers, EventHooks},
    OrderStore,
    OrdersApi,
};

use crate::{
    formatting::{format_order_summary, format_orders, format_toast},
    orders::{NewOrderFile, OrdersCommand},
};

/// Runs `command` against `db`, printing every toast the operation raises.
pub async fn run_orders_command<B: OrderStore>(db: B, config: &OrdersConfig, command: OrdersCommand) -> Result<()> {
    let mut hooks = EventHooks::default();
    hooks.on_toast(|toast| async move { println!("{}", format_toast(&toast)) }.boxed());
    let handlers = EventHandlers::new(config.event_buffer_size, hooks);
    let producers = handlers.producers();
    let running = handlers.start_handlers();
    let api = OrdersApi::new(db, Arc::new(QueryCache::new(config.cache.clone())), producers);
    let result = handle_orders_command(&api, command).await;
    // Dropping the API closes the toast channel, so the handler finishes once the queue is drained
    drop(api);
    for handle in running {
        if let Err(e) = handle.await {
            warn!("Toast handler did not shut down cleanly. {e}");
        }
    }
    result
}

async fn handle_orders_command<B: OrderStore>(api: &OrdersApi<B>, command: OrdersCommand) -> Result<()> {
    match command {
        OrdersCommand::List { json } => {
            let orders = api.list_orders().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(orders.as_slice())?);
            } else {
                println!("{}", format_orders(&orders));
            }
        },
        OrdersCommand::Status { id, status } => {
            let order = api.update_order_status(&OrderId::from(id), status).await?;
            println!("{}", format_order_summary(&order));
        },
        OrdersCommand::Create { file } => {
            let NewOrderFile { order, items } = NewOrderFile::from_path(&file)?;
            debug!("Creating order [{}] with {} item(s) from {file}", order.order_number, items.len());
            let order = api.create_order(order, items).await?;
            println!("{}", format_order_summary(&order));
        },
    }
    Ok(())
}
