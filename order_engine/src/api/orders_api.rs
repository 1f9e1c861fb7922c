use std::{fmt::Debug, sync::Arc};

use log::*;

use crate::{
    cache::{QueryCache, ORDERS_QUERY_KEY},
    db_types::{NewOrder, NewOrderItem, Order, OrderId, OrderStatusType, OrderWithItems},
    events::{EventProducers, OrderCreatedEvent, OrderStatusChangedEvent, Toast},
    store::{OrderStore, OrderStoreError},
};

pub const ORDER_UPDATED_TITLE: &str = "Order updated";
pub const ORDER_UPDATED_DESCRIPTION: &str = "Order status has been updated successfully.";
pub const ORDER_CREATED_TITLE: &str = "Order created";
pub const ORDER_CREATED_DESCRIPTION: &str = "Your order has been placed successfully.";

/// `OrdersApi` exposes the three order operations: the cached order list, status updates, and order creation.
///
/// Mutations never touch the cached list directly. On success they invalidate it, so the next
/// [`Self::list_orders`] call (or any subscriber to the cache) refetches. On failure the cache is left alone.
pub struct OrdersApi<B> {
    db: B,
    cache: Arc<QueryCache>,
    producers: EventProducers,
}

impl<B> Debug for OrdersApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrdersApi ({:?})", self.cache)
    }
}

impl<B> OrdersApi<B> {
    pub fn new(db: B, cache: Arc<QueryCache>, producers: EventProducers) -> Self {
        Self { db, cache, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }
}

impl<B> OrdersApi<B>
where B: OrderStore
{
    /// Fetches every order with its items, newest first.
    ///
    /// The result is cached under [`ORDERS_QUERY_KEY`]. Within the cache's freshness window, and as long as no
    /// mutation has invalidated it, the cached list is returned without touching the store. Store errors are
    /// returned as-is.
    pub async fn list_orders(&self) -> Result<Arc<Vec<OrderWithItems>>, OrderStoreError> {
        self.cache.fetch_query(&ORDERS_QUERY_KEY, || self.db.fetch_orders_with_items()).await
    }

    /// Sets the status of order `id` and returns the updated row.
    ///
    /// On success the order list is invalidated and a success toast is published. On failure an error toast carrying
    /// the store's message is published and the error is returned; the cached list is not touched.
    pub async fn update_order_status(&self, id: &OrderId, status: OrderStatusType) -> Result<Order, OrderStoreError> {
        trace!("🔄️📦️ Setting status of order {id} to {status}");
        match self.db.update_order_status(id, status).await {
            Ok(order) => {
                debug!("🔄️📦️ Order {id} is now {status}");
                self.cache.invalidate(&ORDERS_QUERY_KEY).await;
                self.publish_toast(Toast::new(ORDER_UPDATED_TITLE, ORDER_UPDATED_DESCRIPTION)).await;
                self.call_order_status_changed_hook(&order).await;
                Ok(order)
            },
            Err(e) => {
                warn!("🔄️📦️ Could not update order {id}. {e}");
                self.publish_toast(Toast::error(format!("Failed to update order: {e}"))).await;
                Err(e)
            },
        }
    }

    /// Places a new order: the order row is inserted first, then one row per item using the new order's id.
    ///
    /// The two inserts are independent. If the item insert fails, the order row stays in the store and the item
    /// failure is reported like any other error.
    ///
    /// Returns the created order, without items. Success invalidates the order list and publishes a success toast;
    /// failure publishes an error toast and leaves the cache alone.
    pub async fn create_order(&self, order: NewOrder, items: Vec<NewOrderItem>) -> Result<Order, OrderStoreError> {
        match self.insert_order_then_items(order, items).await {
            Ok((order, item_count)) => {
                debug!("🔄️📦️ Order [{}] created as {} with {item_count} item(s)", order.order_number, order.id);
                self.cache.invalidate(&ORDERS_QUERY_KEY).await;
                self.publish_toast(Toast::new(ORDER_CREATED_TITLE, ORDER_CREATED_DESCRIPTION)).await;
                self.call_order_created_hook(&order, item_count).await;
                Ok(order)
            },
            Err(e) => {
                warn!("🔄️📦️ Could not create order. {e}");
                self.publish_toast(Toast::error(format!("Failed to create order: {e}"))).await;
                Err(e)
            },
        }
    }

    async fn insert_order_then_items(
        &self,
        order: NewOrder,
        items: Vec<NewOrderItem>,
    ) -> Result<(Order, usize), OrderStoreError> {
        let order = self.db.insert_order(order).await?;
        if items.is_empty() {
            return Ok((order, 0));
        }
        let inserted = self.db.insert_order_items(&order.id, items).await.map_err(|e| {
            error!("🔄️📦️ Items for order {} could not be saved, but the order itself was. {e}", order.id);
            e
        })?;
        Ok((order, inserted.len()))
    }

    async fn publish_toast(&self, toast: Toast) {
        for emitter in &self.producers.toast_producer {
            emitter.publish_event(toast.clone()).await;
        }
    }

    async fn call_order_created_hook(&self, order: &Order, item_count: usize) {
        for emitter in &self.producers.order_created_producer {
            debug!("🔄️📦️ Notifying order created hook subscribers");
            emitter.publish_event(OrderCreatedEvent::new(order.clone(), item_count)).await;
        }
    }

    async fn call_order_status_changed_hook(&self, order: &Order) {
        for emitter in &self.producers.order_status_changed_producer {
            debug!("🔄️📦️ Notifying order status changed hook subscribers");
            emitter.publish_event(OrderStatusChangedEvent::new(order.clone())).await;
        }
    }
}
