use order_engine::{
    db_types::{NewOrder, NewOrderItem, Order, OrderId, OrderItem, OrderStatusType, OrderWithItems},
    OrderStore,
    OrderStoreError,
};

use crate::PostgrestApi;

impl OrderStore for PostgrestApi {
    fn url(&self) -> &str {
        self.config().url.as_str()
    }

    async fn fetch_orders_with_items(&self) -> Result<Vec<OrderWithItems>, OrderStoreError> {
        Ok(PostgrestApi::fetch_orders_with_items(self).await?)
    }

    async fn update_order_status(&self, id: &OrderId, status: OrderStatusType) -> Result<Order, OrderStoreError> {
        self.patch_order_status(id, status).await?.ok_or_else(|| OrderStoreError::OrderNotFound(id.clone()))
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderStoreError> {
        Ok(PostgrestApi::insert_order(self, &order).await?)
    }

    async fn insert_order_items(
        &self,
        order_id: &OrderId,
        items: Vec<NewOrderItem>,
    ) -> Result<Vec<OrderItem>, OrderStoreError> {
        Ok(PostgrestApi::insert_order_items(self, order_id, items).await?)
    }
}
