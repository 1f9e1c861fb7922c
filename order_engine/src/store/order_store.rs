use thiserror::Error;

use crate::db_types::{NewOrder, NewOrderItem, Order, OrderId, OrderItem, OrderStatusType, OrderWithItems};

/// The four store calls that the order operations are composed from.
#[allow(async_fn_in_trait)]
pub trait OrderStore {
    /// The URL of the store
    fn url(&self) -> &str;

    /// Fetches every order, each with its items and each item's menu item name and description.
    ///
    /// Orders are sorted by `created_at`, most recent first.
    async fn fetch_orders_with_items(&self) -> Result<Vec<OrderWithItems>, OrderStoreError>;

    /// Sets the status of the order matching `id` and stamps `updated_at` with the current time.
    ///
    /// Returns the updated row, or [`OrderStoreError::OrderNotFound`] if no row has that id.
    async fn update_order_status(&self, id: &OrderId, status: OrderStatusType) -> Result<Order, OrderStoreError>;

    /// Inserts a single order row and returns it, including the id and timestamps assigned by the store.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderStoreError>;

    /// Inserts one row per item, all referencing `order_id`. Absent option maps are stored as empty maps.
    ///
    /// This is a separate call from [`Self::insert_order`]. Nothing ties the two together, so a failure here leaves
    /// the order row in place.
    async fn insert_order_items(
        &self,
        order_id: &OrderId,
        items: Vec<NewOrderItem>,
    ) -> Result<Vec<OrderItem>, OrderStoreError>;
}

/// Every store failure, whatever its cause, ends up as one of these. Callers do not branch on the variant; they
/// surface the message.
#[derive(Debug, Clone, Error)]
pub enum OrderStoreError {
    #[error("We have an internal database engine (configuration/uptime etc.) error: {0}")]
    DatabaseError(String),
    #[error("The remote store rejected the request. Error {status}. {message}")]
    RemoteError { status: u16, message: String },
    #[error("Could not reach the remote store: {0}")]
    ConnectionError(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("The store returned data that could not be read: {0}")]
    InvalidData(String),
}

impl From<sqlx::Error> for OrderStoreError {
    fn from(e: sqlx::Error) -> Self {
        OrderStoreError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for OrderStoreError {
    fn from(e: serde_json::Error) -> Self {
        OrderStoreError::InvalidData(e.to_string())
    }
}
