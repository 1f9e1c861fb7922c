use std::sync::Arc;

use log::*;
use order_engine::db_types::{
    NewOrder,
    NewOrderItem,
    Order,
    OrderId,
    OrderItem,
    OrderItemRow,
    OrderStatusType,
    OrderWithItems,
};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::PostgrestConfig,
    data_objects::{eq_filter, StatusPatch, ORDERS_WITH_ITEMS_SELECT},
    PostgrestApiError,
};

#[derive(Debug, Clone)]
pub struct PostgrestApi {
    config: PostgrestConfig,
    client: Arc<Client>,
}

impl PostgrestApi {
    pub fn new(config: PostgrestConfig) -> Result<Self, PostgrestApiError> {
        let mut headers = HeaderMap::with_capacity(3);
        if config.api_key.is_empty() {
            warn!("🌐️ No API key configured. Requests will be sent without credentials.");
        } else {
            let key = config.api_key.reveal().as_str();
            let val = HeaderValue::from_str(key).map_err(|e| PostgrestApiError::Initialization(e.to_string()))?;
            headers.insert("apikey", val);
            let bearer = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| PostgrestApiError::Initialization(e.to_string()))?;
            headers.insert(AUTHORIZATION, bearer);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| PostgrestApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &PostgrestConfig {
        &self.config
    }

    /// Sends a request to `path` (relative to the REST root) and deserializes the JSON response.
    ///
    /// Anything other than a GET asks for the affected rows back with `Prefer: return=representation`.
    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, PostgrestApiError> {
        let url = self.url(path);
        trace!("🌐️ Sending REST query: {method} {url}");
        let is_write = method != Method::GET;
        let mut req = self.client.request(method, url);
        if is_write {
            req = req.header("Prefer", "return=representation");
        }
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| PostgrestApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("🌐️ REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| PostgrestApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message =
                response.text().await.map_err(|e| PostgrestApiError::RestResponseError(e.to_string()))?;
            warn!("🌐️ REST query failed. Error {status}. {message}");
            Err(PostgrestApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}{path}", self.config.url.trim_end_matches('/'), self.config.schema_path)
    }

    /// Fetches every order with its items (and each item's menu entry), newest first.
    pub async fn fetch_orders_with_items(&self) -> Result<Vec<OrderWithItems>, PostgrestApiError> {
        let params = [("select", ORDERS_WITH_ITEMS_SELECT), ("order", "created_at.desc")];
        debug!("🌐️ Fetching orders");
        let orders = self.rest_query::<Vec<OrderWithItems>, ()>(Method::GET, "/orders", &params, None).await?;
        debug!("🌐️ Fetched {} orders", orders.len());
        Ok(orders)
    }

    /// Sets the status of order `id`. Returns `None` if no order has that id.
    pub async fn patch_order_status(
        &self,
        id: &OrderId,
        status: OrderStatusType,
    ) -> Result<Option<Order>, PostgrestApiError> {
        let filter = eq_filter(id.as_str());
        let params = [("id", filter.as_str())];
        let body = StatusPatch::new(status);
        debug!("🌐️ Setting status of order {id} to {status}");
        let rows = self.rest_query::<Vec<Order>, _>(Method::PATCH, "/orders", &params, Some(body)).await?;
        Ok(rows.into_iter().next())
    }

    pub async fn insert_order(&self, order: &NewOrder) -> Result<Order, PostgrestApiError> {
        debug!("🌐️ Inserting order [{}]", order.order_number);
        let rows = self.rest_query::<Vec<Order>, _>(Method::POST, "/orders", &[], Some(order)).await?;
        let order = rows.into_iter().next().ok_or(PostgrestApiError::EmptyResponse)?;
        info!("🌐️ Inserted order [{}] as {}", order.order_number, order.id);
        Ok(order)
    }

    /// Inserts all of `items` for order `order_id` in a single request.
    pub async fn insert_order_items(
        &self,
        order_id: &OrderId,
        items: Vec<NewOrderItem>,
    ) -> Result<Vec<OrderItem>, PostgrestApiError> {
        let rows = items.into_iter().map(|i| i.into_row(order_id)).collect::<Vec<OrderItemRow>>();
        debug!("🌐️ Inserting {} items for order {order_id}", rows.len());
        let inserted = self.rest_query::<Vec<OrderItem>, _>(Method::POST, "/order_items", &[], Some(rows)).await?;
        Ok(inserted)
    }
}
