use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::{Duration, Utc};

use crate::{
    db_types::{
        MenuItemSummary,
        NewOrder,
        NewOrderItem,
        Order,
        OrderId,
        OrderItem,
        OrderStatusType,
        OrderWithItems,
    },
    store::{OrderStore, OrderStoreError},
};

/// The store calls that [`MemoryStore`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreCall {
    FetchOrders,
    UpdateStatus,
    InsertOrder,
    InsertItems,
}

#[derive(Default)]
struct State {
    orders: Vec<Order>,
    items: Vec<OrderItem>,
    menu_items: HashMap<String, MenuItemSummary>,
    failures: HashSet<StoreCall>,
    calls: HashMap<StoreCall, usize>,
    next_id: u64,
}

impl State {
    fn call(&mut self, call: StoreCall) -> Result<(), OrderStoreError> {
        *self.calls.entry(call).or_default() += 1;
        if self.failures.contains(&call) {
            return Err(OrderStoreError::RemoteError { status: 500, message: format!("{call:?} failed") });
        }
        Ok(())
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }
}

/// An in-memory [`OrderStore`] that behaves like the relational store (foreign keys included) and can be told to fail
/// specific calls. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("MemoryStore mutex poisoned")
    }

    pub fn fail_on(&self, call: StoreCall) {
        self.lock().failures.insert(call);
    }

    pub fn succeed_on(&self, call: StoreCall) {
        self.lock().failures.remove(&call);
    }

    pub fn call_count(&self, call: StoreCall) -> usize {
        self.lock().calls.get(&call).copied().unwrap_or(0)
    }

    pub fn add_menu_item(&self, id: &str, name: &str, description: Option<&str>) {
        let item = MenuItemSummary { name: name.to_string(), description: description.map(String::from) };
        self.lock().menu_items.insert(id.to_string(), item);
    }

    /// Stores `order` exactly as given, bypassing id and timestamp assignment.
    pub fn insert_raw_order(&self, order: Order) {
        self.lock().orders.push(order);
    }

    pub fn orders(&self) -> Vec<Order> {
        self.lock().orders.clone()
    }

    pub fn items(&self) -> Vec<OrderItem> {
        self.lock().items.clone()
    }
}

impl OrderStore for MemoryStore {
    fn url(&self) -> &str {
        "memory://"
    }

    async fn fetch_orders_with_items(&self) -> Result<Vec<OrderWithItems>, OrderStoreError> {
        let mut state = self.lock();
        state.call(StoreCall::FetchOrders)?;
        let mut orders = state.orders.clone();
        // Stable sort on the reversed list keeps later insertions first when timestamps tie
        orders.reverse();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let result = orders
            .into_iter()
            .map(|order| {
                let items = state
                    .items
                    .iter()
                    .filter(|i| i.order_id == order.id)
                    .cloned()
                    .map(|mut i| {
                        i.menu_items = state.menu_items.get(&i.menu_item_id).cloned();
                        i
                    })
                    .collect();
                OrderWithItems::new(order, items)
            })
            .collect();
        Ok(result)
    }

    async fn update_order_status(&self, id: &OrderId, status: OrderStatusType) -> Result<Order, OrderStoreError> {
        let mut state = self.lock();
        state.call(StoreCall::UpdateStatus)?;
        let order =
            state.orders.iter_mut().find(|o| &o.id == id).ok_or_else(|| OrderStoreError::OrderNotFound(id.clone()))?;
        order.status = status;
        order.updated_at = Utc::now().max(order.updated_at + Duration::microseconds(1));
        Ok(order.clone())
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderStoreError> {
        let mut state = self.lock();
        state.call(StoreCall::InsertOrder)?;
        let now = Utc::now();
        let order = Order {
            id: OrderId(state.next_id("order-")),
            order_number: order.order_number,
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            customer_phone: order.customer_phone,
            order_type: order.order_type,
            status: order.status,
            total_amount: order.total_amount,
            notes: order.notes,
            created_at: now,
            updated_at: now,
        };
        state.orders.push(order.clone());
        Ok(order)
    }

    async fn insert_order_items(
        &self,
        order_id: &OrderId,
        items: Vec<NewOrderItem>,
    ) -> Result<Vec<OrderItem>, OrderStoreError> {
        let mut state = self.lock();
        state.call(StoreCall::InsertItems)?;
        if !state.orders.iter().any(|o| &o.id == order_id) {
            return Err(OrderStoreError::DatabaseError(format!("FOREIGN KEY constraint failed: order {order_id}")));
        }
        if let Some(missing) = items.iter().find(|i| !state.menu_items.contains_key(&i.menu_item_id)) {
            let message = format!("FOREIGN KEY constraint failed: menu item {}", missing.menu_item_id);
            return Err(OrderStoreError::DatabaseError(message));
        }
        let mut inserted = Vec::with_capacity(items.len());
        for item in items {
            let row = item.into_row(order_id);
            inserted.push(OrderItem {
                id: state.next_id("item-"),
                order_id: row.order_id,
                menu_item_id: row.menu_item_id,
                quantity: row.quantity,
                price: row.price,
                selected_options: row.selected_options,
                selected_add_ons: row.selected_add_ons,
                menu_items: None,
            });
        }
        state.items.extend(inserted.iter().cloned());
        Ok(inserted)
    }
}
