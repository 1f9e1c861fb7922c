#![allow(dead_code)]
use std::sync::{Arc, Mutex};

use futures_util::FutureExt;
use order_engine::{
    cache::{CacheConfig, QueryCache},
    events::{EventHandlers, EventHooks, OrderCreatedEvent, OrderStatusChangedEvent, Toast},
    OrdersApi,
};
use tokio::task::JoinHandle;

/// Collects everything the hooks receive, so that tests can inspect it once the handlers have shut down.
#[derive(Clone, Default)]
pub struct EventLog {
    pub toasts: Arc<Mutex<Vec<Toast>>>,
    pub created: Arc<Mutex<Vec<OrderCreatedEvent>>>,
    pub status_changes: Arc<Mutex<Vec<OrderStatusChangedEvent>>>,
}

impl EventLog {
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<OrderCreatedEvent> {
        self.created.lock().unwrap().clone()
    }

    pub fn status_changes(&self) -> Vec<OrderStatusChangedEvent> {
        self.status_changes.lock().unwrap().clone()
    }
}

pub struct Harness<B> {
    pub api: OrdersApi<B>,
    pub log: EventLog,
    handlers: Vec<JoinHandle<()>>,
}

impl<B> Harness<B> {
    /// Builds an API around `db` with every hook recording into an [`EventLog`].
    pub fn new(db: B, cache: CacheConfig) -> Self {
        let log = EventLog::default();
        let mut hooks = EventHooks::default();
        let toasts = log.toasts.clone();
        hooks.on_toast(move |toast| {
            let toasts = toasts.clone();
            async move { toasts.lock().unwrap().push(toast) }.boxed()
        });
        let created = log.created.clone();
        hooks.on_order_created(move |ev| {
            let created = created.clone();
            async move { created.lock().unwrap().push(ev) }.boxed()
        });
        let changes = log.status_changes.clone();
        hooks.on_order_status_changed(move |ev| {
            let changes = changes.clone();
            async move { changes.lock().unwrap().push(ev) }.boxed()
        });
        let handlers = EventHandlers::new(10, hooks);
        let producers = handlers.producers();
        let tasks = handlers.start_handlers();
        let api = OrdersApi::new(db, Arc::new(QueryCache::new(cache)), producers);
        Self { api, log, handlers: tasks }
    }

    /// Drops the API (and with it, every producer), waits for the hooks to drain, and returns what they saw.
    pub async fn finish(self) -> (B, EventLog)
    where B: Clone {
        let Harness { api, log, handlers } = self;
        let db = api.db().clone();
        drop(api);
        for h in handlers {
            h.await.expect("hook handler panicked");
        }
        (db, log)
    }
}
