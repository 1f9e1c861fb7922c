use std::{future::Future, pin::Pin, sync::Arc};

use tokio::task::JoinHandle;

use crate::events::{EventHandler, EventProducer, Handler, OrderCreatedEvent, OrderStatusChangedEvent, Toast};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub toast_producer: Vec<EventProducer<Toast>>,
    pub order_created_producer: Vec<EventProducer<OrderCreatedEvent>>,
    pub order_status_changed_producer: Vec<EventProducer<OrderStatusChangedEvent>>,
}

pub struct EventHandlers {
    pub on_toast: Option<EventHandler<Toast>>,
    pub on_order_created: Option<EventHandler<OrderCreatedEvent>>,
    pub on_order_status_changed: Option<EventHandler<OrderStatusChangedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_toast = hooks.on_toast.map(|f| EventHandler::new(buffer_size, f));
        let on_order_created = hooks.on_order_created.map(|f| EventHandler::new(buffer_size, f));
        let on_order_status_changed = hooks.on_order_status_changed.map(|f| EventHandler::new(buffer_size, f));
        Self { on_toast, on_order_created, on_order_status_changed }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_toast {
            result.toast_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_order_created {
            result.order_created_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_order_status_changed {
            result.order_status_changed_producer.push(handler.subscribe());
        }
        result
    }

    /// Spawns a task for each registered handler. Each task ends once all of its producers have been dropped.
    ///
    /// The returned handles resolve when their handler has delivered every queued event.
    pub fn start_handlers(self) -> Vec<JoinHandle<()>> {
        let mut running = Vec::with_capacity(3);
        running.extend(self.on_toast.map(EventHandler::spawn));
        running.extend(self.on_order_created.map(EventHandler::spawn));
        running.extend(self.on_order_status_changed.map(EventHandler::spawn));
        running
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_toast: Option<Handler<Toast>>,
    pub on_order_created: Option<Handler<OrderCreatedEvent>>,
    pub on_order_status_changed: Option<Handler<OrderStatusChangedEvent>>,
}

impl EventHooks {
    pub fn on_toast<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(Toast) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_toast = Some(Arc::new(f));
        self
    }

    pub fn on_order_created<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderCreatedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_order_created = Some(Arc::new(f));
        self
    }

    pub fn on_order_status_changed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderStatusChangedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_order_status_changed = Some(Arc::new(f));
        self
    }
}
