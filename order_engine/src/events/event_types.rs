use serde::{Deserialize, Serialize};

use crate::db_types::Order;

//--------------------------------------        Toast          ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    #[default]
    Default,
    /// Errors and other outcomes the user should not miss
    Destructive,
}

/// A short, user-visible notification. Rendering is up to whoever subscribes to the toast hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub variant: ToastVariant,
}

impl Toast {
    pub fn new<S: Into<String>>(title: S, description: S) -> Self {
        Self { title: title.into(), description: description.into(), variant: ToastVariant::Default }
    }

    /// A destructive toast with the generic "Error" title.
    pub fn error<S: Into<String>>(description: S) -> Self {
        Self { title: "Error".into(), description: description.into(), variant: ToastVariant::Destructive }
    }

    pub fn is_error(&self) -> bool {
        self.variant == ToastVariant::Destructive
    }
}

//--------------------------------------    Order events       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreatedEvent {
    pub order: Order,
    pub item_count: usize,
}

impl OrderCreatedEvent {
    pub fn new(order: Order, item_count: usize) -> Self {
        Self { order, item_count }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusChangedEvent {
    pub order: Order,
}

impl OrderStatusChangedEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}
