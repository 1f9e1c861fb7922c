use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use order_common::Money;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Conversion error: {0}")]
pub struct ConversionError(String);

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
/// The lifecycle of an order: `New` → `Preparing` → `Ready` → `Served`, or `Cancelled` at any point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusType {
    /// The order has been placed, but the kitchen has not started on it.
    New,
    /// The kitchen is working on the order.
    Preparing,
    /// The order is ready for pickup or to be taken to the table.
    Ready,
    /// The order has been handed to the customer.
    Served,
    /// The order was cancelled by staff or the customer.
    Cancelled,
}

impl OrderStatusType {
    pub const ALL: [OrderStatusType; 5] = [Self::New, Self::Preparing, Self::Ready, Self::Served, Self::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Served => "served",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "served" => Ok(Self::Served),
            "cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------      OrderType        ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
pub enum OrderType {
    #[sqlx(rename = "dine-in")]
    #[serde(rename = "dine-in")]
    DineIn,
    #[sqlx(rename = "takeaway")]
    #[serde(rename = "takeaway")]
    Takeaway,
}

impl Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::DineIn => write!(f, "dine-in"),
            OrderType::Takeaway => write!(f, "takeaway"),
        }
    }
}

impl FromStr for OrderType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dine-in" => Ok(Self::DineIn),
            "takeaway" => Ok(Self::Takeaway),
            s => Err(ConversionError(format!("Invalid order type: {s}"))),
        }
    }
}

//--------------------------------------        OrderId        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------     OptionValue       ---------------------------------------------------------
/// Free-form modifier and add-on selections attached to an order item.
///
/// The store treats these as schemaless JSON, so the map is kept generic rather than typed per menu item.
pub type OptionMap = BTreeMap<String, OptionValue>;

/// A single value inside an [`OptionMap`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<OptionValue>),
    Map(OptionMap),
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<OptionMap> for OptionValue {
    fn from(value: OptionMap) -> Self {
        Self::Map(value)
    }
}

/// Reads an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl<T: Into<OptionValue>> From<Vec<T>> for OptionValue {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

//--------------------------------------        Order          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// The human-friendly number shown on tickets and screens
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub order_type: OrderType,
    pub status: OrderStatusType,
    pub total_amount: Money,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      NewOrder         ---------------------------------------------------------
/// Everything needed to place an order. The store assigns the id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub order_type: OrderType,
    pub status: OrderStatusType,
    pub total_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewOrder {
    /// Creates a new order with `New` status and no phone number or notes.
    pub fn new<S: Into<String>>(
        order_number: S,
        customer_name: S,
        customer_email: S,
        order_type: OrderType,
        total_amount: Money,
    ) -> Self {
        Self {
            order_number: order_number.into(),
            customer_name: customer_name.into(),
            customer_email: customer_email.into(),
            customer_phone: None,
            order_type,
            status: OrderStatusType::New,
            total_amount,
            notes: None,
        }
    }

    pub fn with_phone<S: Into<String>>(mut self, phone: S) -> Self {
        self.customer_phone = Some(phone.into());
        self
    }

    pub fn with_notes<S: Into<String>>(mut self, notes: S) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn is_equivalent(&self, order: &Order) -> bool {
        self.order_number == order.order_number
            && self.customer_name == order.customer_name
            && self.customer_email == order.customer_email
            && self.customer_phone == order.customer_phone
            && self.order_type == order.order_type
            && self.status == order.status
            && self.total_amount == order.total_amount
            && self.notes == order.notes
    }
}

//--------------------------------------   MenuItemSummary     ---------------------------------------------------------
/// The display fields of a menu item, fetched alongside an order item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemSummary {
    pub name: String,
    pub description: Option<String>,
}

//--------------------------------------      OrderItem        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub order_id: OrderId,
    pub menu_item_id: String,
    pub quantity: i64,
    /// The unit price at the time of ordering
    pub price: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub selected_options: OptionMap,
    #[serde(default, deserialize_with = "null_as_default")]
    pub selected_add_ons: OptionMap,
    /// Only present when the item was fetched with its menu item joined in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_items: Option<MenuItemSummary>,
}

impl OrderItem {
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

//--------------------------------------    NewOrderItem       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub menu_item_id: String,
    pub quantity: i64,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_options: Option<OptionMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_add_ons: Option<OptionMap>,
}

impl NewOrderItem {
    pub fn new<S: Into<String>>(menu_item_id: S, quantity: i64, price: Money) -> Self {
        Self { menu_item_id: menu_item_id.into(), quantity, price, selected_options: None, selected_add_ons: None }
    }

    pub fn with_options(mut self, options: OptionMap) -> Self {
        self.selected_options = Some(options);
        self
    }

    pub fn with_add_ons(mut self, add_ons: OptionMap) -> Self {
        self.selected_add_ons = Some(add_ons);
        self
    }

    /// Binds this item to `order_id`, replacing absent option maps with empty ones.
    pub fn into_row(self, order_id: &OrderId) -> OrderItemRow {
        OrderItemRow {
            order_id: order_id.clone(),
            menu_item_id: self.menu_item_id,
            quantity: self.quantity,
            price: self.price,
            selected_options: self.selected_options.unwrap_or_default(),
            selected_add_ons: self.selected_add_ons.unwrap_or_default(),
        }
    }
}

/// An order item as it is written to the `order_items` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemRow {
    pub order_id: OrderId,
    pub menu_item_id: String,
    pub quantity: i64,
    pub price: Money,
    pub selected_options: OptionMap,
    pub selected_add_ons: OptionMap,
}

//--------------------------------------   OrderWithItems      ---------------------------------------------------------
/// An order together with its line items, as returned by the order list query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_items: Vec<OrderItem>,
}

impl OrderWithItems {
    pub fn new(order: Order, order_items: Vec<OrderItem>) -> Self {
        Self { order, order_items }
    }

    pub fn item_count(&self) -> usize {
        self.order_items.len()
    }
}
