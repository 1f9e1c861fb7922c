use chrono::{DateTime, Utc};
use order_engine::db_types::OrderStatusType;
use serde::{Deserialize, Serialize};

/// The embedded-resource select used to fetch orders together with their items and each item's menu entry.
pub const ORDERS_WITH_ITEMS_SELECT: &str = "*,order_items(*,menu_items(name,description))";

/// Body of the status update `PATCH`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusPatch {
    pub status: OrderStatusType,
    pub updated_at: DateTime<Utc>,
}

impl StatusPatch {
    pub fn new(status: OrderStatusType) -> Self {
        Self { status, updated_at: Utc::now() }
    }
}

/// PostgREST filter syntax for an equality match.
pub fn eq_filter(value: &str) -> String {
    format!("eq.{value}")
}

#[cfg(test)]
mod test {
    use order_common::Money;
    use order_engine::db_types::{Order, OrderItem, OrderType, OrderWithItems, OptionValue};

    use super::*;

    #[test]
    fn orders_with_embedded_items() {
        let json = include_str!("./test_assets/orders_with_items.json");
        let orders: Vec<OrderWithItems> = serde_json::from_str(json).unwrap();
        assert_eq!(orders.len(), 2);

        let first = &orders[0];
        assert_eq!(first.order.id.as_str(), "3f1c2a9e-7d4b-4a51-9b0e-5c8d2e6f1a77");
        assert_eq!(first.order.order_number, "1042");
        assert_eq!(first.order.order_type, OrderType::Takeaway);
        assert_eq!(first.order.status, OrderStatusType::Preparing);
        assert_eq!(first.order.total_amount, Money::from(2140));
        assert_eq!(first.order.customer_phone.as_deref(), Some("+1 555 0100"));
        assert_eq!(first.item_count(), 2);
        let burger = &first.order_items[0];
        assert_eq!(burger.menu_items.as_ref().map(|m| m.name.as_str()), Some("Classic Burger"));
        assert_eq!(burger.selected_options.get("doneness"), Some(&OptionValue::from("medium")));
        assert_eq!(burger.line_total(), Money::from(1290));
        let fries = &first.order_items[1];
        assert!(fries.selected_options.is_empty());
        assert_eq!(fries.menu_items.as_ref().and_then(|m| m.description.as_deref()), None);

        let second = &orders[1];
        assert_eq!(second.order.order_type, OrderType::DineIn);
        assert!(second.order.notes.is_none());
        assert!(second.order_items.is_empty());
        assert!(first.order.created_at > second.order.created_at);
    }

    #[test]
    fn null_option_columns_read_as_empty() {
        let json = include_str!("./test_assets/orders_with_null_options.json");
        let orders: Vec<OrderWithItems> = serde_json::from_str(json).unwrap();
        assert_eq!(orders.len(), 1);
        let items = &orders[0].order_items;
        assert_eq!(items.len(), 2);
        assert!(items[0].selected_options.is_empty());
        assert!(items[0].selected_add_ons.contains_key("bacon"));
        assert_eq!(items[1].selected_options.get("size"), Some(&OptionValue::from("small")));
        assert!(items[1].selected_add_ons.is_empty());
    }

    #[test]
    fn patched_order_representation() {
        let json = include_str!("./test_assets/patched_order.json");
        let rows: Vec<Order> = serde_json::from_str(json).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, OrderStatusType::Ready);
        assert!(rows[0].updated_at > rows[0].created_at);
    }

    #[test]
    fn inserted_items_representation() {
        let json = include_str!("./test_assets/inserted_items.json");
        let rows: Vec<OrderItem> = serde_json::from_str(json).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.order_id.as_str() == "9b2d4c11-0a6e-4f0f-8a43-2f1d7c3e5b90"));
        assert!(rows.iter().all(|r| r.menu_items.is_none()));
        assert_eq!(rows[1].selected_add_ons.get("extra_shot"), Some(&OptionValue::Bool(true)));
    }

    #[test]
    fn status_patch_body() {
        let patch = StatusPatch::new(OrderStatusType::Served);
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["status"], "served");
        assert!(json["updated_at"].is_string());
        assert_eq!(eq_filter("o1"), "eq.o1");
    }
}
