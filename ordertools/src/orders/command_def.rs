use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::Subcommand;
use order_engine::db_types::{NewOrder, NewOrderItem, OrderStatusType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Subcommand)]
pub enum OrdersCommand {
    /// Fetch all orders with their items, newest first
    List {
        /// Print the orders as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Set the status of the order with the given ID
    Status {
        #[arg(required = true, index = 1)]
        id: String,
        /// One of new, preparing, ready, served or cancelled
        #[arg(required = true, index = 2)]
        status: OrderStatusType,
    },
    /// Place a new order described by a JSON file with `order` and `items` fields
    Create {
        #[arg(required = true, index = 1)]
        file: String,
    },
}

/// The contents of an order file accepted by `orders create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderFile {
    pub order: NewOrder,
    #[serde(default)]
    pub items: Vec<NewOrderItem>,
}

impl NewOrderFile {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
        let file =
            serde_json::from_str(&json).with_context(|| format!("{} is not a valid order file", path.display()))?;
        Ok(file)
    }
}

#[cfg(test)]
mod test {
    use clap::Parser;
    use order_engine::db_types::OrderType;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(subcommand)]
        command: OrdersCommand,
    }

    #[test]
    fn status_accepts_every_known_value() {
        for status in OrderStatusType::ALL {
            let cli = Cli::try_parse_from(["orders", "status", "o1", status.as_str()]).unwrap();
            match cli.command {
                OrdersCommand::Status { id, status: parsed } => {
                    assert_eq!(id, "o1");
                    assert_eq!(parsed, status);
                },
                c => panic!("Expected a status command, got {c:?}"),
            }
        }
    }

    #[test]
    fn status_rejects_unknown_values() {
        let err = Cli::try_parse_from(["orders", "status", "o1", "garbage"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(Cli::try_parse_from(["orders", "status", "o1", "paid"]).is_err());
    }

    #[test]
    fn parse_order_file() {
        let json = include_str!("../test_assets/new_order.json");
        let file: NewOrderFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.order.order_number, "2001");
        assert_eq!(file.order.order_type, OrderType::Takeaway);
        assert_eq!(file.order.status, OrderStatusType::New);
        assert_eq!(file.items.len(), 2);
        assert!(file.items[0].selected_options.is_some());
        assert!(file.items[1].selected_options.is_none());
    }

    #[test]
    fn items_default_to_empty() {
        let json = r#"{"order": {"order_number": "7", "customer_name": "Al", "customer_email": "al@example.com",
            "order_type": "dine-in", "status": "new", "total_amount": 0}}"#;
        let file: NewOrderFile = serde_json::from_str(json).unwrap();
        assert!(file.items.is_empty());
    }
}
