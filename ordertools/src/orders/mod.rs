mod command_def;
mod command_handler;

pub use command_def::{NewOrderFile, OrdersCommand};
pub use command_handler::run_orders_command;
