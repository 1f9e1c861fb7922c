use order_engine::{
    db_types::{OptionMap, OptionValue, Order, OrderItem, OrderWithItems},
    events::{Toast, ToastVariant},
};
use prettytable::{
    format::{LinePosition, LineSeparator, TableFormat},
    row,
    Table,
};

fn markdown_format() -> TableFormat {
    prettytable::format::FormatBuilder::new()
        .column_separator('|')
        .borders('|')
        .separator(LinePosition::Title, LineSeparator::new('-', '|', '|', '|'))
        .padding(1, 1)
        .build()
}

fn markdown_style(table: &mut Table) {
    table.set_format(markdown_format());
}

pub fn format_toast(toast: &Toast) -> String {
    let icon = match toast.variant {
        ToastVariant::Default => "✅️",
        ToastVariant::Destructive => "❌️",
    };
    format!("{icon} {}: {}", toast.title, toast.description)
}

pub fn format_order_summary(order: &Order) -> String {
    format!(
        "Order [{number}] ({id}) for {name}: {status}, {total}. Last updated {updated}",
        number = order.order_number,
        id = order.id,
        name = order.customer_name,
        status = order.status,
        total = order.total_amount,
        updated = order.updated_at.format("%Y-%m-%d %H:%M:%S"),
    )
}

pub fn format_orders(orders: &[OrderWithItems]) -> String {
    if orders.is_empty() {
        return "No orders".to_string();
    }
    let mut table = Table::new();
    table.set_titles(row![
        "ID", "Number", "Customer", "Email", "Type", "Status", "Total", "Items", "Notes", "Created At", "Updated At"
    ]);
    orders.iter().for_each(|o| {
        let order = &o.order;
        let items = o.order_items.iter().map(format_item).collect::<Vec<String>>().join("\n");
        table.add_row(row![
            order.id,
            order.order_number,
            order.customer_name,
            order.customer_email,
            order.order_type.to_string(),
            order.status.to_string(),
            order.total_amount.to_string(),
            items,
            order.notes.as_deref().unwrap_or_default(),
            order.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            order.updated_at.format("%Y-%m-%d %H:%M:%S").to_string()
        ]);
    });
    markdown_style(&mut table);
    format!("{table}\n{} order(s)", orders.len())
}

fn format_item(item: &OrderItem) -> String {
    let name = item.menu_items.as_ref().map(|m| m.name.as_str()).unwrap_or(item.menu_item_id.as_str());
    let mut line = format!("{}x {name} @ {}", item.quantity, item.price);
    let extras = [format_options(&item.selected_options), format_options(&item.selected_add_ons)]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<String>>()
        .join("; ");
    if !extras.is_empty() {
        line.push_str(&format!(" ({extras})"));
    }
    line
}

fn format_options(options: &OptionMap) -> String {
    options.iter().map(|(k, v)| format!("{k}: {}", format_option_value(v))).collect::<Vec<String>>().join(", ")
}

fn format_option_value(value: &OptionValue) -> String {
    match value {
        OptionValue::Null => "-".to_string(),
        OptionValue::Bool(true) => "yes".to_string(),
        OptionValue::Bool(false) => "no".to_string(),
        OptionValue::Number(n) => n.to_string(),
        OptionValue::String(s) => s.clone(),
        OptionValue::List(l) => l.iter().map(format_option_value).collect::<Vec<String>>().join("/"),
        OptionValue::Map(m) => format!("{{{}}}", format_options(m)),
    }
}
