use super::ui;
use crate::core::filter::PrefixSet;
use crate::core::record::ClientRecord;
use crate::core::session::{ClientSnapshot, ClientView};
use comfy_table::{Cell, Color};

/// Search and filter state for the `list` command.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub query: String,
    /// 0 for all clients, 1..=3 for a prefix slot
    pub filter: usize,
    pub prefixes: PrefixSet,
}

fn filter_label(options: &ListOptions) -> String {
    if options.filter == 0 {
        return "All".to_string();
    }
    match options.prefixes.as_slice().get(options.filter - 1) {
        Some(p) if !p.is_empty() => format!("starts with '{p}'"),
        _ => "starts with '(empty)'".to_string(),
    }
}

fn client_row(client: &ClientRecord, symbol: &str) -> Vec<Cell> {
    let mut row = vec![Cell::new(&client.client_name), ui::text_cell(&client.account_number)];
    match client.latest_month() {
        Some(m) => {
            row.push(ui::text_cell(&m.month));
            row.push(ui::money_cell(m.remaining_balance, symbol));
            row.push(ui::money_cell(m.trip_total, symbol));
        }
        None => {
            row.push(Cell::new("No monthly data").fg(Color::DarkGrey));
            row.push(ui::placeholder_cell());
            row.push(ui::placeholder_cell());
        }
    }
    row
}

pub fn render(snapshot: &ClientSnapshot, view: &ClientView<'_>, options: &ListOptions, symbol: &str) -> String {
    let mut output = String::new();

    if let (Some(source), Some(at)) = (snapshot.source, snapshot.fetched_at) {
        output.push_str(&ui::style_text(
            &format!("Loaded from {source} at {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
            ui::StyleType::Subtle,
        ));
        output.push_str("\n\n");
    }
    output.push_str(&format!(
        "Clients {}\n\n",
        ui::style_text(&format!("(filter: {})", filter_label(options)), ui::StyleType::Subtle)
    ));

    if view.records.is_empty() {
        output.push_str(&ui::style_text("No clients match your filters.", ui::StyleType::Subtle));
    } else {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Client"),
            ui::header_cell("Account #"),
            ui::header_cell("Month"),
            ui::header_cell("Remaining"),
            ui::header_cell("Trip Total"),
        ]);
        for client in &view.records {
            table.add_row(client_row(client, symbol));
        }
        output.push_str(&table.to_string());
    }

    output.push_str(&format!(
        "\n\n{} {}\n{} {}",
        ui::style_text("Clients shown:", ui::StyleType::TotalLabel),
        view.summary.count,
        ui::style_text("Total remaining balance:", ui::StyleType::TotalLabel),
        ui::style_text(
            &crate::core::money::format_money(Some(view.summary.total_remaining), symbol),
            ui::StyleType::TotalValue
        ),
    ));
    output
}

pub fn run(snapshot: &ClientSnapshot, options: &ListOptions, symbol: &str) {
    let view = snapshot.view(&options.query, options.filter, options.prefixes.as_slice());
    println!("{}", render(snapshot, &view, options, symbol));
}
