//! CSV export of one client's monthly history

use crate::core::record::ClientRecord;

pub const CSV_HEADER: &str = "Month,Monthly Limit,Remaining Balance,Trip Total";

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Serializes the monthly history in its stored order.
///
/// The month label is wrapped in double quotes without escaping embedded
/// quotes. Absent numbers become empty cells. No trailing newline.
pub fn to_csv(record: &ClientRecord) -> String {
    let mut rows = Vec::with_capacity(record.monthly_data.len() + 1);
    rows.push(CSV_HEADER.to_string());
    for m in &record.monthly_data {
        rows.push(format!(
            "\"{}\",{},{},{}",
            m.month,
            cell(m.monthly_limit),
            cell(m.remaining_balance),
            cell(m.trip_total)
        ));
    }
    rows.join("\n")
}

/// `{clientName or id}_monthly.csv`, with path separators replaced so the
/// file always lands in the target directory.
pub fn export_filename(record: &ClientRecord) -> String {
    let base = if record.client_name.is_empty() {
        &record.id
    } else {
        &record.client_name
    };
    let base: String = base
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{base}_monthly.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::MonthlyEntry;

    fn client(name: &str, months: Vec<MonthlyEntry>) -> ClientRecord {
        ClientRecord {
            id: "id-1".to_string(),
            client_name: name.to_string(),
            account_number: String::new(),
            monthly_data: months,
            raw: Default::default(),
        }
    }

    #[test]
    fn test_single_month() {
        let record = client(
            "Ann",
            vec![MonthlyEntry {
                month: "2024-01".to_string(),
                monthly_limit: Some(500.0),
                remaining_balance: Some(120.5),
                trip_total: Some(30.0),
            }],
        );
        assert_eq!(
            to_csv(&record),
            "Month,Monthly Limit,Remaining Balance,Trip Total\n\"2024-01\",500,120.5,30"
        );
    }

    #[test]
    fn test_absent_values_are_empty_and_order_is_kept() {
        let record = client(
            "Ann",
            vec![
                MonthlyEntry {
                    month: "2024-02".to_string(),
                    monthly_limit: None,
                    remaining_balance: Some(0.0),
                    trip_total: None,
                },
                MonthlyEntry {
                    month: "2024-03".to_string(),
                    monthly_limit: Some(10.25),
                    remaining_balance: None,
                    trip_total: Some(-4.0),
                },
            ],
        );
        let csv = to_csv(&record);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "\"2024-02\",,0,");
        assert_eq!(lines[2], "\"2024-03\",10.25,,-4");
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_empty_history_is_header_only() {
        assert_eq!(to_csv(&client("Ann", Vec::new())), CSV_HEADER);
    }

    #[test]
    fn test_quotes_in_month_are_not_escaped() {
        let record = client(
            "Ann",
            vec![MonthlyEntry {
                month: "May \"24".to_string(),
                monthly_limit: None,
                remaining_balance: None,
                trip_total: None,
            }],
        );
        assert!(to_csv(&record).ends_with("\"May \"24\",,,"));
    }

    #[test]
    fn test_filename() {
        assert_eq!(export_filename(&client("Ann Lee", Vec::new())), "Ann Lee_monthly.csv");
        assert_eq!(export_filename(&client("", Vec::new())), "id-1_monthly.csv");
        assert_eq!(export_filename(&client("a/b", Vec::new())), "a_b_monthly.csv");
    }
}
