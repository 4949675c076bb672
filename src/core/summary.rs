//! Aggregate statistics over a filtered client list

use crate::core::record::ClientRecord;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    pub count: usize,
    pub total_remaining: f64,
}

/// Counts the records and sums the remaining balance of each record's latest
/// month. Absent balances and empty histories contribute 0.
pub fn summarize<'a, I>(records: I) -> Summary
where
    I: IntoIterator<Item = &'a ClientRecord>,
{
    records
        .into_iter()
        .fold(Summary::default(), |mut acc, record| {
            acc.count += 1;
            acc.total_remaining += record
                .latest_month()
                .and_then(|m| m.remaining_balance)
                .unwrap_or(0.0);
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::MonthlyEntry;

    fn entry(month: &str, remaining: Option<f64>) -> MonthlyEntry {
        MonthlyEntry {
            month: month.to_string(),
            monthly_limit: None,
            remaining_balance: remaining,
            trip_total: None,
        }
    }

    fn client(id: &str, months: Vec<MonthlyEntry>) -> ClientRecord {
        ClientRecord {
            id: id.to_string(),
            client_name: id.to_string(),
            account_number: String::new(),
            monthly_data: months,
            raw: Default::default(),
        }
    }

    #[test]
    fn test_empty_list() {
        let summary = summarize(&[] as &[ClientRecord]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.total_remaining, 0.0);
    }

    #[test]
    fn test_only_latest_month_counts() {
        let records = vec![
            client(
                "a",
                vec![entry("2024-05", Some(100.0)), entry("2024-04", Some(999.0))],
            ),
            client("b", vec![entry("2024-05", Some(20.5))]),
            client("c", vec![entry("2024-05", None)]),
            client("d", Vec::new()),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.count, 4);
        assert!((summary.total_remaining - 120.5).abs() < 1e-9);
    }

    #[test]
    fn test_accepts_filtered_references() {
        let records = vec![client("a", vec![entry("2024-05", Some(7.0))])];
        let filtered: Vec<&ClientRecord> = records.iter().collect();
        let summary = summarize(filtered.iter().copied());
        assert_eq!(summary.count, 1);
        assert_eq!(summary.total_remaining, 7.0);
    }
}
