//! Raw and canonical client records, and the normalization between them

use serde::Serialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// An unvalidated field mapping as returned by a backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRecord {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl RawRecord {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyEntry {
    pub month: String,
    pub monthly_limit: Option<f64>,
    pub remaining_balance: Option<f64>,
    pub trip_total: Option<f64>,
}

/// Canonical client record used by filtering, aggregation and export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub id: String,
    pub client_name: String,
    pub account_number: String,
    /// Newest-first, as delivered by the backend. Never re-sorted.
    pub monthly_data: Vec<MonthlyEntry>,
    #[serde(skip)]
    pub raw: Map<String, Value>,
}

impl ClientRecord {
    /// The first entry of `monthly_data`. The backend is trusted to deliver
    /// months newest-first; no date comparison happens here.
    pub fn latest_month(&self) -> Option<&MonthlyEntry> {
        self.monthly_data.first()
    }

    /// The full field mapping as fetched, with the id alongside.
    pub fn raw_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("id".to_string(), Value::String(self.id.clone()));
        for (k, v) in &self.raw {
            if k != "id" {
                out.insert(k.clone(), v.clone());
            }
        }
        Value::Object(out)
    }
}

fn non_empty_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|n| n.is_finite())
}

fn normalize_entry(value: &Value) -> MonthlyEntry {
    let fields = value.as_object();
    let get = |key: &str| fields.and_then(|f| f.get(key));
    MonthlyEntry {
        month: non_empty_text(get("month")).unwrap_or_default(),
        monthly_limit: number(get("monthlyLimit")),
        remaining_balance: number(get("remainingBalance")),
        trip_total: number(get("tripTotal")),
    }
}

/// Converts a raw record into its canonical shape. Never fails: missing or
/// mistyped fields fall back to defaults.
pub fn normalize(raw: RawRecord) -> ClientRecord {
    let client_name = non_empty_text(raw.fields.get("clientName")).unwrap_or_else(|| raw.id.clone());
    let account_number = non_empty_text(raw.fields.get("accountNumber")).unwrap_or_default();
    let monthly_data = match raw.fields.get("monthlyData") {
        Some(Value::Array(items)) => items.iter().map(normalize_entry).collect(),
        _ => Vec::new(),
    };

    ClientRecord {
        id: raw.id,
        client_name,
        account_number,
        monthly_data,
        raw: raw.fields,
    }
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn accented_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

/// Collation-style name ordering: base letters first (accents and case
/// ignored), then accents, then case with lowercase first. Exact text breaks
/// the remaining ties, so the order is total.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented_letters(a).cmp(accented_letters(b)))
        .then_with(|| b.cmp(a))
}

/// Normalizes a fetched batch and sorts it by client name. The sort is stable:
/// equal names keep their fetch order.
pub fn normalize_batch(raw: Vec<RawRecord>) -> Vec<ClientRecord> {
    let mut clients: Vec<ClientRecord> = raw.into_iter().map(normalize).collect();
    clients.sort_by(|a, b| locale_cmp(&a.client_name, &b.client_name));
    clients
}
