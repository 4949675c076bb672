use crate::core::session::ClientSnapshot;
use anyhow::{Context, Result, anyhow};

/// Pretty JSON of a client's raw fields, as fetched.
pub fn raw_view(snapshot: &ClientSnapshot, client: &str) -> Result<String> {
    let record = snapshot
        .find(client)
        .ok_or_else(|| anyhow!("No client with id or name '{client}'"))?;
    serde_json::to_string_pretty(&record.raw_json()).context("Failed to serialize client")
}

pub fn run(snapshot: &ClientSnapshot, client: &str) -> Result<()> {
    println!("{}", raw_view(snapshot, client)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::BackendKind;
    use crate::core::record::RawRecord;
    use crate::core::resolver::Fetched;
    use serde_json::{Value, json};

    #[test]
    fn test_raw_view_keeps_unknown_fields() {
        let fields = json!({"clientName": "Ann", "notes": "vip", "monthlyData": "bad"});
        let snapshot = ClientSnapshot::from_fetched(Fetched {
            source: BackendKind::DocumentStore,
            records: vec![RawRecord::new("c1", fields.as_object().cloned().unwrap())],
        });

        let out = raw_view(&snapshot, "Ann").unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["id"], "c1");
        assert_eq!(parsed["notes"], "vip");
        assert_eq!(parsed["monthlyData"], "bad");
    }
}
