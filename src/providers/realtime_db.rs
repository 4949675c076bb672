//! Key/value tree backend over the Realtime Database REST API.

use super::util::{RetryPolicy, error_message};
use crate::core::backend::{BackendKind, CLIENTS_PATH, ClientBackend, ClientStore};
use crate::core::config::RealtimeDatabaseConfig;
use crate::core::error::CapabilityAbsent;
use crate::core::record::RawRecord;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub struct RealtimeDatabaseBackend {
    client: reqwest::Client,
    config: Option<RealtimeDatabaseConfig>,
    retry: RetryPolicy,
}

impl RealtimeDatabaseBackend {
    pub fn new(client: reqwest::Client, config: Option<RealtimeDatabaseConfig>) -> Self {
        Self {
            client,
            config,
            retry: RetryPolicy::default(),
        }
    }

    fn absent(reason: impl Into<String>) -> CapabilityAbsent {
        CapabilityAbsent::new(BackendKind::TreeStore, reason)
    }
}

impl ClientBackend for RealtimeDatabaseBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::TreeStore
    }

    fn connect(&self) -> Result<Box<dyn ClientStore>, CapabilityAbsent> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| Self::absent("no realtime_database section configured"))?;
        if config.url.trim().is_empty() {
            return Err(Self::absent("url is empty"));
        }

        let mut url = Url::parse(&format!(
            "{}/{CLIENTS_PATH}.json",
            config.url.trim().trim_end_matches('/')
        ))
        .map_err(|e| Self::absent(format!("invalid url '{}': {e}", config.url)))?;
        if let Some(auth) = &config.auth {
            url.query_pairs_mut().append_pair("auth", auth);
        }

        debug!("Realtime Database handle ready");
        Ok(Box::new(RealtimeDatabaseStore {
            client: self.client.clone(),
            url,
            retry: self.retry,
        }))
    }
}

struct RealtimeDatabaseStore {
    client: reqwest::Client,
    url: Url,
    retry: RetryPolicy,
}

fn into_fields(key: &str, value: Value) -> Map<String, Value> {
    let mut fields = match value {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };
    let missing_name = match fields.get("clientName") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    };
    if missing_name {
        fields.insert("clientName".to_string(), Value::String(key.to_string()));
    }
    fields
}

/// Turns the `clients` subtree into raw records keyed by child key.
fn records_from_tree(tree: Value) -> Vec<RawRecord> {
    match tree {
        Value::Null => {
            debug!("No clients subtree");
            Vec::new()
        }
        Value::Object(children) => children
            .into_iter()
            .map(|(key, value)| {
                let fields = into_fields(&key, value);
                RawRecord::new(key, fields)
            })
            .collect(),
        // Integer-keyed children come back as an array with gaps as nulls
        Value::Array(children) => children
            .into_iter()
            .enumerate()
            .filter(|(_, value)| !value.is_null())
            .map(|(index, value)| {
                let key = index.to_string();
                let fields = into_fields(&key, value);
                RawRecord::new(key, fields)
            })
            .collect(),
        other => {
            warn!(value = %other, "Clients path holds a scalar, treating as empty");
            Vec::new()
        }
    }
}

#[async_trait]
impl ClientStore for RealtimeDatabaseStore {
    async fn read_clients(&self) -> Result<Vec<RawRecord>> {
        debug!(path = CLIENTS_PATH, "Requesting Realtime Database subtree");

        let response = self
            .retry
            .run(|| self.client.get(self.url.clone()).send())
            .await
            .context("Request for Realtime Database clients failed")?;
        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read Realtime Database response")?;

        if !status.is_success() {
            bail!("Realtime Database returned {status}: {}", error_message(&body));
        }

        let tree: Value = serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse Realtime Database response: '{body}'"))?;
        Ok(records_from_tree(tree))
    }
}
