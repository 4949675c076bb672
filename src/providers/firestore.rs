//! Document-collection backend over the Firestore REST API.

use super::util::{RetryPolicy, error_message};
use crate::core::backend::{BackendKind, CLIENTS_PATH, ClientBackend, ClientStore};
use crate::core::config::FirestoreConfig;
use crate::core::error::CapabilityAbsent;
use crate::core::record::RawRecord;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

const PAGE_SIZE: u32 = 300;

pub struct FirestoreBackend {
    client: reqwest::Client,
    config: Option<FirestoreConfig>,
    retry: RetryPolicy,
}

impl FirestoreBackend {
    pub fn new(client: reqwest::Client, config: Option<FirestoreConfig>) -> Self {
        Self {
            client,
            config,
            retry: RetryPolicy::default(),
        }
    }

    fn absent(reason: impl Into<String>) -> CapabilityAbsent {
        CapabilityAbsent::new(BackendKind::DocumentStore, reason)
    }
}

impl ClientBackend for FirestoreBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::DocumentStore
    }

    fn connect(&self) -> Result<Box<dyn ClientStore>, CapabilityAbsent> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| Self::absent("no firestore section configured"))?;
        let project_id = config.project_id.trim();
        if project_id.is_empty() {
            return Err(Self::absent("project_id is empty"));
        }

        let url = format!(
            "{}/v1/projects/{project_id}/databases/(default)/documents/{CLIENTS_PATH}",
            config.base_url.trim_end_matches('/')
        );
        let url = Url::parse(&url)
            .map_err(|e| Self::absent(format!("invalid base_url '{}': {e}", config.base_url)))?;

        debug!(%url, "Firestore handle ready");
        Ok(Box::new(FirestoreStore {
            client: self.client.clone(),
            url,
            api_key: config.api_key.clone(),
            retry: self.retry,
        }))
    }
}

struct FirestoreStore {
    client: reqwest::Client,
    url: Url,
    api_key: Option<String>,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl Document {
    fn into_raw(self) -> RawRecord {
        let id = self.name.rsplit('/').next().unwrap_or(&self.name).to_string();
        RawRecord::new(id, decode_fields(&self.fields))
    }
}

fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), decode_value(v)))
        .collect()
}

/// Converts one typed Firestore value (`{"stringValue": "x"}` and friends)
/// into plain JSON.
fn decode_value(value: &Value) -> Value {
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return Value::Null;
    };
    match kind.as_str() {
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" | "booleanValue"
        | "geoPointValue" => inner.clone(),
        "integerValue" => match inner {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
            other => other.clone(),
        },
        "doubleValue" => match inner {
            Value::String(s) => s.parse::<f64>().map(Value::from).unwrap_or(Value::Null),
            other => other.clone(),
        },
        "mapValue" => match inner.get("fields").and_then(Value::as_object) {
            Some(fields) => Value::Object(decode_fields(fields)),
            None => Value::Object(Map::new()),
        },
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        _ => Value::Null,
    }
}

impl FirestoreStore {
    fn page_url(&self, page_token: Option<&str>) -> Url {
        let mut url = self.url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("pageSize", &PAGE_SIZE.to_string());
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
            if let Some(key) = &self.api_key {
                query.append_pair("key", key);
            }
        }
        url
    }
}

#[async_trait]
impl ClientStore for FirestoreStore {
    async fn read_clients(&self) -> Result<Vec<RawRecord>> {
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let url = self.page_url(page_token.as_deref());
            debug!("Requesting Firestore documents from {}", url);

            let response = self
                .retry
                .run(|| self.client.get(url.clone()).send())
                .await
                .context("Request for Firestore clients failed")?;
            let status = response.status();
            let body = response
                .text()
                .await
                .context("Failed to read Firestore response")?;

            if !status.is_success() {
                bail!("Firestore returned {status}: {}", error_message(&body));
            }

            let page: ListDocumentsResponse = serde_json::from_str(&body)
                .with_context(|| format!("Failed to parse Firestore response: '{body}'"))?;
            records.extend(page.documents.into_iter().map(Document::into_raw));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) if page_token.as_deref() == Some(token.as_str()) => {
                    warn!(token = %token, "Firestore repeated its page token, stopping");
                    break;
                }
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = records.len(), "Read Firestore clients");
        Ok(records)
    }
}
