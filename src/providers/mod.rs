pub mod firestore;
pub mod realtime_db;
pub mod util;

use crate::core::config::BackendsConfig;
use crate::core::resolver::DataSourceResolver;
use anyhow::{Context, Result};
use firestore::FirestoreBackend;
use realtime_db::RealtimeDatabaseBackend;
use std::sync::Arc;

/// Builds the shared HTTP client and both backends once, in priority order.
pub fn build_resolver(config: &BackendsConfig) -> Result<DataSourceResolver> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("clientboard/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    Ok(DataSourceResolver::new(
        Arc::new(FirestoreBackend::new(client.clone(), config.firestore.clone())),
        Arc::new(RealtimeDatabaseBackend::new(
            client,
            config.realtime_database.clone(),
        )),
    ))
}
