//! Backend abstractions for fetching raw client records

use crate::core::error::CapabilityAbsent;
use crate::core::record::RawRecord;
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Display;

/// Collection (or tree path) that holds client records in both backends.
pub const CLIENTS_PATH: &str = "clients";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BackendKind {
    /// Document-collection store (Firestore).
    DocumentStore,
    /// Key/value tree store (Realtime Database).
    TreeStore,
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BackendKind::DocumentStore => "Firestore",
                BackendKind::TreeStore => "Realtime Database",
            }
        )
    }
}

/// A connected backend handle able to read the clients collection.
#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn read_clients(&self) -> Result<Vec<RawRecord>>;
}

/// A backend strategy. `connect` builds the handle; failing there means the
/// backend is absent, not that a query failed.
pub trait ClientBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn connect(&self) -> Result<Box<dyn ClientStore>, CapabilityAbsent>;
}

/// Outcome of trying one backend.
#[derive(Debug)]
pub enum Attempt {
    Success(Vec<RawRecord>),
    CapabilityAbsent(CapabilityAbsent),
    QueryFailure(anyhow::Error),
}

/// Connects to `backend` and, if present, reads the clients collection.
pub async fn attempt(backend: &dyn ClientBackend) -> Attempt {
    let store = match backend.connect() {
        Ok(store) => store,
        Err(absent) => return Attempt::CapabilityAbsent(absent),
    };
    match store.read_clients().await {
        Ok(records) => Attempt::Success(records),
        Err(e) => Attempt::QueryFailure(e),
    }
}
