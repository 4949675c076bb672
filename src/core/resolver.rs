//! Picks exactly one of the two client backends, in priority order.

use crate::core::backend::{Attempt, BackendKind, ClientBackend, attempt};
use crate::core::error::FetchError;
use crate::core::record::RawRecord;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Raw records together with the backend that served them.
#[derive(Debug)]
pub struct Fetched {
    pub source: BackendKind,
    pub records: Vec<RawRecord>,
}

pub struct DataSourceResolver {
    backends: [Arc<dyn ClientBackend>; 2],
}

impl DataSourceResolver {
    pub fn new(primary: Arc<dyn ClientBackend>, secondary: Arc<dyn ClientBackend>) -> Self {
        Self {
            backends: [primary, secondary],
        }
    }

    /// Tries the primary backend, then the secondary one only if the primary
    /// is capability-absent. A query failure on a present backend is final.
    pub async fn fetch_all_clients(&self) -> Result<Fetched, FetchError> {
        let mut absences = Vec::with_capacity(self.backends.len());
        let last = self.backends.len() - 1;

        for (i, backend) in self.backends.iter().enumerate() {
            let kind = backend.kind();
            debug!(backend = %kind, "Trying client backend");

            match attempt(backend.as_ref()).await {
                Attempt::Success(records) => {
                    info!(backend = %kind, count = records.len(), "Fetched clients");
                    return Ok(Fetched {
                        source: kind,
                        records,
                    });
                }
                Attempt::QueryFailure(source) => {
                    let detail = format!("{source:#}");
                    error!(backend = %kind, error = %detail, "Client query failed");
                    return Err(FetchError::QueryFailure {
                        backend: kind,
                        source,
                    });
                }
                Attempt::CapabilityAbsent(absent) => {
                    if i < last {
                        warn!(error = %absent, "Backend not available, falling back");
                    } else {
                        error!(error = %absent, "Backend not available, no fallback left");
                    }
                    absences.push(absent);
                }
            }
        }

        Err(FetchError::DataSourceUnavailable { absences })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{Stub, StubBackend};
    use serde_json::json;

    #[tokio::test]
    async fn test_primary_success_skips_secondary() {
        let primary = StubBackend::new(BackendKind::DocumentStore, Stub::Serve(json!({"a": {}})));
        let secondary = StubBackend::new(BackendKind::TreeStore, Stub::Serve(json!({"b": {}})));
        let resolver = DataSourceResolver::new(primary, secondary.clone());

        let fetched = resolver.fetch_all_clients().await.unwrap();
        assert_eq!(fetched.source, BackendKind::DocumentStore);
        assert_eq!(fetched.records[0].id, "a");
        assert_eq!(secondary.connects(), 0);
    }

    #[tokio::test]
    async fn test_primary_absent_falls_back_to_secondary() {
        let primary = StubBackend::new(BackendKind::DocumentStore, Stub::Absent);
        let secondary = StubBackend::new(BackendKind::TreeStore, Stub::Serve(json!({"b": {}})));
        let resolver = DataSourceResolver::new(primary, secondary);

        let fetched = resolver.fetch_all_clients().await.unwrap();
        assert_eq!(fetched.source, BackendKind::TreeStore);
        assert_eq!(fetched.records.len(), 1);
    }

    #[tokio::test]
    async fn test_primary_query_failure_does_not_fall_back() {
        let primary = StubBackend::new(BackendKind::DocumentStore, Stub::Fail("permission denied"));
        let secondary = StubBackend::new(BackendKind::TreeStore, Stub::Serve(json!({"b": {}})));
        let resolver = DataSourceResolver::new(primary, secondary.clone());

        let err = resolver.fetch_all_clients().await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::QueryFailure {
                backend: BackendKind::DocumentStore,
                ..
            }
        ));
        assert!(err.to_string().contains("permission denied"));
        assert_eq!(secondary.connects(), 0);
    }

    #[tokio::test]
    async fn test_secondary_query_failure_is_surfaced() {
        let primary = StubBackend::new(BackendKind::DocumentStore, Stub::Absent);
        let secondary = StubBackend::new(BackendKind::TreeStore, Stub::Fail("timeout"));
        let resolver = DataSourceResolver::new(primary, secondary);

        let err = resolver.fetch_all_clients().await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::QueryFailure {
                backend: BackendKind::TreeStore,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_both_absent_is_unavailable_after_two_attempts() {
        let primary = StubBackend::new(BackendKind::DocumentStore, Stub::Absent);
        let secondary = StubBackend::new(BackendKind::TreeStore, Stub::Absent);
        let resolver = DataSourceResolver::new(primary.clone(), secondary.clone());

        match resolver.fetch_all_clients().await {
            Err(FetchError::DataSourceUnavailable { absences }) => assert_eq!(absences.len(), 2),
            other => panic!("Expected DataSourceUnavailable, got {other:?}"),
        }
        assert_eq!(primary.connects(), 1);
        assert_eq!(secondary.connects(), 1);
    }

    #[tokio::test]
    async fn test_secondary_empty_subtree_is_success() {
        let primary = StubBackend::new(BackendKind::DocumentStore, Stub::Absent);
        let secondary = StubBackend::new(BackendKind::TreeStore, Stub::Serve(json!({})));
        let resolver = DataSourceResolver::new(primary, secondary);

        let fetched = resolver.fetch_all_clients().await.unwrap();
        assert!(fetched.records.is_empty());
    }
}
