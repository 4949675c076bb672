//! Error taxonomy for client data acquisition

use crate::core::backend::BackendKind;
use thiserror::Error;

/// A backend cannot be constructed or used at all in this environment.
///
/// This is not a query failure: it triggers fallback to the next backend.
#[derive(Debug, Clone, Error)]
#[error("{backend} is not available: {reason}")]
pub struct CapabilityAbsent {
    pub backend: BackendKind,
    pub reason: String,
}

impl CapabilityAbsent {
    pub fn new(backend: BackendKind, reason: impl Into<String>) -> Self {
        Self {
            backend,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(
        "Neither {} nor {} are available. Check the backend configuration.",
        BackendKind::DocumentStore,
        BackendKind::TreeStore
    )]
    DataSourceUnavailable { absences: Vec<CapabilityAbsent> },

    #[error("Failed to load clients from {backend}: {source:#}")]
    QueryFailure {
        backend: BackendKind,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_message_names_both_backends() {
        let err = FetchError::DataSourceUnavailable {
            absences: Vec::new(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Firestore"));
        assert!(msg.contains("Realtime Database"));
    }

    #[test]
    fn test_query_failure_includes_cause_chain() {
        let source = anyhow::anyhow!("status 503").context("Request for clients failed");
        let err = FetchError::QueryFailure {
            backend: BackendKind::TreeStore,
            source,
        };
        assert_eq!(
            err.to_string(),
            "Failed to load clients from Realtime Database: Request for clients failed: status 503"
        );
    }
}
