//! In-process backend doubles for unit tests.

use crate::core::backend::{BackendKind, ClientBackend, ClientStore};
use crate::core::error::CapabilityAbsent;
use crate::core::record::RawRecord;
use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone)]
pub enum Stub {
    Absent,
    Fail(&'static str),
    /// A JSON object of `id -> fields`.
    Serve(Value),
}

pub struct StubBackend {
    kind: BackendKind,
    stub: Stub,
    connects: AtomicUsize,
}

impl StubBackend {
    pub fn new(kind: BackendKind, stub: Stub) -> Arc<Self> {
        Arc::new(Self {
            kind,
            stub,
            connects: AtomicUsize::new(0),
        })
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

struct StubStore(Stub);

#[async_trait]
impl ClientStore for StubStore {
    async fn read_clients(&self) -> anyhow::Result<Vec<RawRecord>> {
        match &self.0 {
            Stub::Absent => unreachable!("absent backends never connect"),
            Stub::Fail(msg) => Err(anyhow!(*msg)),
            Stub::Serve(value) => Ok(value
                .as_object()
                .into_iter()
                .flatten()
                .map(|(id, fields)| {
                    RawRecord::new(id.clone(), fields.as_object().cloned().unwrap_or_default())
                })
                .collect()),
        }
    }
}

impl ClientBackend for StubBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn connect(&self) -> Result<Box<dyn ClientStore>, CapabilityAbsent> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        match &self.stub {
            Stub::Absent => Err(CapabilityAbsent::new(self.kind, "not provisioned")),
            other => Ok(Box::new(StubStore(other.clone()))),
        }
    }
}
