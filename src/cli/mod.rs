pub mod export;
pub mod list;
pub mod setup;
pub mod show;
pub mod ui;

use crate::core::resolver::DataSourceResolver;
use crate::core::session::{ClientSnapshot, LoadOutcome, Session};
use anyhow::{Result, bail};
use std::sync::Arc;

/// Runs one fetch cycle behind a spinner and returns the committed snapshot.
pub async fn load_clients(session: &Session, resolver: &DataSourceResolver) -> Result<Arc<ClientSnapshot>> {
    let pb = ui::new_spinner("Loading clients...");
    let outcome = session.load(resolver).await;
    pb.finish_and_clear();

    match outcome {
        LoadOutcome::Loaded(_) => Ok(session.snapshot()),
        LoadOutcome::Failed(msg) => bail!("{msg}"),
        LoadOutcome::Busy => bail!("A client fetch is already in progress"),
        LoadOutcome::Discarded => bail!("Client fetch was cancelled"),
    }
}
