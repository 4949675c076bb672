use crate::core::export::{export_filename, to_csv};
use crate::core::session::ClientSnapshot;
use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the monthly history of `client` (id or name) as CSV into `output_dir`.
pub fn run(snapshot: &ClientSnapshot, client: &str, output_dir: &Path) -> Result<PathBuf> {
    let record = snapshot
        .find(client)
        .ok_or_else(|| anyhow!("No client with id or name '{client}'"))?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;
    let path = output_dir.join(export_filename(record));
    std::fs::write(&path, to_csv(record))
        .with_context(|| format!("Failed to write CSV to {}", path.display()))?;

    info!(client = %record.id, path = %path.display(), "Exported monthly history");
    Ok(path)
}
