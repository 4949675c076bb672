pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::list::ListOptions;
use crate::core::config::AppConfig;
use crate::core::session::Session;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

pub enum AppCommand {
    List {
        query: String,
        filter: usize,
        /// Replaces the configured prefix slots in order
        prefixes: Vec<String>,
    },
    Export { client: String, output: PathBuf },
    Show { client: String },
}

/// Prefix slots from the config, overridden in order by `overrides`.
pub fn resolve_prefixes(config: &AppConfig, overrides: &[String]) -> crate::core::PrefixSet {
    let mut prefixes = config.filters.prefixes.clone();
    for (slot, value) in overrides.iter().enumerate() {
        prefixes.set(slot, value);
    }
    prefixes
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Clientboard starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let resolver = providers::build_resolver(&config.backends)?;
    let session = Session::new();
    let result = cli::load_clients(&session, &resolver).await;
    session.teardown();
    let snapshot = result?;

    match command {
        AppCommand::List {
            query,
            filter,
            prefixes,
        } => {
            let options = ListOptions {
                query,
                filter,
                prefixes: resolve_prefixes(&config, &prefixes),
            };
            cli::list::run(&snapshot, &options, &config.currency_symbol);
            Ok(())
        }
        AppCommand::Export { client, output } => {
            let path = cli::export::run(&snapshot, &client, &output)?;
            println!("Exported {}", path.display());
            Ok(())
        }
        AppCommand::Show { client } => cli::show::run(&snapshot, &client),
    }
}
