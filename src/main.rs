use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clientboard::core::log::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for clientboard::AppCommand {
    fn from(cmd: Commands) -> clientboard::AppCommand {
        match cmd {
            Commands::List {
                query,
                filter,
                prefix,
            } => clientboard::AppCommand::List {
                query: query.unwrap_or_default(),
                filter: filter.into(),
                prefixes: prefix,
            },
            Commands::Export { client, output } => {
                clientboard::AppCommand::Export { client, output }
            }
            Commands::Show { client } => clientboard::AppCommand::Show { client },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List clients with their latest month and a summary
    List {
        /// Search client names and account numbers
        #[arg(short, long)]
        query: Option<String>,
        /// Prefix filter: 0 for all, 1-3 for a prefix slot
        #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=3))]
        filter: u8,
        /// Override a prefix slot; repeat up to three times
        #[arg(short, long, num_args = 1, action = clap::ArgAction::Append)]
        prefix: Vec<String>,
    },
    /// Export a client's monthly history as CSV
    Export {
        /// Client id or name
        client: String,
        /// Directory to write the CSV file into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Print a client's raw record as JSON
    Show {
        /// Client id or name
        client: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => clientboard::cli::setup::setup(),
        Some(cmd) => clientboard::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
