//! proctor CLI, the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod console;

#[derive(Parser)]
#[command(name = "proctor", version, about = "Timed assessment session runner")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and example test
    Init,

    /// Validate test TOML files
    Validate {
        /// Path to test file or directory
        #[arg(long)]
        file: PathBuf,
    },

    /// Add tests from TOML files to the catalog
    Import {
        /// Path to test file or directory
        #[arg(long)]
        file: PathBuf,
    },

    /// List tests in the catalog
    List {
        /// Case-insensitive filter on name and description
        #[arg(long)]
        search: Option<String>,
    },

    /// Remove a test from the catalog
    Remove {
        /// Test ID
        #[arg(long)]
        id: String,
    },

    /// Take a test interactively, reading commands from stdin
    Take {
        /// Test ID
        #[arg(long)]
        id: String,

        /// Override the configured time budget
        #[arg(long)]
        budget_secs: Option<u32>,
    },

    /// Show the results of the latest submission for a test
    Report {
        /// Test ID
        #[arg(long)]
        id: String,

        /// Output format: text, markdown, html, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "proctor=info".parse::<tracing_subscriber::filter::Directive>() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { file } => commands::validate::execute(file),
        Commands::Import { file } => commands::import::execute(file, config),
        Commands::List { search } => commands::list::execute(search, config),
        Commands::Remove { id } => commands::remove::execute(id, config),
        Commands::Take { id, budget_secs } => commands::take::execute(id, budget_secs, config).await,
        Commands::Report { id, format, output } => {
            commands::report::execute(id, format, output, config)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
