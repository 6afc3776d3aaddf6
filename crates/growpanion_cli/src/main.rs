//! Growpanion CLI
//!
//! Command-line tools for exporting and importing Growpanion backups.
//!
//! # Commands
//!
//! - `export` - Write the store to a backup file, optionally encrypted
//! - `import` - Apply a backup file to the store under a conflict strategy
//! - `inspect` - Show what a backup file contains without importing it

mod commands;

use clap::{Parser, Subcommand};
use growpanion_core::ImportStrategy;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Growpanion backup tools.
#[derive(Parser)]
#[command(name = "growpanion")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the store document
    #[arg(global = true, short, long, default_value = "growpanion.json")]
    store: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the store to a backup file
    Export {
        /// Output file; defaults to growpanion-backup-<date>.<ext>
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Encrypt the backup with this password
        #[arg(short, long)]
        password: Option<String>,

        /// Free-text label stored in the backup metadata
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Apply a backup file to the store
    Import {
        /// The backup file to import
        input: PathBuf,

        /// Conflict strategy: replace, merge, or skip
        #[arg(long, default_value = "merge")]
        strategy: ImportStrategy,

        /// Password for encrypted backups
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Show what a backup file contains without importing it
    Inspect {
        /// The backup file to inspect
        input: PathBuf,

        /// Password for encrypted backups
        #[arg(short, long)]
        password: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let outcome = match cli.command {
        Commands::Export {
            output,
            password,
            description,
        } => commands::export::run(
            &cli.store,
            output.as_deref(),
            password.as_deref(),
            description.as_deref(),
        ),
        Commands::Import {
            input,
            strategy,
            password,
        } => commands::import::run(&cli.store, &input, strategy, password.as_deref()),
        Commands::Inspect { input, password } => {
            commands::inspect::run(&input, password.as_deref())
        }
    };

    if let Err(e) = outcome {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
