//! yaac CLI - command-line interface for yaac
//!
//! Generates `.cursorlayout` and `.cursorfunctions` for AI assistants,
//! optionally keeping them fresh while files change, and edits the
//! defaults stored in `.yaacrc.json`.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yaac_core::ScanSelection;

mod commands;

#[derive(Parser)]
#[command(name = "yaac")]
#[command(author = "yaac Contributors")]
#[command(version)]
#[command(
    about = "Yet Another AI CLI - Generate project layout and function documentation for AI",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan project and generate .cursorlayout and .cursorfunctions files
    Scan {
        /// Only scan for project layout
        #[arg(short, long)]
        layout: bool,

        /// Only scan for functions
        #[arg(short, long)]
        functions: bool,

        /// Do all types of scans
        #[arg(short, long)]
        all: bool,

        /// Watch for changes and re-scan
        #[arg(short, long)]
        watch: bool,

        /// Directory to scan (defaults to current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Set default scanning behavior
    Set {
        /// Scan layout by default
        #[arg(short, long)]
        layout: bool,

        /// Scan functions by default
        #[arg(short, long)]
        functions: bool,

        /// Turn every scan type and watch mode on
        #[arg(short, long)]
        all: bool,

        /// Watch for changes by default
        #[arg(short, long)]
        watch: bool,

        /// Replace the ignore patterns (comma-separated or repeated)
        #[arg(long, value_delimiter = ',', num_args = 1..)]
        ignore: Option<Vec<String>>,
    },

    /// Remove scanning behavior
    Remove {
        /// Remove layout scanning
        #[arg(short, long)]
        layout: bool,

        /// Remove function scanning
        #[arg(short, long)]
        functions: bool,

        /// Remove all scanning and watch mode
        #[arg(short, long)]
        all: bool,

        /// Remove watch mode
        #[arg(short, long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays readable
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let project_root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    let (operation, result) = match cli.command {
        Commands::Scan {
            layout,
            functions,
            all,
            watch,
            path,
        } => {
            let selection = ScanSelection {
                layout,
                functions,
                watch,
                all,
            };
            (
                "during scan",
                commands::scan(&project_root, selection, path.as_deref()).await,
            )
        }
        Commands::Set {
            layout,
            functions,
            all,
            watch,
            ignore,
        } => {
            let selection = ScanSelection {
                layout,
                functions,
                watch,
                all,
            };
            (
                "setting config",
                commands::set(&project_root, selection, ignore),
            )
        }
        Commands::Remove {
            layout,
            functions,
            all,
            watch,
        } => {
            let selection = ScanSelection {
                layout,
                functions,
                watch,
                all,
            };
            (
                "updating configuration",
                commands::remove(&project_root, selection),
            )
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", format!("Error {}:", operation).red().bold(), e);
        std::process::exit(1);
    }
}
