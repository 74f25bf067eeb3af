//! CLI command implementations.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use yaac_core::{ConfigStore, ScanSelection, FUNCTIONS_FILE_NAME, LAYOUT_FILE_NAME};
use yaac_watcher::{CycleReport, ScanPlan, Scanner};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Scan the project, then keep watching if asked to.
pub async fn scan(project_root: &Path, selection: ScanSelection, path: Option<&Path>) -> Result<()> {
    let config = ConfigStore::new(project_root).load()?;
    let plan = ScanPlan::resolve(&selection, &config.scan);

    let scan_root = match path {
        Some(dir) => project_root.join(dir),
        None => project_root.to_path_buf(),
    };
    let scanner = Arc::new(Scanner::new(project_root, scan_root, &config, plan)?);

    if plan.is_idle() {
        println!(
            "{} Nothing to scan: layout and function scans are both off",
            "•".blue()
        );
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner.set_message(format!("Scanning {}...", scanner.scan_root().display()));

        let cycle = Arc::clone(&scanner);
        let report = tokio::task::spawn_blocking(move || cycle.run_cycle()).await??;

        spinner.finish_and_clear();
        print_report(&report);
    }

    if plan.watch {
        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });

        println!("  Press {} to stop", "Ctrl+C".cyan());
        scanner.watch(cancel).await?;
    }

    Ok(())
}

fn print_report(report: &CycleReport) {
    if let Some(layout) = &report.layout {
        println!(
            "{} Wrote {} ({} paths)",
            "✓".green(),
            LAYOUT_FILE_NAME.cyan(),
            layout.entries
        );
    }

    let Some(functions) = &report.functions else {
        return;
    };

    println!(
        "{} Wrote {} ({} functions from {} files) in {}ms",
        "✓".green(),
        FUNCTIONS_FILE_NAME.cyan(),
        functions.records.len().to_string().cyan(),
        functions.files_scanned,
        functions.duration_ms
    );

    if !functions.errors.is_empty() {
        println!("\n{} files could not be parsed:", "⚠".yellow());
        for (file, error) in functions.errors.iter().take(5) {
            println!("  {} - {}", file.red(), error);
        }
        if functions.errors.len() > 5 {
            println!("  ... and {} more", functions.errors.len() - 5);
        }
    }
}

/// Turn default scan types on and/or replace the ignore list.
pub fn set(project_root: &Path, selection: ScanSelection, ignore: Option<Vec<String>>) -> Result<()> {
    let store = ConfigStore::new(project_root);
    let mut config = store.load()?;

    config.enable(&selection);
    if let Some(patterns) = ignore {
        config.replace_ignore(patterns);
    }

    store.write(&config)?;
    println!("{} Configuration updated", "✓".green());

    Ok(())
}

/// Turn default scan types off. Writes only when a flag was given.
pub fn remove(project_root: &Path, selection: ScanSelection) -> Result<()> {
    let store = ConfigStore::new(project_root);
    let mut config = store.load()?;

    if config.disable(&selection) {
        store.write(&config)?;
        println!("{} Updated configuration", "✓".green());
    } else {
        println!("{} Nothing to remove", "•".blue());
    }

    Ok(())
}
