//! yaac Watcher - scanning, watching and re-scanning
//!
//! This crate handles the file system side of things:
//! - Walking directories to render the layout and find source files
//! - Running a scan cycle and writing the context files
//! - Watching for changes and re-running cycles after a quiet period
//!
//! Ignore globs from `.yaacrc.json` apply to every walk and to the watcher.

mod debounce;
mod error;
mod indexer;
mod layout;
mod scan;
mod walk;
mod watcher;

pub use debounce::{debounce_cycles, DEBOUNCE_DELAY};
pub use error::ScanError;
pub use indexer::{extract_directory, ExtractResult};
pub use layout::{generate_layout, LayoutResult};
pub use scan::{CycleReport, ScanPlan, Scanner, WATCH_IGNORE};
pub use watcher::{ChangeKind, FileWatcher, WatchEvent, WatchFilter};
