//! Errors that abort a scan cycle.
//!
//! Per-file parse failures are not in here; the extractor collects
//! those into its result and keeps going.

use std::path::PathBuf;
use thiserror::Error;
use yaac_core::OutputError;

#[derive(Error, Debug)]
pub enum ScanError {
    /// The directory to scan does not exist or is a file.
    #[error("scan root '{0}' is not a directory")]
    RootNotFound(PathBuf),

    #[error("failed to resolve '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid ignore pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// The blocking task running a cycle panicked or was cancelled.
    #[error("scan task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
