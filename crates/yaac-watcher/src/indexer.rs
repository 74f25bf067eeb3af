//! Function extraction across a directory.
//!
//! Walks the root for script sources, parses each one and collects the
//! declarations into one flat list. A file that can't be read or parsed
//! is logged and skipped; it never fails the batch.

use crate::error::ScanError;
use crate::walk::walk;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};
use yaac_core::languages::is_supported;
use yaac_core::{parse_file, FunctionRecord, IgnoreSet, ParseError};

/// Result of extracting functions from a directory.
#[derive(Debug, Clone, Default)]
pub struct ExtractResult {
    /// Records in file order, then declaration order within each file.
    pub records: Vec<FunctionRecord>,

    /// Number of source files that matched and were attempted.
    pub files_scanned: usize,

    /// Files that failed to read or parse, with the reason.
    pub errors: Vec<(String, String)>,

    /// Time taken in milliseconds.
    pub duration_ms: u64,
}

/// Extracts function records from every supported source file under `root`.
///
/// Hidden files and directories are skipped, as is anything the ignore
/// set matches. Paths in the records are absolute.
///
/// # Example
///
/// ```no_run
/// use yaac_core::IgnoreSet;
/// use yaac_watcher::extract_directory;
/// use std::path::Path;
///
/// let result = extract_directory(Path::new("."), &IgnoreSet::empty()).unwrap();
/// println!("{} declarations in {} files", result.records.len(), result.files_scanned);
/// ```
pub fn extract_directory(root: &Path, ignore: &IgnoreSet) -> Result<ExtractResult, ScanError> {
    let start = Instant::now();
    let mut result = ExtractResult::default();

    for entry in walk(root, ignore, false)? {
        if entry.is_dir {
            continue;
        }

        let supported = entry
            .path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(is_supported);
        if !supported {
            continue;
        }

        result.files_scanned += 1;
        debug!("Parsing {}", entry.path.display());

        match parse_file(&entry.path) {
            Ok(records) => result.records.extend(records),
            Err(e) => {
                match &e {
                    ParseError::IoError { .. } => {
                        warn!("Could not read {}: {}", entry.path.display(), e)
                    }
                    _ => warn!("Could not parse {}: {}", entry.path.display(), e),
                }
                result.errors.push((entry.path.display().to_string(), e.to_string()));
            }
        }
    }

    result.duration_ms = start.elapsed().as_millis() as u64;

    info!(
        "Extracted {} functions from {} files in {}ms",
        result.records.len(),
        result.files_scanned,
        result.duration_ms
    );

    Ok(result)
}
