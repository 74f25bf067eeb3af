//! Directory walking shared by the layout and the extractor.

use crate::error::ScanError;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::warn;
use yaac_core::ignore::to_slash;
use yaac_core::IgnoreSet;

/// One path found under the scan root.
#[derive(Debug, Clone)]
pub(crate) struct WalkEntry {
    /// Absolute path on disk.
    pub path: PathBuf,

    /// Path relative to the root, `/`-separated.
    pub relative: String,

    pub is_dir: bool,
}

/// Resolves the scan root to an absolute directory path.
pub(crate) fn resolve_root(root: &Path) -> Result<PathBuf, ScanError> {
    let absolute = std::path::absolute(root).map_err(|source| ScanError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    if !absolute.is_dir() {
        return Err(ScanError::RootNotFound(absolute));
    }
    Ok(absolute)
}

/// Walks everything under `root` except the root itself, sorted by
/// relative path.
///
/// No `.gitignore` handling: the ignore set is the only filter, plus
/// dotfiles when `include_hidden` is false. Ignored directories are
/// pruned, so nothing below them is visited. Symlinks are not followed.
pub(crate) fn walk(
    root: &Path,
    ignore: &IgnoreSet,
    include_hidden: bool,
) -> Result<Vec<WalkEntry>, ScanError> {
    let root = resolve_root(root)?;

    let prune_root = root.clone();
    let prune = ignore.clone();
    let walker = WalkBuilder::new(&root)
        .standard_filters(false)
        .hidden(!include_hidden)
        .follow_links(false)
        .filter_entry(move |entry| match entry.path().strip_prefix(&prune_root) {
            Ok(relative) => !prune.matches(relative),
            Err(_) => true,
        })
        .build();

    let mut entries = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Error walking entry: {}", err);
                continue;
            }
        };

        let Ok(relative) = entry.path().strip_prefix(&root) else {
            continue;
        };
        let relative = to_slash(relative);
        if relative.is_empty() {
            continue;
        }

        entries.push(WalkEntry {
            is_dir: entry.file_type().is_some_and(|t| t.is_dir()),
            path: entry.path().to_path_buf(),
            relative,
        });
    }

    entries.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(entries)
}
