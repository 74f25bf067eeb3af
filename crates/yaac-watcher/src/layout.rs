//! Layout generation.
//!
//! Lists every file and directory under the root, dotfiles included,
//! and renders the sorted list as an indented tree.

use crate::error::ScanError;
use crate::walk::walk;
use std::path::Path;
use tracing::debug;
use yaac_core::{render_layout, IgnoreSet};

/// Result of generating a layout.
#[derive(Debug, Clone)]
pub struct LayoutResult {
    /// The rendered tree text.
    pub text: String,

    /// Number of paths listed.
    pub entries: usize,
}

/// Walks `root` and renders its layout.
///
/// # Example
///
/// ```no_run
/// use yaac_core::IgnoreSet;
/// use yaac_watcher::generate_layout;
/// use std::path::Path;
///
/// let ignore = IgnoreSet::new(["**/node_modules/**"]).unwrap();
/// let layout = generate_layout(Path::new("."), &ignore).unwrap();
/// print!("{}", layout.text);
/// ```
pub fn generate_layout(root: &Path, ignore: &IgnoreSet) -> Result<LayoutResult, ScanError> {
    let entries = walk(root, ignore, true)?;
    let paths: Vec<&str> = entries.iter().map(|e| e.relative.as_str()).collect();

    debug!("Rendering layout of {} paths", paths.len());

    Ok(LayoutResult {
        text: render_layout(&paths),
        entries: paths.len(),
    })
}
