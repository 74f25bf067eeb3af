//! Rendering and persisting the two context files.
//!
//! Both files live in the project root and are replaced wholesale on
//! every scan cycle.

use crate::error::OutputError;
use crate::record::FunctionRecord;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Tree-rendered directory listing.
pub const LAYOUT_FILE_NAME: &str = ".cursorlayout";

/// Function catalog.
pub const FUNCTIONS_FILE_NAME: &str = ".cursorfunctions";

const BRANCH: &str = "├── ";
const PIPE: &str = "│   ";

/// Renders sorted, `/`-separated relative paths as an indented tree.
///
/// Hierarchy is inferred from adjacency: each path is compared segment
/// by segment with the one before it, and a segment gets its own line
/// when it differs from the segment at the same index of the previous
/// path, or when the previous path was shorter. No tree is built, so a
/// segment that happens to equal its predecessor at the same depth is
/// not repeated even if its parent changed.
pub fn render_layout<S: AsRef<str>>(paths: &[S]) -> String {
    let mut out = String::new();
    let mut prev: Vec<&str> = Vec::new();

    for path in paths {
        let parts: Vec<&str> = path.as_ref().split('/').collect();

        for (depth, part) in parts.iter().enumerate() {
            if prev.get(depth) == Some(part) {
                continue;
            }
            out.push_str(&"  ".repeat(depth));
            out.push_str(if depth == parts.len() - 1 { BRANCH } else { PIPE });
            out.push_str(part);
            out.push('\n');
        }

        prev = parts;
    }

    out
}

/// Renders records as blank-line separated four-field blocks.
pub fn render_catalog(records: &[FunctionRecord]) -> String {
    records
        .iter()
        .map(|record| {
            let params = record.joined_params();
            format!(
                "name: {}\nfile: {}\ntype: {}\nparams: {}\n",
                record.display_name(),
                record.file.display(),
                record.kind,
                if params.is_empty() { "[]" } else { params.as_str() }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes the layout to `<project_root>/.cursorlayout`.
pub fn write_layout(project_root: &Path, layout: &str) -> Result<PathBuf, OutputError> {
    write_output(project_root, LAYOUT_FILE_NAME, layout)
}

/// Writes the rendered catalog to `<project_root>/.cursorfunctions`.
pub fn write_catalog(project_root: &Path, records: &[FunctionRecord]) -> Result<PathBuf, OutputError> {
    write_output(project_root, FUNCTIONS_FILE_NAME, &render_catalog(records))
}

fn write_output(project_root: &Path, name: &str, contents: &str) -> Result<PathBuf, OutputError> {
    let path = project_root.join(name);
    match fs::write(&path, contents) {
        Ok(()) => {
            info!("Successfully wrote {}", name);
            Ok(path)
        }
        Err(source) => {
            error!("Error writing {}: {}", name, source);
            Err(OutputError::Write { path, source })
        }
    }
}
