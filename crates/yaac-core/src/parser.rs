//! Parser module - turns one source file into function records.
//!
//! This module wraps Tree-sitter and provides a clean API for parsing
//! source files into FunctionRecords. Language detection is automatic
//! based on file extension.

use crate::error::{ParseError, Result};
use crate::languages::{get_parser, LanguageParser};
use crate::record::FunctionRecord;
use std::fs;
use std::path::Path;
use tree_sitter::Node;

/// Parses a source file and extracts all function records.
///
/// This is the main entry point for parsing. It handles:
/// - Reading the file from disk
/// - Detecting the language from the extension
/// - Parsing with Tree-sitter and rejecting trees with syntax errors
/// - Extracting declarations
///
/// # Example
///
/// ```no_run
/// use yaac_core::parse_file;
/// use std::path::Path;
///
/// let records = parse_file(Path::new("src/app.js")).unwrap();
/// println!("Found {} declarations", records.len());
/// ```
pub fn parse_file(path: &Path) -> Result<Vec<FunctionRecord>> {
    let source = fs::read_to_string(path).map_err(|e| ParseError::io(path, e))?;

    let parser =
        detect_language(path).ok_or_else(|| ParseError::UnsupportedLanguage(path.to_path_buf()))?;

    parse_source(&source, path, parser.as_ref())
}

/// Parses source code directly (useful for testing or in-memory content).
///
/// You need to provide a language parser explicitly since there's no
/// file extension to detect from. `file_path` is only recorded, never read.
pub fn parse_source(
    source: &str,
    file_path: &Path,
    lang_parser: &dyn LanguageParser,
) -> Result<Vec<FunctionRecord>> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&lang_parser.language())
        .map_err(|e| ParseError::ParserError(format!("Failed to set language: {}", e)))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::ParserError("Tree-sitter returned no tree".into()))?;

    // Tree-sitter recovers from anything; a file with errors counts as unparsable
    let root = tree.root_node();
    if root.has_error() {
        let at = first_error(&root).unwrap_or(root).start_position();
        return Err(ParseError::Syntax {
            path: file_path.to_path_buf(),
            line: at.row + 1,
            column: at.column + 1,
        });
    }

    Ok(lang_parser.extract_functions(&tree, source, file_path))
}

/// Detects the language from a file path.
///
/// Returns None if we don't support the file's extension.
pub fn detect_language(path: &Path) -> Option<Box<dyn LanguageParser>> {
    let extension = path.extension()?.to_str()?;
    get_parser(extension)
}

/// Finds the first ERROR or MISSING node, depth first.
fn first_error<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(*node);
    }
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            if child.has_error() {
                if let Some(found) = first_error(&child) {
                    return Some(found);
                }
            }
        }
    }
    None
}
