//! Language parsers module.
//!
//! Each supported language family has its own submodule that implements
//! the LanguageParser trait. Today that is the script family (JavaScript,
//! TypeScript and their JSX variants), all handled by one grammar.

mod typescript;

use crate::record::FunctionRecord;
use std::path::Path;

/// Trait for language-specific extraction logic.
///
/// The trait provides the Tree-sitter language and the walk that turns
/// a parsed tree into function records.
pub trait LanguageParser: Send + Sync {
    /// Returns the Tree-sitter language for this parser.
    fn language(&self) -> tree_sitter::Language;

    /// File extensions this parser handles.
    fn extensions(&self) -> &[&str];

    /// Extracts function records from a parsed Tree-sitter tree.
    fn extract_functions(
        &self,
        tree: &tree_sitter::Tree,
        source: &str,
        file_path: &Path,
    ) -> Vec<FunctionRecord>;
}

fn parsers() -> Vec<Box<dyn LanguageParser>> {
    vec![Box::new(typescript::TypeScriptParser)]
}

/// Gets a parser for the given file extension.
///
/// Extensions are matched case-sensitively, the same way the source
/// glob matches them. Returns None if we don't support this extension.
pub fn get_parser(extension: &str) -> Option<Box<dyn LanguageParser>> {
    parsers()
        .into_iter()
        .find(|parser| parser.extensions().contains(&extension))
}

/// Checks if a file extension is supported.
pub fn is_supported(extension: &str) -> bool {
    get_parser(extension).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions_resolve() {
        for ext in ["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"] {
            assert!(is_supported(ext), "{} should be supported", ext);
        }
        assert!(!is_supported("py"));
        assert!(!is_supported("JS"));
    }
}
