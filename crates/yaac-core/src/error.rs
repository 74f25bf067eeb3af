//! Error types for the core crate.
//!
//! We keep errors simple and actionable. Each variant tells you
//! exactly what went wrong and which file it happened to.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience type for functions that can fail during parsing.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Things that can go wrong when extracting declarations from one file.
///
/// None of these are fatal to a scan. The extractor logs them and
/// moves on to the next file.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Couldn't read the file from disk.
    #[error("failed to read file '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension doesn't map to any supported language.
    #[error("unsupported language for file '{0}'")]
    UnsupportedLanguage(PathBuf),

    /// Tree-sitter could not be set up or returned no tree at all.
    #[error("parser error: {0}")]
    ParserError(String),

    /// The source parsed, but the tree contains syntax errors.
    #[error("syntax error in '{path}' at line {line}, column {column}")]
    Syntax {
        path: PathBuf,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    /// Creates an IO error with the path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }
}

/// Failures loading or persisting `.yaacrc.json`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not a valid configuration document.
    #[error("invalid config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write config '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure persisting one of the generated context files.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
