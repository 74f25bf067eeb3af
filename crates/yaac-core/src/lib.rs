//! yaac Core - configuration, declaration extraction and output files
//!
//! This crate holds the leaf pieces of yaac. It loads and persists the
//! `.yaacrc.json` configuration, compiles ignore globs, parses script
//! sources with Tree-sitter to pull out function and method declarations,
//! and renders the two context files AI assistants read.
//!
//! # Example
//!
//! ```no_run
//! use yaac_core::parse_file;
//! use std::path::Path;
//!
//! let records = parse_file(Path::new("src/index.ts")).unwrap();
//! for record in records {
//!     println!("{} {}", record.kind, record.display_name());
//! }
//! ```

pub mod config;
pub mod error;
pub mod ignore;
pub mod languages;
pub mod output;
pub mod parser;
pub mod record;

pub use config::{Config, ConfigStore, ScanDefaults, ScanSelection, CONFIG_FILE_NAME};
pub use error::{ConfigError, OutputError, ParseError, Result};
pub use ignore::IgnoreSet;
pub use languages::LanguageParser;
pub use output::{
    render_catalog, render_layout, write_catalog, write_layout, FUNCTIONS_FILE_NAME,
    LAYOUT_FILE_NAME,
};
pub use parser::{detect_language, parse_file, parse_source};
pub use record::{FunctionKind, FunctionRecord};
