//! Project configuration stored in `.yaacrc.json`.
//!
//! The file is optional. Loading a project without one writes the
//! defaults to disk. Loading a project with one merges it over the
//! defaults: scan toggles override one by one, and ignore patterns are
//! the union of the built-in list and the user's list.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// File name of the configuration, relative to the project root.
pub const CONFIG_FILE_NAME: &str = ".yaacrc.json";

/// Built-in ignore patterns: dependencies, VCS metadata, build output
/// and yaac's own `.cursor*` files.
pub const DEFAULT_IGNORE: &[&str] = &[
    "**/node_modules/**",
    "**/.git/**",
    "**/dist/**",
    "**/build/**",
    "**/.cursor*",
    "**/coverage/**",
];

/// Which scans run when `scan` is invoked without flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanDefaults {
    pub layout: bool,
    pub functions: bool,
    pub watch: bool,
}

impl Default for ScanDefaults {
    fn default() -> Self {
        Self {
            layout: true,
            functions: true,
            watch: false,
        }
    }
}

/// Flags a user passed on the command line.
///
/// Shared by `scan` (to pick what runs) and by `set`/`remove` (to pick
/// which defaults change).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSelection {
    pub layout: bool,
    pub functions: bool,
    pub watch: bool,
    pub all: bool,
}

impl ScanSelection {
    /// True when no flag at all was given.
    pub fn is_empty(&self) -> bool {
        !(self.layout || self.functions || self.watch || self.all)
    }
}

/// The fully merged configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub ignore: Vec<String>,

    pub scan: ScanDefaults,

    /// Keys inside `scan` yaac does not know about.
    pub scan_extra: serde_json::Map<String, serde_json::Value>,

    /// Top-level keys yaac does not know about, written back untouched.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// On-disk shape of a [`Config`]; unknown keys are written back in place.
#[derive(Serialize)]
struct ConfigDoc<'a> {
    ignore: &'a [String],
    scan: ScanDoc<'a>,
    #[serde(flatten)]
    extra: &'a serde_json::Map<String, serde_json::Value>,
}

#[derive(Serialize)]
struct ScanDoc<'a> {
    #[serde(flatten)]
    toggles: &'a ScanDefaults,
    #[serde(flatten)]
    extra: &'a serde_json::Map<String, serde_json::Value>,
}

impl Serialize for Config {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ConfigDoc {
            ignore: &self.ignore,
            scan: ScanDoc {
                toggles: &self.scan,
                extra: &self.scan_extra,
            },
            extra: &self.extra,
        }
        .serialize(serializer)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore: DEFAULT_IGNORE.iter().map(|p| p.to_string()).collect(),
            scan: ScanDefaults::default(),
            scan_extra: serde_json::Map::new(),
            extra: serde_json::Map::new(),
        }
    }
}

/// What is actually on disk. Every field may be missing or null.
#[derive(Debug, Deserialize)]
struct RawConfig {
    ignore: Option<Vec<String>>,
    scan: Option<RawScan>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawScan {
    layout: Option<bool>,
    functions: Option<bool>,
    watch: Option<bool>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl Config {
    /// Merges a user document over the defaults.
    fn from_raw(raw: RawConfig) -> Self {
        let defaults = ScanDefaults::default();
        let (scan, scan_extra) = match raw.scan {
            Some(user) => (
                ScanDefaults {
                    layout: user.layout.unwrap_or(defaults.layout),
                    functions: user.functions.unwrap_or(defaults.functions),
                    watch: user.watch.unwrap_or(defaults.watch),
                },
                user.extra,
            ),
            None => (defaults, serde_json::Map::new()),
        };

        Self {
            ignore: merge_ignore(DEFAULT_IGNORE, raw.ignore.unwrap_or_default()),
            scan,
            scan_extra,
            extra: raw.extra,
        }
    }

    /// Turns the selected defaults on. `all` turns every toggle on.
    pub fn enable(&mut self, selection: &ScanSelection) {
        if selection.all {
            self.scan.layout = true;
            self.scan.functions = true;
            self.scan.watch = true;
            return;
        }
        if selection.layout {
            self.scan.layout = true;
        }
        if selection.functions {
            self.scan.functions = true;
        }
        if selection.watch {
            self.scan.watch = true;
        }
    }

    /// Turns the selected defaults off. `all` turns every toggle off.
    ///
    /// Returns whether anything was selected, i.e. whether the config
    /// needs to be written back.
    pub fn disable(&mut self, selection: &ScanSelection) -> bool {
        if selection.all {
            self.scan.layout = false;
            self.scan.functions = false;
            self.scan.watch = false;
            return true;
        }
        if selection.layout {
            self.scan.layout = false;
        }
        if selection.functions {
            self.scan.functions = false;
        }
        if selection.watch {
            self.scan.watch = false;
        }
        !selection.is_empty()
    }

    /// Replaces the ignore list. The next load unions it with the defaults again.
    pub fn replace_ignore(&mut self, patterns: Vec<String>) {
        self.ignore = merge_ignore(&[], patterns);
    }
}

/// Union of two pattern lists, first-seen order, no duplicates.
fn merge_ignore(defaults: &[&str], user: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    defaults
        .iter()
        .map(|p| p.to_string())
        .chain(user)
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

/// Reads and writes `.yaacrc.json` under a project root.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(project_root: &Path) -> Self {
        Self {
            path: project_root.join(CONFIG_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration, creating the default file if there is none.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No {} found, creating default configuration", CONFIG_FILE_NAME);
                let config = Config::default();
                self.write(&config)?;
                return Ok(config);
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let raw: RawConfig = serde_json::from_str(&text).map_err(|source| {
            error!("Error loading configuration: {}", source);
            ConfigError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;

        Ok(Config::from_raw(raw))
    }

    /// Writes the configuration as pretty-printed JSON, replacing the file.
    pub fn write(&self, config: &Config) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        let mut json = serde_json::to_string_pretty(config)
            .map_err(|e| write_err(std::io::Error::new(ErrorKind::InvalidData, e)))?;
        json.push('\n');

        fs::write(&self.path, json).map_err(write_err)
    }
}
