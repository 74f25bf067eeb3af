//! Ignore-pattern matching.
//!
//! Patterns are globs relative to the scanned root, using `/` as the
//! separator: `*` stays within one path segment, `**` crosses segments,
//! and dotfiles are matched like any other name. A pattern ending in
//! `/**` also excludes the directory it names, not just its contents.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Component, Path};

/// A compiled set of ignore globs.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    set: GlobSet,
}

impl IgnoreSet {
    /// Compiles the given patterns. Fails on the first invalid glob.
    pub fn new<I, S>(patterns: I) -> Result<Self, globset::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            builder.add(compile(pattern)?);
            if let Some(dir) = pattern.strip_suffix("/**") {
                if !dir.is_empty() {
                    builder.add(compile(dir)?);
                }
            }
        }

        Ok(Self {
            set: builder.build()?,
        })
    }

    /// An ignore set that matches nothing.
    pub fn empty() -> Self {
        Self {
            set: GlobSet::empty(),
        }
    }

    /// Checks a root-relative path without looking at its ancestors.
    ///
    /// Walkers use this while pruning: an ignored directory is never
    /// descended into, so its children need no separate check.
    pub fn matches(&self, relative: &Path) -> bool {
        let text = to_slash(relative);
        !text.is_empty() && self.set.is_match(&text)
    }

    /// Checks a root-relative path and every ancestor directory of it.
    pub fn is_ignored(&self, relative: &Path) -> bool {
        let mut prefix = String::new();
        for component in relative.components() {
            let Component::Normal(part) = component else {
                continue;
            };
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(&part.to_string_lossy());
            if self.set.is_match(&prefix) {
                return true;
            }
        }
        false
    }
}

fn compile(pattern: &str) -> Result<globset::Glob, globset::Error> {
    GlobBuilder::new(pattern).literal_separator(true).build()
}

/// Joins the normal components of a relative path with `/`.
pub fn to_slash(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
