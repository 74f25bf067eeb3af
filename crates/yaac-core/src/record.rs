//! Function record representation.
//!
//! A FunctionRecord is the only thing the extractor hands back: what
//! kind of declaration it found, what it is called, its parameter names
//! and the file it lives in. Records are scan-local and compared
//! structurally.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The declaration shape a record was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    /// A named `function` declaration.
    Function,
    /// An arrow function bound to a variable (`const f = () => ...`).
    Arrow,
    /// A method defined in a class body.
    Method,
}

impl std::fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Function => "function",
            Self::Arrow => "arrow",
            Self::Method => "method",
        };
        write!(f, "{}", s)
    }
}

/// A single extracted declaration.
///
/// Names are optional because some shapes have none the parser can
/// expose: a destructured binding, a string-keyed method, a defaulted
/// or rest parameter. Renderers print those as empty text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub kind: FunctionKind,

    pub name: Option<String>,

    /// Parameter names in declaration order.
    pub params: Vec<Option<String>>,

    /// Absolute path of the source file.
    pub file: PathBuf,
}

impl FunctionRecord {
    pub fn new(
        kind: FunctionKind,
        name: Option<String>,
        params: Vec<Option<String>>,
        file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            kind,
            name,
            params,
            file: file.into(),
        }
    }

    /// The name, or an empty string when the declaration has none.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Parameter names joined by `", "`, absent names rendered empty.
    pub fn joined_params(&self) -> String {
        self.params
            .iter()
            .map(|p| p.as_deref().unwrap_or_default())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
