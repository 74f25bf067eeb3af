//! TypeScript/JavaScript parser implementation.
//!
//! This handles TS, TSX, JS and JSX files with the TSX grammar, which
//! accepts the union of those dialects. Plain `.ts` files that rely on
//! `<T>expr` casts will not parse under it; that is the price of one
//! grammar for everything.

use crate::languages::LanguageParser;
use crate::record::{FunctionKind, FunctionRecord};
use std::path::Path;
use tree_sitter::{Language, Node, Tree};

pub struct TypeScriptParser;

impl LanguageParser for TypeScriptParser {
    fn language(&self) -> Language {
        tree_sitter_typescript::language_tsx()
    }

    fn extensions(&self) -> &[&str] {
        &["ts", "tsx", "js", "jsx", "mts", "cts", "mjs", "cjs"]
    }

    fn extract_functions(&self, tree: &Tree, source: &str, file_path: &Path) -> Vec<FunctionRecord> {
        let mut records = Vec::new();
        let root = tree.root_node();

        extract_from_node(&root, source, file_path, &mut records);

        records
    }
}

/// Recursively extracts records from the AST, pre-order, so records come
/// out in the order their declarations start in the file.
fn extract_from_node(node: &Node, source: &str, file_path: &Path, records: &mut Vec<FunctionRecord>) {
    let record = match node.kind() {
        "function_declaration" | "generator_function_declaration" => {
            extract_function(node, source, file_path)
        }
        "arrow_function" => extract_arrow_function(node, source, file_path),
        "method_definition" => extract_method(node, source, file_path),
        _ => None,
    };

    if let Some(record) = record {
        records.push(record);
    }

    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            extract_from_node(&child, source, file_path, records);
        }
    }
}

/// Extracts a named function declaration.
fn extract_function(node: &Node, source: &str, file_path: &Path) -> Option<FunctionRecord> {
    let name = node
        .child_by_field_name("name")
        .map(|n| get_text(&n, source));
    let params = extract_params(node, source);

    Some(FunctionRecord::new(
        FunctionKind::Function,
        name,
        params,
        file_path,
    ))
}

/// Extracts an arrow function that is the value of a variable binding.
///
/// The name comes from the binding (`const foo = () => {}`), not the
/// function. Destructuring bindings have no single name. Parentheses
/// around the arrow (`const foo = (() => {})`) still count as a binding.
fn extract_arrow_function(node: &Node, source: &str, file_path: &Path) -> Option<FunctionRecord> {
    let mut bound = *node;
    let mut declarator = node.parent()?;
    while declarator.kind() == "parenthesized_expression" {
        bound = declarator;
        declarator = declarator.parent()?;
    }
    if declarator.kind() != "variable_declarator" {
        return None;
    }

    let value = declarator.child_by_field_name("value")?;
    if value != bound {
        return None;
    }

    let name = declarator
        .child_by_field_name("name")
        .filter(|n| n.kind() == "identifier")
        .map(|n| get_text(&n, source));

    // `x => x` has a bare `parameter` instead of a parameter list
    let params = match node.child_by_field_name("parameter") {
        Some(param) => vec![param_name(&param, source)],
        None => extract_params(node, source),
    };

    Some(FunctionRecord::new(FunctionKind::Arrow, name, params, file_path))
}

/// Extracts a method defined directly in a class body.
///
/// Object literal methods and `#private` methods are not recorded.
fn extract_method(node: &Node, source: &str, file_path: &Path) -> Option<FunctionRecord> {
    if node.parent()?.kind() != "class_body" {
        return None;
    }

    let key = node.child_by_field_name("name")?;
    let name = match key.kind() {
        "private_property_identifier" => return None,
        "property_identifier" | "identifier" => Some(get_text(&key, source)),
        "computed_property_name" => computed_key_name(&key, source),
        // string and number keys
        _ => None,
    };

    let params = extract_params(node, source);

    Some(FunctionRecord::new(FunctionKind::Method, name, params, file_path))
}

// ============================================================================
// Helper functions
// ============================================================================

/// Gets text content of a node.
fn get_text(node: &Node, source: &str) -> String {
    source[node.byte_range()].to_string()
}

/// `[foo]` names the method `foo`; anything more complex has no name.
fn computed_key_name(key: &Node, source: &str) -> Option<String> {
    if key.named_child_count() != 1 {
        return None;
    }
    let inner = key.named_child(0)?;
    (inner.kind() == "identifier").then(|| get_text(&inner, source))
}

/// Collects parameter names from a node's `parameters` field.
fn extract_params(node: &Node, source: &str) -> Vec<Option<String>> {
    let Some(params) = node.child_by_field_name("parameters") else {
        return Vec::new();
    };

    let mut names = Vec::new();
    for i in 0..params.named_child_count() {
        if let Some(param) = params.named_child(i) {
            if param.kind() == "comment" {
                continue;
            }
            names.push(param_name(&param, source));
        }
    }
    names
}

/// Name of a single parameter, if it is a simple identifier.
///
/// Destructured, defaulted, rest and parameter-property forms have no
/// simple name and yield None.
fn param_name(param: &Node, source: &str) -> Option<String> {
    match param.kind() {
        "identifier" | "this" => Some(get_text(param, source)),
        "required_parameter" | "optional_parameter" => {
            if param.child_by_field_name("value").is_some() || is_parameter_property(param) {
                return None;
            }
            let pattern = param.child_by_field_name("pattern")?;
            match pattern.kind() {
                "identifier" | "this" => Some(get_text(&pattern, source)),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Checks for `constructor(private x)` style parameter properties.
fn is_parameter_property(param: &Node) -> bool {
    for i in 0..param.child_count() {
        if let Some(child) = param.child(i) {
            if matches!(
                child.kind(),
                "accessibility_modifier" | "override_modifier" | "readonly"
            ) {
                return true;
            }
        }
    }
    false
}
