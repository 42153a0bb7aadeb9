//! Import specifier extraction for graph traversal.

use rustc_hash::FxHashSet;
use tree_sitter::Node;

use crate::parsers::ParsedModule;

/// Collect every module specifier a module pulls in: `import`/`export ...
/// from` sources, `require("...")` and dynamic `import("...")` calls.
/// Deduplicated, document order.
pub fn extract_imports(module: &ParsedModule) -> Vec<String> {
    let Some(tree) = module.tree.as_ref() else {
        return Vec::new();
    };
    let source = module.source.as_bytes();

    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut specifiers = Vec::new();
    let mut push = |spec: String| {
        if !spec.is_empty() && seen.insert(spec.clone()) {
            specifiers.push(spec);
        }
    };

    let mut cursor = tree.root_node().walk();
    loop {
        let node = cursor.node();
        match node.kind() {
            "import_statement" | "export_statement" => {
                if let Some(spec) = source_field(node, source) {
                    push(spec);
                }
            }
            "call_expression" => {
                if let Some(spec) = call_specifier(node, source) {
                    push(spec);
                }
            }
            _ => {}
        }

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return specifiers;
            }
        }
    }
}

fn source_field(node: Node<'_>, source: &[u8]) -> Option<String> {
    let value = node.child_by_field_name("source")?;
    if value.kind() != "string" {
        return None;
    }
    Some(string_value(value, source))
}

/// `require("...")` and dynamic `import("...")` with a single string-literal
/// argument.
fn call_specifier(node: Node<'_>, source: &[u8]) -> Option<String> {
    let callee = node.child_by_field_name("function")?;
    let is_require =
        callee.kind() == "identifier" && callee.utf8_text(source).unwrap_or("") == "require";
    let is_dynamic_import = callee.kind() == "import";
    if !is_require && !is_dynamic_import {
        return None;
    }

    let arguments = node.child_by_field_name("arguments")?;
    if arguments.named_child_count() != 1 {
        return None;
    }
    let argument = arguments.named_child(0)?;
    if argument.kind() != "string" {
        return None;
    }
    Some(string_value(argument, source))
}

fn string_value(node: Node<'_>, source: &[u8]) -> String {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() == "string_fragment")
        .map(|c| c.utf8_text(source).unwrap_or(""))
        .collect()
}
