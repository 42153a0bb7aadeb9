//! Lexical scope resolution for parsed modules.
//!
//! Builds an arena of binding scopes from the syntax tree: the program root,
//! every function-like node, block, loop head and catch clause opens a scope;
//! `var` declarations hoist to the nearest function or module scope, `let`
//! and `const` stay block-scoped. Binding collection is position-independent,
//! so hoisted and forward references resolve the same way live engines treat
//! them.
//!
//! The classifier consumes this only through the `ScopeQuery` trait, so any
//! conformant resolver can stand in.

use rustc_hash::{FxHashMap, FxHashSet};
use tree_sitter::Node;

use crate::errors::AuditError;
use crate::parsers::ParsedModule;

/// Index into the scope arena.
pub type ScopeId = usize;

/// The capability the classifier depends on: a scope handle per node and a
/// name lookup along the parent chain.
pub trait ScopeQuery {
    /// The innermost scope enclosing `node`.
    fn enclosing_scope(&self, node: Node<'_>) -> ScopeId;

    /// Whether `name` is bound in `scope` or any of its ancestors.
    fn is_bound(&self, name: &str, scope: ScopeId) -> bool;
}

struct ScopeData {
    parent: Option<ScopeId>,
    /// `var` declarations hoist up to the nearest scope with this flag.
    hoist_boundary: bool,
    bindings: FxHashSet<String>,
}

/// Scope arena for one module.
pub struct ScopeTree {
    scopes: Vec<ScopeData>,
    /// Scope opened by a given syntax node, keyed by node id.
    scope_of_node: FxHashMap<usize, ScopeId>,
}

impl ScopeTree {
    /// The module (program) scope.
    pub const ROOT: ScopeId = 0;

    /// Build the scope tree for a parsed module.
    pub fn build(module: &ParsedModule) -> Result<Self, AuditError> {
        let tree = module.tree.as_ref().ok_or_else(|| AuditError::InvalidInput {
            identity: module.identity.to_string(),
        })?;

        let mut builder = ScopeBuilder {
            source: module.source.as_bytes(),
            tree: ScopeTree {
                scopes: vec![ScopeData {
                    parent: None,
                    hoist_boundary: true,
                    bindings: FxHashSet::default(),
                }],
                scope_of_node: FxHashMap::default(),
            },
        };

        let root = tree.root_node();
        builder.tree.scope_of_node.insert(root.id(), Self::ROOT);
        builder.visit(root, Self::ROOT);
        Ok(builder.tree)
    }

    fn new_scope(&mut self, parent: ScopeId, hoist_boundary: bool) -> ScopeId {
        self.scopes.push(ScopeData {
            parent: Some(parent),
            hoist_boundary,
            bindings: FxHashSet::default(),
        });
        self.scopes.len() - 1
    }

    fn bind(&mut self, scope: ScopeId, name: &str) {
        if !name.is_empty() {
            self.scopes[scope].bindings.insert(name.to_string());
        }
    }

    /// Nearest scope at or above `scope` that `var` declarations hoist to.
    fn hoist_target(&self, mut scope: ScopeId) -> ScopeId {
        loop {
            if self.scopes[scope].hoist_boundary {
                return scope;
            }
            match self.scopes[scope].parent {
                Some(parent) => scope = parent,
                None => return Self::ROOT,
            }
        }
    }
}

impl ScopeQuery for ScopeTree {
    fn enclosing_scope(&self, node: Node<'_>) -> ScopeId {
        let mut current = Some(node);
        while let Some(n) = current {
            if let Some(&scope) = self.scope_of_node.get(&n.id()) {
                return scope;
            }
            current = n.parent();
        }
        Self::ROOT
    }

    fn is_bound(&self, name: &str, mut scope: ScopeId) -> bool {
        loop {
            let data = &self.scopes[scope];
            if data.bindings.contains(name) {
                return true;
            }
            match data.parent {
                Some(parent) => scope = parent,
                None => return false,
            }
        }
    }
}

/// Syntax node kinds that open a new scope. JS and TS grammars renamed
/// `function` to `function_expression` at some point; both spellings are
/// matched.
fn opens_scope(kind: &str) -> bool {
    matches!(
        kind,
        "function_declaration"
            | "generator_function_declaration"
            | "function"
            | "function_expression"
            | "generator_function"
            | "arrow_function"
            | "method_definition"
            | "class_static_block"
            | "statement_block"
            | "for_statement"
            | "for_in_statement"
            | "catch_clause"
    )
}

fn is_hoist_boundary(kind: &str) -> bool {
    matches!(
        kind,
        "function_declaration"
            | "generator_function_declaration"
            | "function"
            | "function_expression"
            | "generator_function"
            | "arrow_function"
            | "method_definition"
            | "class_static_block"
    )
}

struct ScopeBuilder<'a> {
    source: &'a [u8],
    tree: ScopeTree,
}

impl<'a> ScopeBuilder<'a> {
    fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.source).unwrap_or("")
    }

    /// Walk the tree, opening scopes and collecting bindings. `scope` is the
    /// scope the node itself lives in; for scope-opening nodes this is the
    /// freshly created scope (their own).
    fn visit(&mut self, node: Node<'_>, scope: ScopeId) {
        match node.kind() {
            // var hoists, let/const stay block-scoped
            "variable_declaration" => self.bind_declarators(node, self.tree.hoist_target(scope)),
            "lexical_declaration" => self.bind_declarators(node, scope),

            // declaration names bind in the containing scope; function
            // declarations already carry their own scope here, so step out one
            "function_declaration" | "generator_function_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let text = self.text(name).to_string();
                    let containing = self.tree.scopes[scope].parent.unwrap_or(ScopeTree::ROOT);
                    self.tree.bind(containing, &text);
                }
            }
            "class_declaration" | "enum_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let text = self.text(name).to_string();
                    self.tree.bind(scope, &text);
                }
            }

            // named function/class expressions bind their own name inward
            "function" | "function_expression" | "generator_function" | "class" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let text = self.text(name).to_string();
                    self.tree.bind(scope, &text);
                }
            }

            // parameters bind into the function scope the node inherits
            "formal_parameters" => {
                let mut cursor = node.walk();
                let children: Vec<_> = node.named_children(&mut cursor).collect();
                for child in children {
                    self.bind_pattern(child, scope);
                }
            }

            "arrow_function" => {
                // single bare-identifier parameter form: x => ...
                if let Some(param) = node.child_by_field_name("parameter") {
                    self.bind_pattern(param, scope);
                }
            }

            "catch_clause" => {
                if let Some(param) = node.child_by_field_name("parameter") {
                    self.bind_pattern(param, scope);
                }
            }

            // for (const x of xs) / for (var k in o)
            "for_in_statement" => {
                if node.child_by_field_name("kind").is_some() {
                    if let Some(left) = node.child_by_field_name("left") {
                        let is_var = node
                            .child_by_field_name("kind")
                            .map(|k| k.kind() == "var")
                            .unwrap_or(false);
                        let target = if is_var {
                            self.tree.hoist_target(scope)
                        } else {
                            scope
                        };
                        self.bind_pattern(left, target);
                    }
                }
            }

            "import_statement" => {
                self.bind_import(node, ScopeTree::ROOT);
                return;
            }

            _ => {}
        }

        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        for child in children {
            let child_scope = if opens_scope(child.kind()) {
                let fresh = self.tree.new_scope(scope, is_hoist_boundary(child.kind()));
                self.tree.scope_of_node.insert(child.id(), fresh);
                fresh
            } else {
                scope
            };
            self.visit(child, child_scope);
        }
    }

    fn bind_declarators(&mut self, declaration: Node<'_>, target: ScopeId) {
        let mut cursor = declaration.walk();
        let declarators: Vec<_> = declaration
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "variable_declarator")
            .collect();
        for declarator in declarators {
            if let Some(name) = declarator.child_by_field_name("name") {
                self.bind_pattern(name, target);
            }
        }
    }

    /// Bind every identifier a binding pattern introduces, without touching
    /// default-value or computed-key expressions (those are references).
    fn bind_pattern(&mut self, node: Node<'_>, target: ScopeId) {
        match node.kind() {
            "identifier" | "shorthand_property_identifier_pattern" => {
                let text = self.text(node).to_string();
                self.tree.bind(target, &text);
            }
            // x = default
            "assignment_pattern" | "object_assignment_pattern" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.bind_pattern(left, target);
                }
            }
            // { key: binding }
            "pair_pattern" => {
                if let Some(value) = node.child_by_field_name("value") {
                    self.bind_pattern(value, target);
                }
            }
            // TS parameter wrappers carry the pattern in a field
            "required_parameter" | "optional_parameter" => {
                if let Some(pattern) = node.child_by_field_name("pattern") {
                    self.bind_pattern(pattern, target);
                }
            }
            "object_pattern" | "array_pattern" | "rest_pattern" => {
                let mut cursor = node.walk();
                let children: Vec<_> = node.named_children(&mut cursor).collect();
                for child in children {
                    self.bind_pattern(child, target);
                }
            }
            _ => {}
        }
    }

    fn bind_import(&mut self, import: Node<'_>, target: ScopeId) {
        let mut stack = vec![import];
        while let Some(node) = stack.pop() {
            match node.kind() {
                "import_specifier" => {
                    // import { a } / import { a as b } -- the alias binds
                    let bound = node
                        .child_by_field_name("alias")
                        .or_else(|| node.child_by_field_name("name"));
                    if let Some(name) = bound {
                        let text = self.text(name).to_string();
                        self.tree.bind(target, &text);
                    }
                    continue;
                }
                "namespace_import" => {
                    let mut cursor = node.walk();
                    let idents: Vec<_> = node
                        .named_children(&mut cursor)
                        .filter(|c| c.kind() == "identifier")
                        .collect();
                    for ident in idents {
                        let text = self.text(ident).to_string();
                        self.tree.bind(target, &text);
                    }
                    continue;
                }
                "import_clause" => {
                    // default import is a bare identifier child
                    let mut cursor = node.walk();
                    let children: Vec<_> = node.named_children(&mut cursor).collect();
                    for child in children {
                        if child.kind() == "identifier" {
                            let text = self.text(child).to_string();
                            self.tree.bind(target, &text);
                        } else {
                            stack.push(child);
                        }
                    }
                    continue;
                }
                _ => {}
            }
            let mut cursor = node.walk();
            let children: Vec<_> = node.named_children(&mut cursor).collect();
            stack.extend(children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ModuleIdentity;
    use crate::parsers::{Language, SourceParser};
    use std::path::Path;

    fn parse(source: &str) -> ParsedModule {
        SourceParser::parse(
            ModuleIdentity::new("test.js"),
            Path::new("test.js"),
            Language::JavaScript,
            source.to_string(),
        )
    }

    fn scope_at_root(_scopes: &ScopeTree) -> ScopeId {
        ScopeTree::ROOT
    }

    #[test]
    fn test_module_level_bindings() {
        let module = parse("const a = 1; var b = 2; function f() {} class C {}");
        let scopes = ScopeTree::build(&module).unwrap();
        let root = scope_at_root(&scopes);
        for name in ["a", "b", "f", "C"] {
            assert!(scopes.is_bound(name, root), "{name} should be bound");
        }
        assert!(!scopes.is_bound("window", root));
    }

    #[test]
    fn test_var_hoists_out_of_block() {
        let module = parse("if (x) { var hoisted = 1; let scoped = 2; }");
        let scopes = ScopeTree::build(&module).unwrap();
        let root = scope_at_root(&scopes);
        assert!(scopes.is_bound("hoisted", root));
        assert!(!scopes.is_bound("scoped", root));
    }

    #[test]
    fn test_parameters_bound_in_function_only() {
        let module = parse("function f(x, { y }, ...rest) { return x + y; }");
        let scopes = ScopeTree::build(&module).unwrap();
        let root = scope_at_root(&scopes);
        assert!(!scopes.is_bound("x", root));

        // find the x reference inside the body and query from there
        let tree = module.tree.as_ref().unwrap();
        let body = tree
            .root_node()
            .named_child(0)
            .and_then(|f| f.child_by_field_name("body"))
            .unwrap();
        let inner = scopes.enclosing_scope(body);
        for name in ["x", "y", "rest"] {
            assert!(scopes.is_bound(name, inner), "{name} should be bound");
        }
    }

    #[test]
    fn test_default_value_is_not_a_binding() {
        let module = parse("function f(a = fallback) { return a; }");
        let scopes = ScopeTree::build(&module).unwrap();
        let tree = module.tree.as_ref().unwrap();
        let body = tree
            .root_node()
            .named_child(0)
            .and_then(|f| f.child_by_field_name("body"))
            .unwrap();
        let inner = scopes.enclosing_scope(body);
        assert!(scopes.is_bound("a", inner));
        assert!(!scopes.is_bound("fallback", inner));
    }

    #[test]
    fn test_import_bindings() {
        let module = parse(
            "import React from 'react';\nimport { foo as bar } from 'x';\nimport * as ns from 'y';",
        );
        let scopes = ScopeTree::build(&module).unwrap();
        let root = scope_at_root(&scopes);
        for name in ["React", "bar", "ns"] {
            assert!(scopes.is_bound(name, root), "{name} should be bound");
        }
        assert!(!scopes.is_bound("foo", root));
    }

    #[test]
    fn test_catch_parameter() {
        let module = parse("try {} catch (err) { err.toString(); }");
        let scopes = ScopeTree::build(&module).unwrap();
        assert!(!scopes.is_bound("err", ScopeTree::ROOT));
    }

    #[test]
    fn test_unparsed_module_is_invalid_input() {
        let mut module = parse("const a = 1;");
        module.tree = None;
        assert!(matches!(
            ScopeTree::build(&module),
            Err(AuditError::InvalidInput { .. })
        ));
    }
}
