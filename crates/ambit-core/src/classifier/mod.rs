//! Identifier classification - the audit rules.
//!
//! Decides, for every identifier and member-access node in one module,
//! whether it denotes something locally bound (parameter, variable, import,
//! class member) or an ambient global / Node-core capability. The rule table
//! is ordered and first-match-wins; see `classify_identifier` and
//! `classify_member`.
//!
//! Two deliberate limits are preserved from the audited behavior and must
//! not be "fixed" silently (they change report shape):
//! - only the innermost object/property pair of a chain (`a.b` of `a.b.c.d`)
//!   is classified; outer links are dropped
//! - core-module member detection matches the required literal against the
//!   member's object name textually, so `const f = require('fs')` makes the
//!   alias invisible to the core-module rule

mod types;

pub use types::{AccessKind, AccessRecord, ModuleResult, SyntaxPosition};

use rustc_hash::FxHashSet;
use tree_sitter::Node;

use crate::errors::AuditError;
use crate::parsers::ParsedModule;
use crate::registry::{is_core_module, BuiltinsRegistry};
use crate::scope::ScopeQuery;

/// Per-module identifier classifier. Pure: every invocation depends only on
/// the input module, the scope query and the immutable registry.
pub struct Classifier<'r> {
    registry: &'r BuiltinsRegistry,
}

impl<'r> Classifier<'r> {
    pub fn new(registry: &'r BuiltinsRegistry) -> Self {
        Self { registry }
    }

    /// Classify one module, visiting every identifier/member-access node
    /// exactly once in document order.
    pub fn classify(
        &self,
        module: &ParsedModule,
        scopes: &dyn ScopeQuery,
    ) -> Result<ModuleResult, AuditError> {
        let tree = module.tree.as_ref().ok_or_else(|| AuditError::InvalidInput {
            identity: module.identity.to_string(),
        })?;

        let source = module.source.as_bytes();
        let mut result = ModuleResult::new(module.identity.clone());
        // module-path literals seen in core-module require() calls,
        // consumed by the member rule
        let mut core_aliases: FxHashSet<String> = FxHashSet::default();

        // pre-order traversal, document order
        let mut cursor = tree.root_node().walk();
        loop {
            let node = cursor.node();
            match node.kind() {
                "identifier" => {
                    self.classify_identifier(node, source, scopes, &mut result);
                }
                "member_expression" => {
                    self.classify_member(node, source, scopes, &core_aliases, &mut result);
                }
                "call_expression" => {
                    record_core_require(node, source, &mut core_aliases);
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
                    return Ok(result);
                }
            }
        }
    }

    /// Rules 1-3 and 5: bare identifiers.
    fn classify_identifier(
        &self,
        node: Node<'_>,
        source: &[u8],
        scopes: &dyn ScopeQuery,
        result: &mut ModuleResult,
    ) {
        match syntax_position(node) {
            // rule 1: never global accesses
            SyntaxPosition::ImportBinding
            | SyntaxPosition::ExportRebind
            | SyntaxPosition::ObjectKey
            | SyntaxPosition::ClassMemberKey
            | SyntaxPosition::JsxElementName
            | SyntaxPosition::TypeofOperand
            | SyntaxPosition::InstanceofOperand => {}
            // rule 2: the sibling object carries the access
            SyntaxPosition::MemberProperty => {}
            // rule 3: pairs are recorded at the member expression, never here
            SyntaxPosition::MemberObject => {}
            // rule 5
            SyntaxPosition::Declaration | SyntaxPosition::PlainReference => {
                let name = node.utf8_text(source).unwrap_or("");
                if name.is_empty() {
                    return;
                }
                if scopes.is_bound(name, scopes.enclosing_scope(node)) {
                    return;
                }
                if self.registry.contains(name) {
                    return;
                }
                result
                    .global_accesses
                    .insert(AccessRecord::new(name, AccessKind::GlobalIdentifier));
            }
        }
    }

    /// Rule 4: `object.property` pairs. Only the innermost pair of a chain
    /// qualifies; the object must be a bare identifier and the property
    /// static.
    fn classify_member(
        &self,
        node: Node<'_>,
        source: &[u8],
        scopes: &dyn ScopeQuery,
        core_aliases: &FxHashSet<String>,
        result: &mut ModuleResult,
    ) {
        // <Foo.Bar/> names a component, not an ambient access
        if syntax_position(node) == SyntaxPosition::JsxElementName {
            return;
        }

        let (Some(object), Some(property)) = (
            node.child_by_field_name("object"),
            node.child_by_field_name("property"),
        ) else {
            return;
        };
        if object.kind() != "identifier" || property.kind() != "property_identifier" {
            return;
        }

        let object_name = object.utf8_text(source).unwrap_or("");
        let property_name = property.utf8_text(source).unwrap_or("");
        if object_name.is_empty() || property_name.is_empty() {
            return;
        }
        let pair = format!("{object_name}.{property_name}");

        if self.registry.contains(&pair) {
            return;
        }
        if core_aliases.contains(object_name) {
            result
                .node_accesses
                .insert(AccessRecord::new(pair, AccessKind::NodeCoreModuleMember));
            return;
        }
        if scopes.is_bound(object_name, scopes.enclosing_scope(object)) {
            return;
        }
        if self.registry.contains(object_name) {
            return;
        }
        result
            .global_accesses
            .insert(AccessRecord::new(pair, AccessKind::GlobalMember));
    }
}

/// Rule 6: `require('<core module>')` with a bare callee and exactly one
/// string-literal argument feeds the alias set. Produces no record itself.
fn record_core_require(node: Node<'_>, source: &[u8], core_aliases: &mut FxHashSet<String>) {
    let Some(callee) = node.child_by_field_name("function") else {
        return;
    };
    if callee.kind() != "identifier" || callee.utf8_text(source).unwrap_or("") != "require" {
        return;
    }
    let Some(arguments) = node.child_by_field_name("arguments") else {
        return;
    };
    if arguments.named_child_count() != 1 {
        return;
    }
    let Some(argument) = arguments.named_child(0) else {
        return;
    };
    if argument.kind() != "string" {
        return;
    }
    let specifier = string_value(argument, source);
    if is_core_module(&specifier) {
        core_aliases.insert(specifier);
    }
}

/// The literal value of a `string` node, quotes stripped.
fn string_value(node: Node<'_>, source: &[u8]) -> String {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() == "string_fragment")
        .map(|c| c.utf8_text(source).unwrap_or(""))
        .collect()
}

/// Determine the syntactic position of an identifier occurrence. Exactly one
/// position per occurrence; the kind-based grammar already keeps property
/// names, shorthand keys, labels and TS type identifiers out of the
/// `identifier` kind entirely.
fn syntax_position(node: Node<'_>) -> SyntaxPosition {
    let Some(parent) = node.parent() else {
        return SyntaxPosition::PlainReference;
    };

    // parens are transparent to the operand tests: `typeof (Buffer)` and
    // `x instanceof (Thing)` exclude the same names the bare forms do
    let (outer, outer_parent) = {
        let mut outer = node;
        let mut outer_parent = parent;
        while outer_parent.kind() == "parenthesized_expression" {
            let Some(above) = outer_parent.parent() else {
                break;
            };
            outer = outer_parent;
            outer_parent = above;
        }
        (outer, outer_parent)
    };
    let outer_is_field = |field: &str| {
        outer_parent
            .child_by_field_name(field)
            .map(|child| child.id() == outer.id())
            .unwrap_or(false)
    };
    match outer_parent.kind() {
        "unary_expression"
            if outer_is_field("argument")
                && outer_parent
                    .child_by_field_name("operator")
                    .map(|op| op.kind() == "typeof")
                    .unwrap_or(false) =>
        {
            return SyntaxPosition::TypeofOperand;
        }
        "binary_expression"
            if outer_is_field("right")
                && outer_parent
                    .child_by_field_name("operator")
                    .map(|op| op.kind() == "instanceof")
                    .unwrap_or(false) =>
        {
            return SyntaxPosition::InstanceofOperand;
        }
        _ => {}
    }

    let is_field = |field: &str| {
        parent
            .child_by_field_name(field)
            .map(|child| child.id() == node.id())
            .unwrap_or(false)
    };

    match parent.kind() {
        "import_specifier" | "namespace_import" | "import_clause" => {
            SyntaxPosition::ImportBinding
        }
        "export_specifier" => SyntaxPosition::ExportRebind,

        // computed keys in object literals and class bodies
        "computed_property_name" => SyntaxPosition::ObjectKey,
        "pair" if is_field("key") => SyntaxPosition::ObjectKey,

        "method_definition" | "field_definition" | "public_field_definition"
            if is_field("name") || is_field("property") =>
        {
            SyntaxPosition::ClassMemberKey
        }

        "member_expression" if is_field("object") => SyntaxPosition::MemberObject,
        "member_expression" if is_field("property") => SyntaxPosition::MemberProperty,
        "subscript_expression" if is_field("object") => SyntaxPosition::MemberObject,
        "subscript_expression" if is_field("index") => SyntaxPosition::MemberProperty,

        // <div>, <Widget/>, </div>: tag names resolve through the JSX
        // namespace, never the ambient one
        "jsx_opening_element" | "jsx_closing_element" | "jsx_self_closing_element"
            if is_field("name") =>
        {
            SyntaxPosition::JsxElementName
        }

        "variable_declarator" if is_field("name") => SyntaxPosition::Declaration,
        "function_declaration"
        | "generator_function_declaration"
        | "function"
        | "function_expression"
        | "generator_function"
        | "class_declaration"
        | "class"
            if is_field("name") =>
        {
            SyntaxPosition::Declaration
        }

        _ => SyntaxPosition::PlainReference,
    }
}
