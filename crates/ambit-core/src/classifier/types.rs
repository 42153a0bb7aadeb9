//! Classification output types.

use std::collections::BTreeSet;

use crate::graph::ModuleIdentity;

/// What kind of ambient access a record denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessKind {
    /// A bare identifier resolving to nothing in scope: `window`.
    GlobalIdentifier,
    /// An `object.property` pair whose object is unbound: `window.innerWidth`.
    GlobalMember,
    /// An `object.property` pair whose object names a required Node core
    /// module: `fs.readFileSync`.
    NodeCoreModuleMember,
}

/// One ambient access. Equality and ordering cover both fields, so a
/// module's results deduplicate as a set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccessRecord {
    pub name: String,
    pub kind: AccessKind,
}

impl AccessRecord {
    pub fn new(name: impl Into<String>, kind: AccessKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// How an identifier occurrence is used syntactically. Exactly one per
/// occurrence; gates eligibility as a global access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxPosition {
    /// The name being introduced by a declaration.
    Declaration,
    /// A name bound by an import clause.
    ImportBinding,
    /// A name inside an export specifier.
    ExportRebind,
    /// A (possibly computed) object-literal key.
    ObjectKey,
    /// A class method or field key.
    ClassMemberKey,
    /// A JSX element tag name (opening, closing or self-closing).
    JsxElementName,
    /// The object side of a member or subscript expression.
    MemberObject,
    /// The property/index side of a member or subscript expression.
    MemberProperty,
    /// Operand of `typeof`, the canonical feature-detection idiom.
    TypeofOperand,
    /// Right-hand side of `instanceof`.
    InstanceofOperand,
    /// Anything else: an ordinary value reference.
    PlainReference,
}

/// Classifier output for one module. Immutable after creation.
#[derive(Debug, Clone)]
pub struct ModuleResult {
    pub identity: ModuleIdentity,
    /// `GlobalIdentifier` and `GlobalMember` records.
    pub global_accesses: BTreeSet<AccessRecord>,
    /// `NodeCoreModuleMember` records.
    pub node_accesses: BTreeSet<AccessRecord>,
}

impl ModuleResult {
    pub fn new(identity: ModuleIdentity) -> Self {
        Self {
            identity,
            global_accesses: BTreeSet::new(),
            node_accesses: BTreeSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.global_accesses.is_empty() && self.node_accesses.is_empty()
    }
}
