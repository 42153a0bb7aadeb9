//! ambit-core: static audit engine for ambient global and Node.js core API
//! usage across a JavaScript/TypeScript dependency graph.
//!
//! This crate provides the components for Ambit:
//! - Registry: allowlist of known ambient names that are never reported
//! - Parsers: tree-sitter based JS/TS/JSX/TSX parsing
//! - Scope: lexical scope resolution behind the `ScopeQuery` seam
//! - Classifier: per-module identifier classification rules
//! - Graph: Node-style module resolution and dependency graph traversal
//! - Aggregate: first-wins accumulation of results across the graph
//! - Report: stable JSON document rendering

pub mod aggregate;
pub mod audit;
pub mod classifier;
pub mod errors;
pub mod graph;
pub mod parsers;
pub mod registry;
pub mod report;
pub mod scope;

// Re-exports for convenience
pub use aggregate::{AggregateResult, Aggregator};
pub use audit::Auditor;
pub use classifier::{
    AccessKind, AccessRecord, Classifier, ModuleResult, SyntaxPosition,
};
pub use errors::AuditError;
pub use graph::{
    package_entry, GraphWalker, ModuleIdentity, ModuleResolver, Resolution, WalkStats,
};
pub use parsers::{Language, ParsedModule, SourceParser};
pub use registry::{is_core_module, BuiltinsRegistry, NODE_CORE_MODULES};
pub use report::{render, AggregatedApis, AuditReport, FileReport};
pub use scope::{ScopeId, ScopeQuery, ScopeTree};
