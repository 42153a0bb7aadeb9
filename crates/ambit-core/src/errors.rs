//! Audit errors.

use std::path::PathBuf;

/// Errors produced by the audit engine.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// The classifier was invoked on a module that lacks a parsed syntax
    /// tree or scope information. Fatal to that module's classification
    /// only; no partial record may reach the aggregator.
    #[error("module {identity} reached the classifier without scope information")]
    InvalidInput { identity: String },

    #[error("tree-sitter failed to parse {path}")]
    Parse { path: PathBuf },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("entry point not found: {path}")]
    EntryNotFound { path: PathBuf },
}
