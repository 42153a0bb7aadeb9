//! The end-to-end audit pipeline.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::AuditError;
use crate::graph::{GraphWalker, WalkStats};
use crate::report::{render, AuditReport};

/// Runs a full audit: graph traversal, classification, aggregation and
/// report rendering.
pub struct Auditor {
    root: PathBuf,
}

impl Auditor {
    /// `root` anchors module identities for files outside `node_modules`
    /// (typically the working directory or the temporary install prefix).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn run(&self, entry: &Path) -> Result<AuditReport, AuditError> {
        let (report, _stats) = self.run_with_stats(entry)?;
        Ok(report)
    }

    pub fn run_with_stats(&self, entry: &Path) -> Result<(AuditReport, WalkStats), AuditError> {
        let walker = GraphWalker::new(&self.root);
        let (snapshot, stats) = walker.walk(entry)?;
        info!(
            modules = stats.modules_visited,
            failed = stats.modules_failed,
            unresolved = stats.imports_unresolved,
            "audit traversal complete"
        );
        Ok((render(&snapshot), stats))
    }
}
