//! Breadth-first dependency graph walker.
//!
//! Each frontier of discovered files is read, parsed, scope-resolved and
//! classified in parallel; classification is pure, so only the aggregator
//! `record` calls need serializing (one mutex-guarded owner).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::aggregate::{AggregateResult, Aggregator};
use crate::classifier::Classifier;
use crate::errors::AuditError;
use crate::graph::{extract_imports, ModuleIdentity, ModuleResolver, Resolution};
use crate::parsers::{Language, SourceParser};
use crate::registry::BuiltinsRegistry;
use crate::scope::ScopeTree;

/// Counters for one traversal.
#[derive(Debug, Clone, Default)]
pub struct WalkStats {
    pub modules_visited: usize,
    pub modules_failed: usize,
    pub imports_unresolved: usize,
}

/// Walks the module graph from an entry file, streaming results into the
/// aggregator.
pub struct GraphWalker {
    root: PathBuf,
    resolver: ModuleResolver,
}

impl GraphWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root: PathBuf = root.into();
        // identities are computed against the canonical root, matching the
        // canonicalized module paths
        let root = root.canonicalize().unwrap_or(root);
        Self {
            root,
            resolver: ModuleResolver::new(),
        }
    }

    /// Traverse every module reachable from `entry` and classify each one.
    pub fn walk(&self, entry: &Path) -> Result<(AggregateResult, WalkStats), AuditError> {
        let entry = entry.canonicalize().map_err(|_| AuditError::EntryNotFound {
            path: entry.to_path_buf(),
        })?;

        let aggregator = Mutex::new(Aggregator::new());
        let visited_count = AtomicUsize::new(0);
        let failed_count = AtomicUsize::new(0);
        let unresolved_count = AtomicUsize::new(0);

        let mut seen: FxHashSet<PathBuf> = FxHashSet::default();
        seen.insert(entry.clone());
        let mut frontier = vec![entry];

        while !frontier.is_empty() {
            let discovered: Vec<Vec<PathBuf>> = frontier
                .par_iter()
                .map(|path| {
                    self.process(
                        path,
                        &aggregator,
                        &visited_count,
                        &failed_count,
                        &unresolved_count,
                    )
                })
                .collect();

            frontier = discovered
                .into_iter()
                .flatten()
                .filter(|path| seen.insert(path.clone()))
                .collect();
        }

        let aggregator = aggregator
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let stats = WalkStats {
            modules_visited: visited_count.load(Ordering::Relaxed),
            modules_failed: failed_count.load(Ordering::Relaxed),
            imports_unresolved: unresolved_count.load(Ordering::Relaxed),
        };
        Ok((aggregator.snapshot(), stats))
    }

    /// Parse, classify and record one module; return the files its imports
    /// resolve to. Failures skip the module (with a warning) and never leave
    /// a partial record behind.
    fn process(
        &self,
        path: &Path,
        aggregator: &Mutex<Aggregator>,
        visited_count: &AtomicUsize,
        failed_count: &AtomicUsize,
        unresolved_count: &AtomicUsize,
    ) -> Vec<PathBuf> {
        let Some(language) = Language::from_path(path) else {
            debug!(path = %path.display(), "skipping non-source file");
            return Vec::new();
        };

        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to read module");
                failed_count.fetch_add(1, Ordering::Relaxed);
                return Vec::new();
            }
        };

        let identity = ModuleIdentity::from_path(path, &self.root);
        let module = SourceParser::parse(identity, path, language, source);
        if !module.is_parsed() {
            warn!(path = %path.display(), "failed to parse module; skipping");
            failed_count.fetch_add(1, Ordering::Relaxed);
            return Vec::new();
        }

        match ScopeTree::build(&module)
            .and_then(|scopes| Classifier::new(BuiltinsRegistry::global()).classify(&module, &scopes))
        {
            Ok(result) => {
                visited_count.fetch_add(1, Ordering::Relaxed);
                aggregator
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .record(result);
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "classification failed; skipping");
                failed_count.fetch_add(1, Ordering::Relaxed);
                return Vec::new();
            }
        }

        let importer_dir = path.parent().unwrap_or(Path::new("."));
        extract_imports(&module)
            .iter()
            .filter_map(|specifier| match self.resolver.resolve(specifier, importer_dir) {
                Resolution::Source(resolved) => Some(resolved),
                Resolution::CoreModule => None,
                Resolution::Skipped => {
                    unresolved_count.fetch_add(1, Ordering::Relaxed);
                    None
                }
            })
            .collect()
    }
}
