//! Graph aggregation - merging per-module results into the run-wide view.
//!
//! The aggregator is the single owner of the shared tables; mutation goes
//! through `record` only, and `snapshot` can be taken at any time.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::classifier::ModuleResult;
use crate::graph::ModuleIdentity;

/// Accumulates module results across a traversal. Record order is
/// insertion order; the global sets are unordered unions.
#[derive(Debug, Default)]
pub struct Aggregator {
    order: Vec<ModuleIdentity>,
    results: FxHashMap<ModuleIdentity, ModuleResult>,
}

/// Snapshot of aggregator state: the per-module table plus the two
/// deduplicated run-wide access sets.
#[derive(Debug, Clone)]
pub struct AggregateResult {
    /// Per-module results, insertion order.
    pub modules: Vec<ModuleResult>,
    /// Union of global identifier and global member access names.
    pub global_apis: BTreeSet<String>,
    /// Union of Node core module member access names.
    pub node_apis: BTreeSet<String>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one module result. Idempotent per identity: the first result
    /// wins and a repeat is a no-op, so duplicate physical resolutions of
    /// one logical module never double-count.
    pub fn record(&mut self, result: ModuleResult) -> bool {
        if self.results.contains_key(&result.identity) {
            debug!(identity = %result.identity, "duplicate module identity ignored");
            return false;
        }
        self.order.push(result.identity.clone());
        self.results.insert(result.identity.clone(), result);
        true
    }

    /// Current state; callable at any time, reflects all prior records.
    pub fn snapshot(&self) -> AggregateResult {
        let modules: Vec<ModuleResult> = self
            .order
            .iter()
            .filter_map(|identity| self.results.get(identity).cloned())
            .collect();

        let mut global_apis = BTreeSet::new();
        let mut node_apis = BTreeSet::new();
        for module in &modules {
            global_apis.extend(module.global_accesses.iter().map(|r| r.name.clone()));
            node_apis.extend(module.node_accesses.iter().map(|r| r.name.clone()));
        }

        AggregateResult {
            modules,
            global_apis,
            node_apis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{AccessKind, AccessRecord};

    fn result_with(identity: &str, name: &str) -> ModuleResult {
        let mut result = ModuleResult::new(ModuleIdentity::new(identity));
        result
            .global_accesses
            .insert(AccessRecord::new(name, AccessKind::GlobalIdentifier));
        result
    }

    #[test]
    fn test_record_and_snapshot() {
        let mut aggregator = Aggregator::new();
        assert!(aggregator.record(result_with("a/index.js", "window")));
        assert!(aggregator.record(result_with("b/index.js", "fetch")));

        let snapshot = aggregator.snapshot();
        assert_eq!(snapshot.modules.len(), 2);
        assert_eq!(snapshot.modules[0].identity.as_str(), "a/index.js");
        assert!(snapshot.global_apis.contains("window"));
        assert!(snapshot.global_apis.contains("fetch"));
    }

    #[test]
    fn test_duplicate_identity_first_wins() {
        let mut aggregator = Aggregator::new();
        assert!(aggregator.record(result_with("dup/index.js", "first")));
        assert!(!aggregator.record(result_with("dup/index.js", "second")));

        let snapshot = aggregator.snapshot();
        assert_eq!(snapshot.modules.len(), 1);
        assert!(snapshot.global_apis.contains("first"));
        assert!(!snapshot.global_apis.contains("second"));
    }

    #[test]
    fn test_snapshot_mid_run() {
        let mut aggregator = Aggregator::new();
        aggregator.record(result_with("a/index.js", "window"));
        let early = aggregator.snapshot();
        aggregator.record(result_with("b/index.js", "fetch"));

        assert_eq!(early.modules.len(), 1);
        assert_eq!(aggregator.snapshot().modules.len(), 2);
    }
}
