//! Report emission - the stable JSON document.
//!
//! `render` is a pure function from an aggregate snapshot to the document;
//! serialization and printing happen at the caller. Keys whose underlying
//! set is empty are omitted, and set contents render sorted so output is
//! byte-stable across runs.

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateResult;

/// The audit document: one entry per module with accesses, plus the
/// deduplicated run-wide aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub files: Vec<FileReport>,
    pub aggregated: AggregatedApis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub file: String,
    #[serde(
        rename = "globalAPIs",
        skip_serializing_if = "Vec::is_empty",
        default
    )]
    pub global_apis: Vec<String>,
    #[serde(rename = "NodeAPIs", skip_serializing_if = "Vec::is_empty", default)]
    pub node_apis: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedApis {
    #[serde(
        rename = "globalAPIs",
        skip_serializing_if = "Vec::is_empty",
        default
    )]
    pub global_apis: Vec<String>,
    #[serde(rename = "NodeAPIs", skip_serializing_if = "Vec::is_empty", default)]
    pub node_apis: Vec<String>,
}

/// Render a snapshot. Modules with no accesses at all are left out of the
/// per-file listing.
pub fn render(snapshot: &AggregateResult) -> AuditReport {
    let files = snapshot
        .modules
        .iter()
        .filter(|module| !module.is_empty())
        .map(|module| FileReport {
            file: module.identity.to_string(),
            global_apis: module
                .global_accesses
                .iter()
                .map(|record| record.name.clone())
                .collect(),
            node_apis: module
                .node_accesses
                .iter()
                .map(|record| record.name.clone())
                .collect(),
        })
        .collect();

    AuditReport {
        files,
        aggregated: AggregatedApis {
            global_apis: snapshot.global_apis.iter().cloned().collect(),
            node_apis: snapshot.node_apis.iter().cloned().collect(),
        },
    }
}
