//! End-to-end pipeline tests over a synthetic package tree: entry
//! resolution, graph traversal, deduplication and report shape.

use std::fs;
use std::path::Path;

use ambit_core::{AuditError, Auditor};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A small dependency tree with a hoisted and a nested install of `ms`.
fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(
        root,
        "main.js",
        "const widget = require('widget');\nconst ms = require('ms');\ndocument.cookie;\n",
    );

    write(
        root,
        "node_modules/widget/package.json",
        r#"{ "name": "widget", "main": "lib/index.js" }"#,
    );
    write(
        root,
        "node_modules/widget/lib/index.js",
        "const platform = require('./platform');\nrequire('ms');\nwindow.innerWidth;\n",
    );
    write(
        root,
        "node_modules/widget/lib/platform.js",
        "const os = require('os');\nmodule.exports = os.platform();\n",
    );

    // hoisted install: no ambient accesses at all
    write(
        root,
        "node_modules/ms/index.js",
        "module.exports = function ms(v) { return String(v); };\n",
    );
    // nested duplicate with different source; must lose to the hoisted copy
    write(
        root,
        "node_modules/widget/node_modules/ms/index.js",
        "module.exports = function ms(v) { return window.btoa(v); };\n",
    );

    dir
}

#[test]
fn test_full_traversal_and_report() {
    let dir = fixture();
    let report = Auditor::new(dir.path())
        .run(&dir.path().join("main.js"))
        .expect("audit run");

    let files: Vec<&str> = report.files.iter().map(|f| f.file.as_str()).collect();
    assert_eq!(files[0], "main.js");
    assert!(files.contains(&"widget/lib/index.js"));
    assert!(files.contains(&"widget/lib/platform.js"));

    assert_eq!(
        report.aggregated.global_apis,
        vec!["document.cookie", "window.innerWidth"]
    );
    assert_eq!(report.aggregated.node_apis, vec!["os.platform"]);
}

#[test]
fn test_duplicate_install_first_wins() {
    let dir = fixture();
    let report = Auditor::new(dir.path())
        .run(&dir.path().join("main.js"))
        .expect("audit run");

    // the hoisted ms (no accesses) is recorded first; the nested copy's
    // window.btoa must never surface
    assert!(!report
        .aggregated
        .global_apis
        .iter()
        .any(|name| name == "window.btoa"));
    assert!(!report.files.iter().any(|f| f.file == "ms/index.js"));
}

#[test]
fn test_modules_without_accesses_omitted() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "clean.js", "const a = 1;\nconst b = a + 1;\n");

    let report = Auditor::new(dir.path())
        .run(&dir.path().join("clean.js"))
        .expect("audit run");
    assert!(report.files.is_empty());
    assert!(report.aggregated.global_apis.is_empty());
    assert!(report.aggregated.node_apis.is_empty());
}

#[test]
fn test_unresolvable_import_is_skipped_not_fatal() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "entry.js",
        "require('not-installed-anywhere');\nfetch('/x');\n",
    );

    let (report, stats) = Auditor::new(dir.path())
        .run_with_stats(&dir.path().join("entry.js"))
        .expect("audit run");
    assert_eq!(stats.imports_unresolved, 1);
    assert_eq!(report.aggregated.global_apis, vec!["fetch"]);
}

#[test]
fn test_missing_entry_is_an_error() {
    let dir = TempDir::new().unwrap();
    let outcome = Auditor::new(dir.path()).run(&dir.path().join("nope.js"));
    assert!(matches!(outcome, Err(AuditError::EntryNotFound { .. })));
}

#[test]
fn test_broken_dependency_does_not_abort_run() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "entry.js", "require('./weird.json');\nalert('hi');\n");
    write(dir.path(), "weird.json", "{ not source");

    let (report, _stats) = Auditor::new(dir.path())
        .run_with_stats(&dir.path().join("entry.js"))
        .expect("audit run");
    assert_eq!(report.aggregated.global_apis, vec!["alert"]);
}
