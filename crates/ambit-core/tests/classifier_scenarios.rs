//! Classification scenarios over the public API: one parsed module in,
//! one result out, exercising the ordered rule table end to end.

use std::path::Path;

use ambit_core::{
    AccessKind, AccessRecord, BuiltinsRegistry, Classifier, Language, ModuleIdentity,
    ModuleResult, ScopeTree, SourceParser,
};

fn classify(source: &str, language: Language) -> ModuleResult {
    let module = SourceParser::parse(
        ModuleIdentity::new("scenario.js"),
        Path::new("scenario.js"),
        language,
        source.to_string(),
    );
    let scopes = ScopeTree::build(&module).expect("scope build");
    Classifier::new(BuiltinsRegistry::global())
        .classify(&module, &scopes)
        .expect("classify")
}

fn classify_js(source: &str) -> ModuleResult {
    classify(source, Language::JavaScript)
}

#[test]
fn scenario_core_module_member_access() {
    // const os = require('os'); os.platform();
    let result = classify_js("const os = require('os');\nos.platform();");
    assert!(result.global_accesses.is_empty());
    assert_eq!(
        result.node_accesses.iter().collect::<Vec<_>>(),
        vec![&AccessRecord::new(
            "os.platform",
            AccessKind::NodeCoreModuleMember
        )]
    );
}

#[test]
fn scenario_unbound_member_pair() {
    let result = classify_js("function f(x){ return x + window.innerWidth; }");
    assert_eq!(
        result.global_accesses.iter().collect::<Vec<_>>(),
        vec![&AccessRecord::new(
            "window.innerWidth",
            AccessKind::GlobalMember
        )]
    );
    assert!(result
        .global_accesses
        .iter()
        .all(|record| record.name != "x"));
}

#[test]
fn scenario_import_binding_never_global() {
    let result = classify_js("import { foo } from 'bar'; foo();");
    assert!(result.is_empty());
}

#[test]
fn scenario_typeof_feature_detection_excluded() {
    let result = classify_js("typeof Buffer === 'undefined';");
    assert!(result.is_empty());
}

#[test]
fn scenario_mixed_module() {
    let result = classify_js(
        "const path = require('path');\n\
         const joined = path.join('a', 'b');\n\
         process.env.NODE_ENV;\n\
         setTimeout(() => document.title, 0);\n",
    );

    let globals: Vec<&str> = result
        .global_accesses
        .iter()
        .map(|record| record.name.as_str())
        .collect();
    // process.env and document.title are innermost pairs; setTimeout is bare
    assert_eq!(globals, vec!["document.title", "process.env", "setTimeout"]);

    let node: Vec<&str> = result
        .node_accesses
        .iter()
        .map(|record| record.name.as_str())
        .collect();
    assert_eq!(node, vec!["path.join"]);
}

#[test]
fn scenario_typescript_types_not_flagged() {
    let result = classify(
        "interface Props { width: number }\n\
         function measure(p: Props): number { return p.width + window.innerWidth; }\n",
        Language::TypeScript,
    );
    let globals: Vec<&str> = result
        .global_accesses
        .iter()
        .map(|record| record.name.as_str())
        .collect();
    assert_eq!(globals, vec!["window.innerWidth"]);
}

#[test]
fn scenario_registry_pairs_and_bare_names() {
    let result = classify_js(
        "Math.max(1, 2);\n\
         console.log('fine');\n\
         console.profile('flagged');\n",
    );
    let globals: Vec<&str> = result
        .global_accesses
        .iter()
        .map(|record| record.name.as_str())
        .collect();
    // Math.* exempt via the bare name, console.log via the pair entry;
    // console.profile is not exempted
    assert_eq!(globals, vec!["console.profile"]);
}

#[test]
fn scenario_deep_chain_reports_innermost_pair_only() {
    let result = classify_js("require('fs').promises.readFile;");
    // the object of the innermost member expression is a call, not an
    // identifier, so the whole chain drops
    assert!(result.is_empty());
}
