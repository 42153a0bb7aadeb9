//! Known ambient globals exempted from reporting.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

/// ECMAScript intrinsics and module-system pseudo-globals. These exist in
/// every JavaScript host, so reporting them carries no audit signal.
///
/// Host-capability globals (`window`, `document`, `process`, `Buffer`,
/// `fetch`, timers, ...) are deliberately absent: flagging them is the
/// point of the tool.
const BARE_BUILTINS: &[&str] = &[
    // Fundamental objects and constructors
    "AggregateError",
    "Array",
    "ArrayBuffer",
    "BigInt",
    "BigInt64Array",
    "BigUint64Array",
    "Boolean",
    "DataView",
    "Date",
    "Error",
    "EvalError",
    "FinalizationRegistry",
    "Float32Array",
    "Float64Array",
    "Function",
    "Int16Array",
    "Int32Array",
    "Int8Array",
    "Map",
    "Number",
    "Object",
    "Promise",
    "Proxy",
    "RangeError",
    "ReferenceError",
    "RegExp",
    "Set",
    "SharedArrayBuffer",
    "String",
    "Symbol",
    "SyntaxError",
    "TypeError",
    "URIError",
    "Uint16Array",
    "Uint32Array",
    "Uint8Array",
    "Uint8ClampedArray",
    "WeakMap",
    "WeakRef",
    "WeakSet",
    // Namespaces
    "Atomics",
    "Intl",
    "JSON",
    "Math",
    "Reflect",
    // Value properties
    "Infinity",
    "NaN",
    "globalThis",
    "undefined",
    // Function properties
    "decodeURI",
    "decodeURIComponent",
    "encodeURI",
    "encodeURIComponent",
    "escape",
    "eval",
    "isFinite",
    "isNaN",
    "parseFloat",
    "parseInt",
    "unescape",
    // Module-system and function-body pseudo-globals
    "__dirname",
    "__filename",
    "arguments",
    "exports",
    "module",
    "require",
];

/// Compound `object.property` exemptions. Bare `console` stays flaggable
/// (a host may not provide it), but the ubiquitous logging methods would
/// drown every report.
const MEMBER_BUILTINS: &[&str] = &[
    "console.assert",
    "console.count",
    "console.debug",
    "console.dir",
    "console.error",
    "console.group",
    "console.groupEnd",
    "console.info",
    "console.log",
    "console.table",
    "console.time",
    "console.timeEnd",
    "console.trace",
    "console.warn",
];

static GLOBAL_REGISTRY: Lazy<BuiltinsRegistry> = Lazy::new(BuiltinsRegistry::with_defaults);

/// Immutable set of known ambient global names and `object.member` pairs.
///
/// Queried by exact bare name or exact dotted pair string; never mutated
/// during a run.
pub struct BuiltinsRegistry {
    entries: FxHashSet<&'static str>,
}

impl BuiltinsRegistry {
    fn with_defaults() -> Self {
        let entries = BARE_BUILTINS
            .iter()
            .chain(MEMBER_BUILTINS.iter())
            .copied()
            .collect();
        Self { entries }
    }

    /// The process-wide registry, built on first use.
    pub fn global() -> &'static BuiltinsRegistry {
        &GLOBAL_REGISTRY
    }

    /// Exact lookup of a bare name or a pre-joined `object.property` pair.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }
}
