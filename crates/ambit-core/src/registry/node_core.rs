//! The fixed list of Node.js core modules.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

/// Core modules recognized in `require()` calls. Requiring one of these
/// marks privileged capability access; anything else is an ordinary
/// dependency.
pub const NODE_CORE_MODULES: &[&str] = &[
    "assert",
    "assert/strict",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "dns/promises",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "path/posix",
    "path/win32",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "readline/promises",
    "repl",
    "stream",
    "stream/consumers",
    "stream/promises",
    "stream/web",
    "string_decoder",
    "sys",
    "timers",
    "timers/promises",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "util/types",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

static CORE_SET: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| NODE_CORE_MODULES.iter().copied().collect());

/// Whether a module specifier names a Node core module. The `node:` scheme
/// prefix is accepted.
pub fn is_core_module(specifier: &str) -> bool {
    let name = specifier.strip_prefix("node:").unwrap_or(specifier);
    CORE_SET.contains(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_module_lookup() {
        assert!(is_core_module("fs"));
        assert!(is_core_module("child_process"));
        assert!(is_core_module("node:os"));
        assert!(is_core_module("fs/promises"));
        assert!(!is_core_module("lodash"));
        assert!(!is_core_module("./fs"));
    }
}
